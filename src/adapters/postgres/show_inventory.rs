//! PostgreSQL implementation of ShowInventory.
//!
//! The reservation check-and-write is a single conditional UPDATE: the row
//! lock taken by the statement serializes concurrent reservations on the
//! same show, so no caller can act on a stale booked-seat set between the
//! overlap check and the write. Among concurrent attempts for overlapping
//! seats, exactly one statement matches the WHERE clause.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::domain::foundation::{ShowId, Timestamp};
use crate::domain::show::{SeatSet, Show};
use crate::ports::{InventoryError, ShowInventory};

/// PostgreSQL implementation of the ShowInventory port.
pub struct PostgresShowInventory {
    pool: PgPool,
}

impl PostgresShowInventory {
    /// Creates a new PostgresShowInventory with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Disambiguate a zero-row reservation UPDATE into a specific error.
    async fn reservation_failure(
        &self,
        show_id: &ShowId,
        seats: &SeatSet,
    ) -> InventoryError {
        match self.find(show_id).await {
            Ok(Some(show)) => {
                let taken = show.taken_from(seats);
                if !taken.is_empty() {
                    InventoryError::SeatConflict { taken }
                } else if !show.seats_in_range(seats) {
                    InventoryError::SeatOutOfRange {
                        seat: seats.max_seat(),
                        total_seats: show.total_seats,
                    }
                } else {
                    // The blocking state changed between the UPDATE and this
                    // read. Surface as a transient storage failure rather
                    // than inventing a conflict.
                    InventoryError::storage("Seat reservation failed; please retry")
                }
            }
            Ok(None) => InventoryError::ShowNotFound(*show_id),
            Err(err) => err,
        }
    }
}

/// Database row representation of a show.
#[derive(Debug, sqlx::FromRow)]
struct ShowRow {
    id: Uuid,
    title: String,
    starts_at: DateTime<Utc>,
    ticket_price_minor: i64,
    total_seats: i32,
    booked_seats: Vec<i32>,
}

impl TryFrom<ShowRow> for Show {
    type Error = InventoryError;

    fn try_from(row: ShowRow) -> Result<Self, Self::Error> {
        let total_seats = u32::try_from(row.total_seats)
            .map_err(|_| InventoryError::storage(format!("Invalid total_seats: {}", row.total_seats)))?;

        let booked_seats: BTreeSet<u32> = row
            .booked_seats
            .iter()
            .map(|&s| {
                u32::try_from(s)
                    .map_err(|_| InventoryError::storage(format!("Invalid booked seat: {}", s)))
            })
            .collect::<Result<_, _>>()?;

        Show::new(
            ShowId::from_uuid(row.id),
            row.title,
            Timestamp::from_datetime(row.starts_at),
            row.ticket_price_minor,
            total_seats,
        )
        .and_then(|show| show.with_booked_seats(booked_seats))
        .map_err(|e| InventoryError::storage(format!("Corrupt show row: {}", e)))
    }
}

fn seats_to_db(seats: &SeatSet) -> Vec<i32> {
    seats.iter().map(|s| s as i32).collect()
}

#[async_trait]
impl ShowInventory for PostgresShowInventory {
    async fn find(&self, show_id: &ShowId) -> Result<Option<Show>, InventoryError> {
        let row: Option<ShowRow> = sqlx::query_as(
            r#"
            SELECT id, title, starts_at, ticket_price_minor, total_seats, booked_seats
            FROM shows
            WHERE id = $1
            "#,
        )
        .bind(show_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| InventoryError::storage(format!("Failed to find show: {}", e)))?;

        row.map(Show::try_from).transpose()
    }

    async fn reserve_seats(
        &self,
        show_id: &ShowId,
        seats: &SeatSet,
    ) -> Result<Show, InventoryError> {
        let seat_array = seats_to_db(seats);

        // First writer wins: the WHERE clause rejects any overlap with the
        // current booked-seat set, and the row lock makes check and write
        // indivisible. No partial reservation is possible.
        let row: Option<ShowRow> = sqlx::query_as(
            r#"
            UPDATE shows
               SET booked_seats = (
                       SELECT array_agg(seat ORDER BY seat)
                       FROM unnest(booked_seats || $2::int[]) AS seat
                   ),
                   updated_at = now()
             WHERE id = $1
               AND NOT (booked_seats && $2::int[])
               AND (SELECT max(seat) FROM unnest($2::int[]) AS seat) <= total_seats
            RETURNING id, title, starts_at, ticket_price_minor, total_seats, booked_seats
            "#,
        )
        .bind(show_id.as_uuid())
        .bind(&seat_array)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| InventoryError::storage(format!("Failed to reserve seats: {}", e)))?;

        match row {
            Some(row) => Show::try_from(row),
            None => Err(self.reservation_failure(show_id, seats).await),
        }
    }

    async fn release_seats(
        &self,
        show_id: &ShowId,
        seats: &SeatSet,
    ) -> Result<(), InventoryError> {
        let seat_array = seats_to_db(seats);

        let result = sqlx::query(
            r#"
            UPDATE shows
               SET booked_seats = (
                       SELECT COALESCE(array_agg(seat ORDER BY seat), '{}')
                       FROM unnest(booked_seats) AS seat
                       WHERE seat <> ALL($2::int[])
                   ),
                   updated_at = now()
             WHERE id = $1
            "#,
        )
        .bind(show_id.as_uuid())
        .bind(&seat_array)
        .execute(&self.pool)
        .await
        .map_err(|e| InventoryError::storage(format!("Failed to release seats: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(InventoryError::ShowNotFound(*show_id));
        }

        Ok(())
    }
}
