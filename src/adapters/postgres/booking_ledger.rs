//! PostgreSQL implementation of BookingLedger.
//!
//! The `bookings_payment_reference_key` unique constraint is the storage-
//! level guarantee that one payment yields at most one booking; the
//! orchestrator's pre-check only exists to short-circuit the common case.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::booking::{Booking, PaymentStatus};
use crate::domain::foundation::{BookingId, PaymentReference, ShowId, Timestamp, UserId};
use crate::domain::show::SeatSet;
use crate::ports::{BookingLedger, LedgerError};

/// PostgreSQL implementation of the BookingLedger port.
pub struct PostgresBookingLedger {
    pool: PgPool,
}

impl PostgresBookingLedger {
    /// Creates a new PostgresBookingLedger with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a booking.
#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    show_id: Uuid,
    user_id: String,
    seats: Vec<i32>,
    payment_reference: String,
    amount_minor: i64,
    payment_status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = LedgerError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let seats: Vec<u32> = row
            .seats
            .iter()
            .map(|&s| {
                u32::try_from(s)
                    .map_err(|_| LedgerError::storage(format!("Invalid booked seat: {}", s)))
            })
            .collect::<Result<_, _>>()?;

        Ok(Booking {
            id: BookingId::from_uuid(row.id),
            show_id: ShowId::from_uuid(row.show_id),
            user_id: UserId::new(row.user_id)
                .map_err(|e| LedgerError::storage(format!("Invalid user_id: {}", e)))?,
            seats: SeatSet::new(seats)
                .map_err(|e| LedgerError::storage(format!("Invalid seats: {}", e)))?,
            payment_reference: PaymentReference::new(row.payment_reference)
                .map_err(|e| LedgerError::storage(format!("Invalid payment_reference: {}", e)))?,
            amount_minor: row.amount_minor,
            payment_status: parse_payment_status(&row.payment_status)?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn parse_payment_status(s: &str) -> Result<PaymentStatus, LedgerError> {
    match s {
        "pending" => Ok(PaymentStatus::Pending),
        "succeeded" => Ok(PaymentStatus::Succeeded),
        "failed" => Ok(PaymentStatus::Failed),
        _ => Err(LedgerError::storage(format!(
            "Invalid payment_status value: {}",
            s
        ))),
    }
}

#[async_trait]
impl BookingLedger for PostgresBookingLedger {
    async fn find_by_payment_reference(
        &self,
        reference: &PaymentReference,
    ) -> Result<Option<Booking>, LedgerError> {
        let row: Option<BookingRow> = sqlx::query_as(
            r#"
            SELECT id, show_id, user_id, seats, payment_reference, amount_minor,
                   payment_status, created_at
            FROM bookings
            WHERE payment_reference = $1
            "#,
        )
        .bind(reference.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::storage(format!("Failed to find booking: {}", e)))?;

        row.map(Booking::try_from).transpose()
    }

    async fn create(&self, booking: &Booking) -> Result<(), LedgerError> {
        let seats: Vec<i32> = booking.seats.iter().map(|s| s as i32).collect();

        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, show_id, user_id, seats, payment_reference, amount_minor,
                payment_status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.show_id.as_uuid())
        .bind(booking.user_id.as_str())
        .bind(&seats)
        .bind(booking.payment_reference.as_str())
        .bind(booking.amount_minor)
        .bind(booking.payment_status.as_str())
        .bind(booking.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("bookings_payment_reference_key") {
                    return LedgerError::DuplicatePaymentReference(
                        booking.payment_reference.clone(),
                    );
                }
            }
            LedgerError::storage(format!("Failed to create booking: {}", e))
        })?;

        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Booking>, LedgerError> {
        let rows: Vec<BookingRow> = sqlx::query_as(
            r#"
            SELECT id, show_id, user_id, seats, payment_reference, amount_minor,
                   payment_status, created_at
            FROM bookings
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| LedgerError::storage(format!("Failed to list bookings: {}", e)))?;

        rows.into_iter().map(Booking::try_from).collect()
    }
}
