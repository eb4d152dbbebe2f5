//! Receipt email notifier over the Resend HTTP API.
//!
//! Implements the `BookingNotifier` port. Called fire-and-forget after a
//! booking commits; delivery failures are the caller's to log, never to
//! propagate.

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::EmailConfig;
use crate::domain::booking::Booking;
use crate::domain::show::Show;
use crate::ports::{BookingNotifier, NotifyError};

use super::templates::{
    load_template, render, BOOKING_RECEIPT_TEMPLATE, BOOKING_RECEIPT_TEMPLATE_FILE,
};

/// Booking receipt notifier backed by the Resend email API.
pub struct ResendReceiptNotifier {
    config: EmailConfig,
    http_client: reqwest::Client,
}

impl ResendReceiptNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn template_dir(&self) -> Option<PathBuf> {
        self.config.template_dir.as_ref().map(PathBuf::from)
    }
}

/// Renders the receipt HTML for a committed booking.
fn receipt_html(template: &str, booking: &Booking, show: &Show) -> String {
    let seats = booking
        .seats
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let values = HashMap::from([
        ("show_title", show.title.clone()),
        (
            "starts_at",
            show.starts_at.as_datetime().format("%Y-%m-%d %H:%M UTC").to_string(),
        ),
        ("seats", seats),
        ("amount", booking.amount_minor.to_string()),
        ("booking_id", booking.id.to_string()),
    ]);

    render(template, &values)
}

#[async_trait]
impl BookingNotifier for ResendReceiptNotifier {
    async fn booking_confirmed(
        &self,
        booking: &Booking,
        show: &Show,
        recipient: &str,
    ) -> Result<(), NotifyError> {
        let template = load_template(
            self.template_dir().as_deref(),
            BOOKING_RECEIPT_TEMPLATE_FILE,
            BOOKING_RECEIPT_TEMPLATE,
        );
        let html = receipt_html(&template, booking, show);

        let url = format!("{}/emails", self.config.api_base_url);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.resend_api_key)
            .json(&json!({
                "from": self.config.from_email,
                "to": [recipient],
                "subject": format!("Your tickets for {}", show.title),
                "html": html,
            }))
            .send()
            .await
            .map_err(|e| NotifyError::new(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::new(format!(
                "Resend API error ({}): {}",
                status, body
            )));
        }

        tracing::info!(booking_id = %booking.id, "Booking receipt sent");
        Ok(())
    }
}
