use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries::{self, PaymentUpdate};
use crate::errors::AppError;
use crate::models::{BookingEventKind, BookingStatus};
use crate::services::events::publish_booking_event;
use crate::services::payment::verify_callback_signature;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PaymentCallback {
    pub psid: String,
}

#[derive(Serialize)]
pub struct PaymentCallbackResponse {
    pub psid: String,
    pub status: BookingStatus,
    pub already_paid: bool,
}

// POST /api/payments/callback
pub async fn payment_callback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(callback): Json<PaymentCallback>,
) -> Result<Json<PaymentCallbackResponse>, AppError> {
    let psid = callback.psid.trim().to_string();

    // Skip signature validation when no secret is configured (dev mode)
    if !state.config.payment_secret.is_empty() {
        let signature = headers
            .get("x-vics-signature")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if signature.is_empty() {
            tracing::warn!(psid = %psid, "payment callback without signature");
            return Err(AppError::Forbidden("missing signature".to_string()));
        }
        if !verify_callback_signature(&state.config.payment_secret, &psid, signature) {
            tracing::warn!(psid = %psid, "payment callback with invalid signature");
            return Err(AppError::Forbidden("invalid signature".to_string()));
        }
    }

    let update = queries::mark_paid(&state.db(), &psid)?;
    match update {
        PaymentUpdate::Paid(booking) => {
            tracing::info!(psid = %psid, amount = booking.amount, "booking paid");
            publish_booking_event(&state, BookingEventKind::Paid, &booking);
            Ok(Json(PaymentCallbackResponse {
                psid,
                status: booking.status,
                already_paid: false,
            }))
        }
        PaymentUpdate::AlreadyPaid(booking) => Ok(Json(PaymentCallbackResponse {
            psid,
            status: booking.status,
            already_paid: true,
        })),
        PaymentUpdate::NotFound => Err(AppError::NotFound(format!("booking {psid}"))),
    }
}
