use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::sse::{Event, Sse};
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::check_auth;
use crate::models::{BookingStatus, ConfirmedBooking};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

// GET /api/bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<ConfirmedBooking>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let status = match query.status.as_deref() {
        None | Some("") | Some("all") => None,
        Some(s) => Some(
            BookingStatus::parse(s)
                .ok_or_else(|| AppError::InvalidInput(format!("unknown status: {s}")))?,
        ),
    };
    let limit = query.limit.unwrap_or(50).clamp(1, 500);

    let bookings = queries::list_bookings(&state.db(), status, limit)?;
    Ok(Json(bookings))
}

#[derive(Serialize)]
pub struct BookingSummary {
    pending: i64,
    paid: i64,
}

// GET /api/bookings/summary
pub async fn booking_summary(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<BookingSummary>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let db = state.db();
    Ok(Json(BookingSummary {
        pending: queries::count_by_status(&db, BookingStatus::Pending)?,
        paid: queries::count_by_status(&db, BookingStatus::Paid)?,
    }))
}

// GET /api/bookings/:psid
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(psid): Path<String>,
) -> Result<Json<ConfirmedBooking>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let booking = queries::get_booking(&state.db(), &psid)?;
    booking
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("booking {psid}")))
}

#[derive(Deserialize)]
pub struct EventsQuery {
    pub token: Option<String>,
}

// GET /api/bookings/events (SSE)
pub async fn events_stream(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventsQuery>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, AppError> {
    // EventSource cannot set headers, so the token travels as a query param
    if query.token.as_deref() != Some(state.config.admin_token.as_str()) {
        return Err(AppError::Unauthorized);
    }

    let live = BroadcastStream::new(state.events_tx.subscribe()).filter_map(|result| match result {
        Ok(event) => {
            let data = serde_json::to_string(&event).unwrap_or_default();
            Some(Ok(Event::default().data(data).event("booking_event")))
        }
        Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "booking event subscriber lagged");
            None
        }
    });

    let keepalive = tokio_stream::wrappers::IntervalStream::new(tokio::time::interval(
        Duration::from_secs(30),
    ))
    .map(|_| Ok(Event::default().comment("keepalive")));

    Ok(Sse::new(live.merge(keepalive)))
}
