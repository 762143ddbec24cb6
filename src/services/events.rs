use std::sync::Arc;

use crate::models::{BookingEvent, BookingEventKind, ConfirmedBooking};
use crate::state::AppState;

pub fn publish_booking_event(state: &Arc<AppState>, kind: BookingEventKind, booking: &ConfirmedBooking) {
    let event = BookingEvent {
        kind,
        psid: booking.psid.clone(),
        station_name: booking.station_name.clone(),
        amount: booking.amount,
    };
    // No subscribers is fine
    let _ = state.events_tx.send(event);
}
