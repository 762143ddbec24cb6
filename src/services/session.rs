use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{BookingEventKind, ConfirmedBooking, PaymentHandoff, VehicleRecord};
use crate::services::events::publish_booking_event;
use crate::services::wizard::{BookingWizard, WizardError};
use crate::state::AppState;

/// One wizard plus the last time a request reached it.
pub struct Session {
    pub wizard: BookingWizard,
    last_touched: Instant,
}

impl Session {
    fn new(wizard: BookingWizard) -> Self {
        Self {
            wizard,
            last_touched: Instant::now(),
        }
    }

    fn is_idle(&self, ttl: Duration) -> bool {
        self.last_touched.elapsed() >= ttl
    }
}

/// Opens a session after dropping every session idle for longer than the
/// configured TTL. Sessions with a submission in flight are never dropped.
pub fn create_session(state: &Arc<AppState>) -> Uuid {
    let id = Uuid::new_v4();
    let wizard = BookingWizard::new(
        state.dataset.clone(),
        state.dataset.clone(),
        state.psids.clone(),
    );

    let mut sessions = state.sessions();
    let evicted = evict_idle(&mut sessions, state.config.session_ttl);
    if evicted > 0 {
        tracing::info!(evicted, "dropped idle booking sessions");
    }
    sessions.insert(id, Session::new(wizard));
    tracing::info!(session = %id, "booking session opened");
    id
}

fn evict_idle(
    sessions: &mut HashMap<Uuid, Session>,
    ttl: Duration,
) -> usize {
    let before = sessions.len();
    sessions.retain(|_, s| s.wizard.is_submitting() || !s.is_idle(ttl));
    before - sessions.len()
}

/// Drops the session and its draft entirely.
pub fn discard_session(state: &Arc<AppState>, id: Uuid) -> Result<(), AppError> {
    let mut sessions = state.sessions();
    let busy = sessions
        .get(&id)
        .map(|s| s.wizard.is_submitting())
        .ok_or_else(|| AppError::NotFound(format!("session {id}")))?;
    if busy {
        return Err(AppError::Conflict("submission in progress".to_string()));
    }
    sessions.remove(&id);
    tracing::info!(session = %id, "booking session discarded");
    Ok(())
}

pub fn with_wizard<T>(
    state: &Arc<AppState>,
    id: Uuid,
    f: impl FnOnce(&mut BookingWizard) -> T,
) -> Result<T, AppError> {
    let mut sessions = state.sessions();
    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("session {id}")))?;
    session.last_touched = Instant::now();
    Ok(f(&mut session.wizard))
}

/// Runs a lookup through the lookup port without holding the session lock.
/// The outer error is infrastructure; the inner one is a wizard rejection.
pub async fn lookup_vehicle(
    state: &Arc<AppState>,
    id: Uuid,
    input: &str,
) -> Result<Result<VehicleRecord, WizardError>, AppError> {
    let pending = match with_wizard(state, id, |w| w.begin_lookup(input))? {
        Ok(pending) => pending,
        Err(e) => return Ok(Err(e)),
    };

    let registration = pending.registration.clone();
    let result = state.lookup.lookup(&registration).await;
    tracing::info!(
        session = %id,
        registration = %registration,
        found = result.is_some(),
        "vehicle lookup"
    );

    with_wizard(state, id, move |w| w.finish_lookup(pending, result))
}

/// Submits the draft once. A second call while the first is still awaiting
/// the submit port is rejected with `SubmissionInFlight`.
pub async fn submit_booking(
    state: &Arc<AppState>,
    id: Uuid,
) -> Result<Result<ConfirmedBooking, WizardError>, AppError> {
    let pending = match with_wizard(state, id, |w| w.begin_submit())? {
        Ok(pending) => pending,
        Err(e) => return Ok(Err(e)),
    };

    if let Err(e) = state.submitter.submit(&pending.booking).await {
        tracing::error!(session = %id, psid = %pending.booking.psid, error = %e, "submission failed");
        return Err(AppError::Submission(e.to_string()));
    }

    let booking = match with_wizard(state, id, move |w| w.finish_submit(pending)) {
        Ok(booking) => booking,
        Err(e) => {
            tracing::warn!(session = %id, "session closed while submission was in flight");
            return Err(e);
        }
    };
    tracing::info!(session = %id, psid = %booking.psid, amount = booking.amount, "booking submitted");

    publish_booking_event(state, BookingEventKind::Submitted, &booking);

    let handoff = PaymentHandoff::from(&booking);
    if let Err(e) = state.payments.hand_off(&handoff).await {
        tracing::error!(psid = %booking.psid, error = %e, "failed to hand off to payment service");
    }

    Ok(Ok(booking))
}
