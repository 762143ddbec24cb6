use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::availability::parse_date;
use crate::services::session::{self, with_wizard};
use crate::services::wizard::{BookingWizard, WizardError, WizardView};
use crate::state::AppState;

/// The wizard view after an action. A rejected action leaves the view
/// unchanged and explains itself in `notice`.
#[derive(Serialize)]
pub struct WizardResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub view: WizardView,
    pub notice: Option<String>,
}

fn respond<T>(
    state: &Arc<AppState>,
    id: Uuid,
    outcome: Result<T, WizardError>,
) -> Result<Json<WizardResponse>, AppError> {
    let notice = match outcome {
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(session = %id, reason = %e, "wizard action rejected");
            Some(e.to_string())
        }
    };
    let view = with_wizard(state, id, |w| w.view())?;
    Ok(Json(WizardResponse {
        session_id: id,
        view,
        notice,
    }))
}

fn apply<T>(
    state: &Arc<AppState>,
    id: Uuid,
    action: impl FnOnce(&mut BookingWizard) -> Result<T, WizardError>,
) -> Result<Json<WizardResponse>, AppError> {
    let outcome = with_wizard(state, id, action)?;
    respond(state, id, outcome)
}

// POST /api/wizard
pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<WizardResponse>), AppError> {
    let id = session::create_session(&state);
    let response = respond(&state, id, Ok(()))?;
    Ok((StatusCode::CREATED, response))
}

// GET /api/wizard/:id
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, AppError> {
    respond(&state, id, Ok(()))
}

// DELETE /api/wizard/:id
pub async fn discard_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    session::discard_session(&state, id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct RegistrationRequest {
    pub registration: String,
}

// POST /api/wizard/:id/registration
pub async fn set_registration(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<RegistrationRequest>,
) -> Result<Json<WizardResponse>, AppError> {
    let outcome = session::lookup_vehicle(&state, id, &req.registration).await?;
    respond(&state, id, outcome)
}

#[derive(Deserialize)]
pub struct CityRequest {
    pub city: String,
}

// POST /api/wizard/:id/city
pub async fn select_city(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<CityRequest>,
) -> Result<Json<WizardResponse>, AppError> {
    apply(&state, id, |w| w.select_city(&req.city))
}

#[derive(Deserialize)]
pub struct AreaRequest {
    pub area: String,
}

// POST /api/wizard/:id/area
pub async fn select_area(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<AreaRequest>,
) -> Result<Json<WizardResponse>, AppError> {
    apply(&state, id, |w| w.select_area(&req.area))
}

#[derive(Deserialize)]
pub struct StationRequest {
    pub station: String,
}

// POST /api/wizard/:id/station
pub async fn select_station(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<StationRequest>,
) -> Result<Json<WizardResponse>, AppError> {
    apply(&state, id, |w| w.select_station(&req.station))
}

#[derive(Deserialize)]
pub struct DateRequest {
    pub date: String,
}

// POST /api/wizard/:id/date
pub async fn select_date(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<DateRequest>,
) -> Result<Json<WizardResponse>, AppError> {
    let date = parse_date(&req.date).map_err(|e| AppError::InvalidInput(e.to_string()))?;
    apply(&state, id, |w| w.select_date(date))
}

#[derive(Deserialize)]
pub struct TimeSlotRequest {
    pub time_slot: String,
}

// POST /api/wizard/:id/time-slot
pub async fn select_time_slot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<TimeSlotRequest>,
) -> Result<Json<WizardResponse>, AppError> {
    apply(&state, id, |w| w.select_time_slot(&req.time_slot))
}

// POST /api/wizard/:id/next
pub async fn next_step(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, AppError> {
    apply(&state, id, |w| w.next())
}

// POST /api/wizard/:id/back
pub async fn previous_step(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, AppError> {
    apply(&state, id, |w| w.back())
}

#[derive(Deserialize)]
pub struct JumpRequest {
    pub step: u8,
}

// POST /api/wizard/:id/jump
pub async fn jump_to_step(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<JumpRequest>,
) -> Result<Json<WizardResponse>, AppError> {
    apply(&state, id, |w| w.jump_to(req.step))
}

// POST /api/wizard/:id/submit
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, AppError> {
    let outcome = session::submit_booking(&state, id).await?;
    respond(&state, id, outcome)
}
