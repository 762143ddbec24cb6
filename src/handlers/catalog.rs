use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{Station, VehicleRecord};
use crate::services::fee::{quote_for, FeeQuote};
use crate::services::location::{areas_of, cities_of, search_stations, stations_of};
use crate::services::lookup::{lookup, normalize_registration};
use crate::state::AppState;

fn find_vehicle(state: &AppState, registration: &str) -> Result<VehicleRecord, AppError> {
    if normalize_registration(registration).is_none() {
        return Err(AppError::InvalidInput(format!(
            "registration number is incomplete: {registration:?}"
        )));
    }
    lookup(state.dataset.as_ref(), registration)
        .ok_or_else(|| AppError::NotFound(format!("vehicle {registration}")))
}

// GET /api/vehicles/:registration
pub async fn get_vehicle(
    State(state): State<Arc<AppState>>,
    Path(registration): Path<String>,
) -> Result<Json<VehicleRecord>, AppError> {
    find_vehicle(&state, &registration).map(Json)
}

// GET /api/vehicles/:registration/fee
pub async fn get_vehicle_fee(
    State(state): State<Arc<AppState>>,
    Path(registration): Path<String>,
) -> Result<Json<FeeQuote>, AppError> {
    let vehicle = find_vehicle(&state, &registration)?;
    quote_for(&vehicle)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("engine capacity for {registration}")))
}

// GET /api/cities
pub async fn get_cities(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(cities_of(state.dataset.as_ref()).into_iter().collect())
}

// GET /api/cities/:city/areas
pub async fn get_areas(
    State(state): State<Arc<AppState>>,
    Path(city): Path<String>,
) -> Json<Vec<String>> {
    Json(areas_of(state.dataset.as_ref(), &city).into_iter().collect())
}

// GET /api/cities/:city/areas/:area/stations
pub async fn get_stations(
    State(state): State<Arc<AppState>>,
    Path((city, area)): Path<(String, String)>,
) -> Json<Vec<Station>> {
    Json(stations_of(state.dataset.as_ref(), &city, &area))
}

#[derive(Deserialize)]
pub struct StationSearchQuery {
    pub city: Option<String>,
    pub q: Option<String>,
}

// GET /api/stations
pub async fn find_stations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StationSearchQuery>,
) -> Json<Vec<Station>> {
    Json(search_stations(
        state.dataset.as_ref(),
        query.city.as_deref(),
        query.q.as_deref(),
    ))
}
