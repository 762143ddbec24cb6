use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use vics::config::AppConfig;
use vics::db;
use vics::handlers;
use vics::models::Dataset;
use vics::services::lookup::DatasetLookup;
use vics::services::payment::{HttpPaymentGateway, LogPaymentGateway, PaymentGateway};
use vics::services::psid::ThreadRngSource;
use vics::services::submit::LedgerSubmitter;
use vics::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    let db = Arc::new(Mutex::new(conn));

    let dataset = Arc::new(Dataset::load(&config.dataset_path)?);

    let payments: Box<dyn PaymentGateway> = if config.payment_url.is_empty() {
        tracing::info!("no PAYMENT_URL set, payment hand-offs will only be logged");
        Box::new(LogPaymentGateway)
    } else {
        tracing::info!("handing payments off to {}", config.payment_url);
        Box::new(HttpPaymentGateway::new(config.payment_url.clone()))
    };

    let (events_tx, _) = broadcast::channel(256);

    let state = Arc::new(AppState {
        db: db.clone(),
        config: config.clone(),
        dataset: dataset.clone(),
        lookup: Box::new(DatasetLookup::new(dataset, config.lookup_delay)),
        submitter: Box::new(LedgerSubmitter::new(db, config.submit_delay)),
        payments,
        psids: Arc::new(ThreadRngSource),
        sessions: Mutex::new(HashMap::new()),
        events_tx,
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/vehicles/:registration",
            get(handlers::catalog::get_vehicle),
        )
        .route(
            "/api/vehicles/:registration/fee",
            get(handlers::catalog::get_vehicle_fee),
        )
        .route("/api/cities", get(handlers::catalog::get_cities))
        .route("/api/cities/:city/areas", get(handlers::catalog::get_areas))
        .route(
            "/api/cities/:city/areas/:area/stations",
            get(handlers::catalog::get_stations),
        )
        .route("/api/stations", get(handlers::catalog::find_stations))
        .route("/api/wizard", post(handlers::wizard::create_session))
        .route(
            "/api/wizard/:id",
            get(handlers::wizard::get_session).delete(handlers::wizard::discard_session),
        )
        .route(
            "/api/wizard/:id/registration",
            post(handlers::wizard::set_registration),
        )
        .route("/api/wizard/:id/city", post(handlers::wizard::select_city))
        .route("/api/wizard/:id/area", post(handlers::wizard::select_area))
        .route(
            "/api/wizard/:id/station",
            post(handlers::wizard::select_station),
        )
        .route("/api/wizard/:id/date", post(handlers::wizard::select_date))
        .route(
            "/api/wizard/:id/time-slot",
            post(handlers::wizard::select_time_slot),
        )
        .route("/api/wizard/:id/next", post(handlers::wizard::next_step))
        .route("/api/wizard/:id/back", post(handlers::wizard::previous_step))
        .route("/api/wizard/:id/jump", post(handlers::wizard::jump_to_step))
        .route("/api/wizard/:id/submit", post(handlers::wizard::submit))
        .route("/api/bookings", get(handlers::bookings::list_bookings))
        .route(
            "/api/bookings/summary",
            get(handlers::bookings::booking_summary),
        )
        .route("/api/bookings/events", get(handlers::bookings::events_stream))
        .route("/api/bookings/:psid", get(handlers::bookings::get_booking))
        .route(
            "/api/payments/callback",
            post(handlers::payments::payment_callback),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
