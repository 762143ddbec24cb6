use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::{BookingEvent, Dataset};
use crate::services::lookup::LookupPort;
use crate::services::payment::PaymentGateway;
use crate::services::psid::PsidSource;
use crate::services::session::Session;
use crate::services::submit::SubmitPort;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub dataset: Arc<Dataset>,
    pub lookup: Box<dyn LookupPort>,
    pub submitter: Box<dyn SubmitPort>,
    pub payments: Box<dyn PaymentGateway>,
    pub psids: Arc<dyn PsidSource>,
    pub sessions: Mutex<HashMap<Uuid, Session>>,
    pub events_tx: broadcast::Sender<BookingEvent>,
}

impl AppState {
    pub fn db(&self) -> MutexGuard<'_, Connection> {
        self.db.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn sessions(&self) -> MutexGuard<'_, HashMap<Uuid, Session>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }
}
