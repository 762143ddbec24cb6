use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use rusqlite::Connection;

use crate::db::queries;
use crate::models::ConfirmedBooking;

#[async_trait]
pub trait SubmitPort: Send + Sync {
    async fn submit(&self, booking: &ConfirmedBooking) -> anyhow::Result<()>;
}

/// Records submitted bookings in the SQLite ledger after a fixed delay.
pub struct LedgerSubmitter {
    db: Arc<Mutex<Connection>>,
    delay: Duration,
}

impl LedgerSubmitter {
    pub fn new(db: Arc<Mutex<Connection>>, delay: Duration) -> Self {
        Self { db, delay }
    }
}

#[async_trait]
impl SubmitPort for LedgerSubmitter {
    async fn submit(&self, booking: &ConfirmedBooking) -> anyhow::Result<()> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let inserted = {
            let db = self.db.lock().unwrap_or_else(|e| e.into_inner());
            queries::record_booking(&db, booking).context("failed to record booking")?
        };
        if !inserted {
            anyhow::bail!("PSID {} has already been issued", booking.psid);
        }
        Ok(())
    }
}
