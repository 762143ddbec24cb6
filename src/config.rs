use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub dataset_path: String,
    pub admin_token: String,
    pub payment_url: String,
    pub payment_secret: String,
    pub lookup_delay: Duration,
    pub submit_delay: Duration,
    pub session_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "vics.db".to_string()),
            dataset_path: env::var("DATASET_PATH")
                .unwrap_or_else(|_| "data/vics_dataset.json".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            payment_url: env::var("PAYMENT_URL").unwrap_or_default(),
            payment_secret: env::var("PAYMENT_SECRET").unwrap_or_default(),
            lookup_delay: millis_from_env("LOOKUP_DELAY_MS", 1000),
            submit_delay: millis_from_env("SUBMIT_DELAY_MS", 1500),
            session_ttl: Duration::from_secs(
                env::var("SESSION_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(1800),
            ),
        }
    }
}

fn millis_from_env(key: &str, default: u64) -> Duration {
    let ms = env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default);
    Duration::from_millis(ms)
}
