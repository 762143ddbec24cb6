use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::models::{VehicleRecord, VehicleRepository};

/// Trims and uppercases a registration. Returns `None` for empty input or
/// input that still contains whitespace (the user is mid-typing).
pub fn normalize_registration(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return None;
    }
    Some(trimmed.to_uppercase())
}

/// Exact, case-insensitive lookup. Input that fails normalization never
/// reaches the repository.
pub fn lookup(repo: &dyn VehicleRepository, registration: &str) -> Option<VehicleRecord> {
    let normalized = normalize_registration(registration)?;
    repo.find_by_registration(&normalized)
}

#[async_trait]
pub trait LookupPort: Send + Sync {
    async fn lookup(&self, registration: &str) -> Option<VehicleRecord>;
}

/// Resolves against the static dataset after a fixed delay that stands in
/// for network latency.
pub struct DatasetLookup {
    repo: Arc<dyn VehicleRepository>,
    delay: Duration,
}

impl DatasetLookup {
    pub fn new(repo: Arc<dyn VehicleRepository>, delay: Duration) -> Self {
        Self { repo, delay }
    }
}

#[async_trait]
impl LookupPort for DatasetLookup {
    async fn lookup(&self, registration: &str) -> Option<VehicleRecord> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        lookup(self.repo.as_ref(), registration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRepo {
        calls: AtomicUsize,
        vehicles: Vec<VehicleRecord>,
    }

    impl VehicleRepository for CountingRepo {
        fn find_by_registration(&self, registration: &str) -> Option<VehicleRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.vehicles
                .iter()
                .find(|v| v.registration_number.to_uppercase() == registration)
                .cloned()
        }
    }

    fn repo() -> CountingRepo {
        CountingRepo {
            calls: AtomicUsize::new(0),
            vehicles: vec![VehicleRecord {
                registration_number: "ABC-123".to_string(),
                name: "Toyota Corolla".to_string(),
                variant: "GLi".to_string(),
                color: "White".to_string(),
                model_year: "2019".to_string(),
                owner: "Ahmed Khan".to_string(),
                chassis_number: "NZE170".to_string(),
                registration_date: "2019-03-02".to_string(),
                engine_cc: Some("1300".to_string()),
                vehicle_type: None,
            }],
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_registration("  abc-123 ").as_deref(), Some("ABC-123"));
        assert_eq!(normalize_registration("ABC 123"), None);
        assert_eq!(normalize_registration("ABC\t123"), None);
        assert_eq!(normalize_registration("   "), None);
    }

    #[test]
    fn test_lookup_found_case_insensitive() {
        let repo = repo();
        let found = lookup(&repo, "abc-123").unwrap();
        assert_eq!(found.registration_number, "ABC-123");
    }

    #[test]
    fn test_lookup_not_found() {
        let repo = repo();
        assert!(lookup(&repo, "ZZZ-999").is_none());
        assert_eq!(repo.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_whitespace_input_skips_scan() {
        let repo = repo();
        for input in ["ABC 123", "A B C", "ABC-\n123", ""] {
            assert!(lookup(&repo, input).is_none());
        }
        assert_eq!(repo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dataset_lookup_port() {
        let port = DatasetLookup::new(Arc::new(repo()), Duration::ZERO);
        assert!(port.lookup("abc-123").await.is_some());
        assert!(port.lookup("ZZZ-999").await.is_none());
    }
}
