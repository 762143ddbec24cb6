use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleRecord {
    pub registration_number: String,
    pub name: String,
    pub variant: String,
    pub color: String,
    pub model_year: String,
    pub owner: String,
    pub chassis_number: String,
    pub registration_date: String,
    pub engine_cc: Option<String>,
    pub vehicle_type: Option<String>,
}

impl VehicleRecord {
    /// Engine capacity in cc, when the fixture carries a parseable value.
    pub fn engine_capacity(&self) -> Option<u32> {
        self.engine_cc
            .as_deref()
            .and_then(|cc| cc.trim().parse().ok())
    }

    pub fn is_diesel(&self) -> bool {
        self.vehicle_type
            .as_deref()
            .map(|t| t.to_lowercase().contains("diesel"))
            .unwrap_or(false)
    }
}
