use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::VehicleRecord;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    VehicleInfo,
    StationSelect,
    DateTime,
    Confirmation,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::VehicleInfo,
        WizardStep::StationSelect,
        WizardStep::DateTime,
        WizardStep::Confirmation,
    ];

    pub fn number(&self) -> u8 {
        match self {
            WizardStep::VehicleInfo => 1,
            WizardStep::StationSelect => 2,
            WizardStep::DateTime => 3,
            WizardStep::Confirmation => 4,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(WizardStep::VehicleInfo),
            2 => Some(WizardStep::StationSelect),
            3 => Some(WizardStep::DateTime),
            4 => Some(WizardStep::Confirmation),
            _ => None,
        }
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(&self) -> Option<Self> {
        Self::from_number(self.number().saturating_sub(1))
    }
}

/// Result of the last vehicle lookup for the current registration input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "state", content = "vehicle", rename_all = "snake_case")]
pub enum VehicleLookupState {
    #[default]
    NotSearched,
    Found(VehicleRecord),
    NotFound,
}

impl VehicleLookupState {
    pub fn vehicle(&self) -> Option<&VehicleRecord> {
        match self {
            VehicleLookupState::Found(v) => Some(v),
            _ => None,
        }
    }
}

/// In-progress booking owned by a single wizard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingDraft {
    pub registration_number: String,
    pub vehicle: VehicleLookupState,
    pub city: String,
    pub area: String,
    pub station_name: String,
    pub date: Option<NaiveDate>,
    pub time_slot: Option<String>,
    pub current_step: WizardStep,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            registration_number: String::new(),
            vehicle: VehicleLookupState::NotSearched,
            city: String::new(),
            area: String::new(),
            station_name: String::new(),
            date: None,
            time_slot: None,
            current_step: WizardStep::VehicleInfo,
        }
    }
}

impl BookingDraft {
    /// Whether `step`'s required fields are filled in.
    pub fn can_advance(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::VehicleInfo => {
                !self.registration_number.is_empty() && self.vehicle.vehicle().is_some()
            }
            WizardStep::StationSelect => !self.station_name.is_empty(),
            WizardStep::DateTime => {
                self.date.is_some() && self.time_slot.as_deref().is_some_and(|s| !s.is_empty())
            }
            WizardStep::Confirmation => false,
        }
    }

    /// All three data steps complete; the draft can become a booking.
    pub fn is_complete(&self) -> bool {
        self.can_advance(WizardStep::VehicleInfo)
            && self.can_advance(WizardStep::StationSelect)
            && self.can_advance(WizardStep::DateTime)
    }
}
