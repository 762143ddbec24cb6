use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DateAvailability;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Station {
    pub name: String,
    pub city: String,
    pub area: String,
    pub price: f64,
    pub available_dates: Vec<DateAvailability>,
}

impl Station {
    pub fn availability_on(&self, date: NaiveDate) -> Option<&DateAvailability> {
        self.available_dates.iter().find(|d| d.date == date)
    }
}
