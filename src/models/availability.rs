use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// The single recurring holiday: 14 August, any year.
pub const HOLIDAY_MONTH: u32 = 8;
pub const HOLIDAY_DAY: u32 = 14;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateAvailability {
    pub date: NaiveDate,
    pub is_weekend: bool,
    pub is_holiday: bool,
    pub available_time_slots: Vec<String>,
}

impl DateAvailability {
    /// Builds an entry whose flags follow the calendar rules rather than a fixture.
    pub fn from_calendar(date: NaiveDate, slots: &[&str]) -> Self {
        Self {
            date,
            is_weekend: is_weekend(date),
            is_holiday: is_fixed_holiday(date),
            available_time_slots: slots.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// True when the stored flags disagree with the calendar rules.
    pub fn flags_disagree_with_calendar(&self) -> bool {
        self.is_weekend != is_weekend(self.date) || self.is_holiday != is_fixed_holiday(self.date)
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_fixed_holiday(date: NaiveDate) -> bool {
    date.month() == HOLIDAY_MONTH && date.day() == HOLIDAY_DAY
}

pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("invalid date (expected YYYY-MM-DD): {s}"))
}
