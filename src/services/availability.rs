use chrono::NaiveDate;

use crate::models::{DateAvailability, Station};

pub fn is_selectable(d: &DateAvailability) -> bool {
    !(d.is_weekend || d.is_holiday)
}

/// Slots the user may pick on `d`; always empty for a non-selectable date.
pub fn slots_for(d: &DateAvailability) -> Vec<String> {
    if is_selectable(d) {
        d.available_time_slots.clone()
    } else {
        vec![]
    }
}

/// The station's entry for `date`, only if that date can be booked.
pub fn selectable_entry(station: &Station, date: NaiveDate) -> Option<&DateAvailability> {
    station.availability_on(date).filter(|d| is_selectable(d))
}
