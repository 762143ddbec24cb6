use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfirmedBooking {
    pub psid: String,
    pub registration_number: String,
    pub vehicle_name: Option<String>,
    pub owner: Option<String>,
    pub city: String,
    pub area: String,
    pub station_name: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub amount: f64,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
    pub paid_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Paid,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Paid => "paid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "paid" => Some(BookingStatus::Paid),
            _ => None,
        }
    }
}

/// What the payment collaborator receives once a booking is submitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentHandoff {
    pub psid: String,
    pub amount: f64,
}

impl From<&ConfirmedBooking> for PaymentHandoff {
    fn from(booking: &ConfirmedBooking) -> Self {
        Self {
            psid: booking.psid.clone(),
            amount: booking.amount,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum BookingEventKind {
    Submitted,
    Paid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingEvent {
    pub kind: BookingEventKind,
    pub psid: String,
    pub station_name: String,
    pub amount: f64,
}
