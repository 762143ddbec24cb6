pub mod availability;
pub mod booking;
pub mod dataset;
pub mod draft;
pub mod station;
pub mod vehicle;

pub use availability::DateAvailability;
pub use booking::{BookingEvent, BookingEventKind, BookingStatus, ConfirmedBooking, PaymentHandoff};
pub use dataset::{Dataset, StationRepository, VehicleRepository};
pub use draft::{BookingDraft, VehicleLookupState, WizardStep};
pub use station::Station;
pub use vehicle::VehicleRecord;
