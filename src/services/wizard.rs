use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::models::{
    BookingDraft, BookingStatus, ConfirmedBooking, StationRepository, VehicleLookupState,
    VehicleRecord, VehicleRepository, WizardStep,
};
use crate::services::availability::{is_selectable, selectable_entry, slots_for};
use crate::services::location::{areas_of, cities_of, find_station, stations_of};
use crate::services::lookup::normalize_registration;
use crate::services::psid::{generate_psid, PsidSource};

/// Every variant is recoverable: the wizard is left exactly as it was.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WizardError {
    #[error("no vehicle found for registration {0}")]
    VehicleNotFound(String),

    #[error("registration number is incomplete")]
    RegistrationIncomplete,

    #[error("lookup result for {0} arrived after the registration changed")]
    StaleLookup(String),

    #[error("cannot move from step {from} to step {to}")]
    InvalidStepTransition { from: u8, to: u8 },

    #[error("{0} is not available for inspection")]
    DateNotSelectable(NaiveDate),

    #[error("unknown {kind}: {value}")]
    UnknownSelection { kind: &'static str, value: String },

    #[error("a vehicle lookup is already in progress")]
    LookupInFlight,

    #[error("a submission is already in progress")]
    SubmissionInFlight,

    #[error("booking has already been submitted")]
    AlreadySubmitted,
}

/// Holds an in-flight flag for as long as it lives; dropping it clears the
/// flag, whichever way the guarded work ends.
#[derive(Debug)]
pub struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct PendingLookup {
    pub registration: String,
    _guard: InFlightGuard,
}

#[derive(Debug)]
pub struct PendingSubmission {
    pub booking: ConfirmedBooking,
    _guard: InFlightGuard,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WizardAction {
    Next,
    Back,
    JumpTo { step: u8 },
    Submit,
}

/// Four-step booking flow: vehicle, station, date/time, confirmation.
pub struct BookingWizard {
    vehicles: Arc<dyn VehicleRepository>,
    stations: Arc<dyn StationRepository>,
    psids: Arc<dyn PsidSource>,
    draft: BookingDraft,
    confirmed: Option<ConfirmedBooking>,
    lookup_in_flight: Arc<AtomicBool>,
    submit_in_flight: Arc<AtomicBool>,
}

impl BookingWizard {
    pub fn new(
        vehicles: Arc<dyn VehicleRepository>,
        stations: Arc<dyn StationRepository>,
        psids: Arc<dyn PsidSource>,
    ) -> Self {
        Self {
            vehicles,
            stations,
            psids,
            draft: BookingDraft::default(),
            confirmed: None,
            lookup_in_flight: Arc::new(AtomicBool::new(false)),
            submit_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn current_step(&self) -> WizardStep {
        self.draft.current_step
    }

    pub fn confirmed(&self) -> Option<&ConfirmedBooking> {
        self.confirmed.as_ref()
    }

    pub fn is_submitted(&self) -> bool {
        self.confirmed.is_some()
    }

    pub fn is_looking_up(&self) -> bool {
        self.lookup_in_flight.load(Ordering::SeqCst)
    }

    pub fn is_submitting(&self) -> bool {
        self.submit_in_flight.load(Ordering::SeqCst)
    }

    fn ensure_editable(&self) -> Result<(), WizardError> {
        if self.is_submitted() {
            return Err(WizardError::AlreadySubmitted);
        }
        if self.is_submitting() {
            return Err(WizardError::SubmissionInFlight);
        }
        Ok(())
    }

    fn station_entry(&self) -> Option<crate::models::Station> {
        find_station(
            self.stations.as_ref(),
            &self.draft.city,
            &self.draft.area,
            &self.draft.station_name,
        )
    }

    // ── Step 1: vehicle ──

    /// Records the normalized registration and marks a lookup as pending. A
    /// changed registration forgets the previous lookup result.
    pub fn begin_lookup(&mut self, input: &str) -> Result<PendingLookup, WizardError> {
        self.ensure_editable()?;
        let registration =
            normalize_registration(input).ok_or(WizardError::RegistrationIncomplete)?;
        let guard =
            InFlightGuard::acquire(&self.lookup_in_flight).ok_or(WizardError::LookupInFlight)?;

        if registration != self.draft.registration_number {
            self.draft.registration_number = registration.clone();
            self.draft.vehicle = VehicleLookupState::NotSearched;
        }

        Ok(PendingLookup {
            registration,
            _guard: guard,
        })
    }

    pub fn finish_lookup(
        &mut self,
        pending: PendingLookup,
        result: Option<VehicleRecord>,
    ) -> Result<VehicleRecord, WizardError> {
        if pending.registration != self.draft.registration_number || self.is_submitted() {
            return Err(WizardError::StaleLookup(pending.registration));
        }

        match result {
            Some(vehicle) => {
                self.draft.vehicle = VehicleLookupState::Found(vehicle.clone());
                Ok(vehicle)
            }
            None => {
                self.draft.vehicle = VehicleLookupState::NotFound;
                Err(WizardError::VehicleNotFound(pending.registration))
            }
        }
    }

    /// Synchronous lookup against the wizard's own repository.
    pub fn lookup_vehicle(&mut self, input: &str) -> Result<VehicleRecord, WizardError> {
        let pending = self.begin_lookup(input)?;
        let result = self.vehicles.find_by_registration(&pending.registration);
        self.finish_lookup(pending, result)
    }

    // ── Step 2: location ──

    pub fn select_city(&mut self, city: &str) -> Result<(), WizardError> {
        self.ensure_editable()?;
        if !cities_of(self.stations.as_ref()).contains(city) {
            return Err(WizardError::UnknownSelection {
                kind: "city",
                value: city.to_string(),
            });
        }

        self.draft.city = city.to_string();
        self.draft.area.clear();
        self.draft.station_name.clear();
        self.draft.time_slot = None;
        Ok(())
    }

    pub fn select_area(&mut self, area: &str) -> Result<(), WizardError> {
        self.ensure_editable()?;
        if !areas_of(self.stations.as_ref(), &self.draft.city).contains(area) {
            return Err(WizardError::UnknownSelection {
                kind: "area",
                value: area.to_string(),
            });
        }

        self.draft.area = area.to_string();
        self.draft.station_name.clear();
        self.draft.time_slot = None;
        Ok(())
    }

    pub fn select_station(&mut self, name: &str) -> Result<(), WizardError> {
        self.ensure_editable()?;
        let station = find_station(
            self.stations.as_ref(),
            &self.draft.city,
            &self.draft.area,
            name,
        )
        .ok_or_else(|| WizardError::UnknownSelection {
            kind: "station",
            value: name.to_string(),
        })?;

        if station.name != self.draft.station_name {
            self.draft.station_name = station.name;
            self.draft.time_slot = None;
        }
        Ok(())
    }

    // ── Step 3: date and time ──

    /// Rejects dates the station does not offer or that fall on a weekend
    /// or the fixed holiday.
    pub fn select_date(&mut self, date: NaiveDate) -> Result<(), WizardError> {
        self.ensure_editable()?;
        let station = self.station_entry().ok_or_else(|| WizardError::UnknownSelection {
            kind: "station",
            value: self.draft.station_name.clone(),
        })?;

        if selectable_entry(&station, date).is_none() {
            return Err(WizardError::DateNotSelectable(date));
        }

        if self.draft.date != Some(date) {
            self.draft.date = Some(date);
            self.draft.time_slot = None;
        }
        Ok(())
    }

    pub fn select_time_slot(&mut self, slot: &str) -> Result<(), WizardError> {
        self.ensure_editable()?;
        if !self.available_slots().iter().any(|s| s == slot) {
            return Err(WizardError::UnknownSelection {
                kind: "time slot",
                value: slot.to_string(),
            });
        }
        self.draft.time_slot = Some(slot.to_string());
        Ok(())
    }

    pub fn available_slots(&self) -> Vec<String> {
        let Some(date) = self.draft.date else {
            return vec![];
        };
        self.station_entry()
            .and_then(|s| s.availability_on(date).map(slots_for))
            .unwrap_or_default()
    }

    // ── Transitions ──

    pub fn can_advance(&self) -> bool {
        self.draft.can_advance(self.draft.current_step)
    }

    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_editable()?;
        let from = self.draft.current_step;
        let to = from.next().ok_or(WizardError::InvalidStepTransition {
            from: from.number(),
            to: from.number() + 1,
        })?;
        if !self.draft.can_advance(from) {
            return Err(WizardError::InvalidStepTransition {
                from: from.number(),
                to: to.number(),
            });
        }
        self.draft.current_step = to;
        Ok(to)
    }

    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_editable()?;
        let from = self.draft.current_step;
        let to = from.previous().ok_or(WizardError::InvalidStepTransition {
            from: from.number(),
            to: from.number().saturating_sub(1),
        })?;
        self.draft.current_step = to;
        Ok(to)
    }

    /// Revisit any step up to the current one, or advance by exactly one
    /// when the current step is complete.
    pub fn jump_to(&mut self, step: u8) -> Result<WizardStep, WizardError> {
        self.ensure_editable()?;
        let from = self.draft.current_step;
        let rejected = WizardError::InvalidStepTransition {
            from: from.number(),
            to: step,
        };
        let target = WizardStep::from_number(step).ok_or_else(|| rejected.clone())?;

        if target <= from {
            self.draft.current_step = target;
            return Ok(target);
        }
        if Some(target) == from.next() && self.draft.can_advance(from) {
            self.draft.current_step = target;
            return Ok(target);
        }
        Err(rejected)
    }

    // ── Submission ──

    pub fn begin_submit(&mut self) -> Result<PendingSubmission, WizardError> {
        if self.is_submitted() {
            return Err(WizardError::AlreadySubmitted);
        }
        let from = self.draft.current_step;
        if from != WizardStep::Confirmation || !self.draft.is_complete() {
            return Err(WizardError::InvalidStepTransition {
                from: from.number(),
                to: from.number() + 1,
            });
        }
        let guard = InFlightGuard::acquire(&self.submit_in_flight)
            .ok_or(WizardError::SubmissionInFlight)?;

        let station = self.station_entry().ok_or_else(|| WizardError::UnknownSelection {
            kind: "station",
            value: self.draft.station_name.clone(),
        })?;
        let (Some(date), Some(time_slot)) = (self.draft.date, self.draft.time_slot.clone()) else {
            return Err(WizardError::InvalidStepTransition {
                from: from.number(),
                to: from.number() + 1,
            });
        };
        let vehicle = self.draft.vehicle.vehicle();

        let booking = ConfirmedBooking {
            psid: generate_psid(self.psids.as_ref()),
            registration_number: self.draft.registration_number.clone(),
            vehicle_name: vehicle.map(|v| v.name.clone()),
            owner: vehicle.map(|v| v.owner.clone()),
            city: self.draft.city.clone(),
            area: self.draft.area.clone(),
            station_name: station.name,
            date,
            time_slot,
            amount: station.price,
            status: BookingStatus::Pending,
            created_at: Utc::now().naive_utc(),
            paid_at: None,
        };

        Ok(PendingSubmission {
            booking,
            _guard: guard,
        })
    }

    pub fn finish_submit(&mut self, pending: PendingSubmission) -> ConfirmedBooking {
        let booking = pending.booking;
        self.confirmed = Some(booking.clone());
        booking
    }

    /// Synchronous submission with no external collaborator.
    pub fn submit(&mut self) -> Result<ConfirmedBooking, WizardError> {
        let pending = self.begin_submit()?;
        Ok(self.finish_submit(pending))
    }

    /// Discards the draft and any confirmation, back to an empty step 1.
    pub fn reset(&mut self) -> Result<(), WizardError> {
        if self.is_submitting() {
            return Err(WizardError::SubmissionInFlight);
        }
        self.draft = BookingDraft::default();
        self.confirmed = None;
        Ok(())
    }

    pub fn valid_actions(&self) -> Vec<WizardAction> {
        if self.is_submitted() || self.is_submitting() {
            return vec![];
        }

        let step = self.draft.current_step;
        let advance = self.draft.can_advance(step);
        let mut actions = vec![];

        if step != WizardStep::Confirmation && advance {
            actions.push(WizardAction::Next);
        }
        if step.previous().is_some() {
            actions.push(WizardAction::Back);
        }
        for target in WizardStep::ALL {
            if target <= step || (Some(target) == step.next() && advance) {
                actions.push(WizardAction::JumpTo {
                    step: target.number(),
                });
            }
        }
        if step == WizardStep::Confirmation && self.draft.is_complete() {
            actions.push(WizardAction::Submit);
        }
        actions
    }

    pub fn view(&self) -> WizardView {
        let repo = self.stations.as_ref();
        let station = self.station_entry();

        WizardView {
            step: self.draft.current_step.number(),
            draft: self.draft.clone(),
            steps: WizardStep::ALL
                .iter()
                .map(|s| StepStatus {
                    step: s.number(),
                    name: *s,
                    complete: match s {
                        WizardStep::Confirmation => self.is_submitted(),
                        other => self.draft.can_advance(*other),
                    },
                })
                .collect(),
            actions: self.valid_actions(),
            options: WizardOptions {
                cities: cities_of(repo).into_iter().collect(),
                areas: areas_of(repo, &self.draft.city).into_iter().collect(),
                stations: stations_of(repo, &self.draft.city, &self.draft.area)
                    .into_iter()
                    .map(|s| StationOption {
                        name: s.name,
                        price: s.price,
                    })
                    .collect(),
                dates: station
                    .map(|s| {
                        s.available_dates
                            .iter()
                            .map(|d| DateOption {
                                date: d.date,
                                selectable: is_selectable(d),
                                is_weekend: d.is_weekend,
                                is_holiday: d.is_holiday,
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
                time_slots: self.available_slots(),
            },
            looking_up: self.is_looking_up(),
            submitting: self.is_submitting(),
            confirmed: self.confirmed.clone(),
        }
    }
}

/// Everything a UI needs to render the wizard and offer valid actions.
#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    pub step: u8,
    pub draft: BookingDraft,
    pub steps: Vec<StepStatus>,
    pub actions: Vec<WizardAction>,
    pub options: WizardOptions,
    pub looking_up: bool,
    pub submitting: bool,
    pub confirmed: Option<ConfirmedBooking>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepStatus {
    pub step: u8,
    pub name: WizardStep,
    pub complete: bool,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct WizardOptions {
    pub cities: Vec<String>,
    pub areas: Vec<String>,
    pub stations: Vec<StationOption>,
    pub dates: Vec<DateOption>,
    pub time_slots: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StationOption {
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DateOption {
    pub date: NaiveDate,
    pub selectable: bool,
    pub is_weekend: bool,
    pub is_holiday: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dataset, DateAvailability, Station};
    use crate::services::psid::{is_valid_psid, SequenceSource};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn vehicle(reg: &str) -> VehicleRecord {
        VehicleRecord {
            registration_number: reg.to_string(),
            name: "Toyota Corolla".to_string(),
            variant: "GLi".to_string(),
            color: "White".to_string(),
            model_year: "2019".to_string(),
            owner: "Ahmed Khan".to_string(),
            chassis_number: "NZE170".to_string(),
            registration_date: "2019-03-02".to_string(),
            engine_cc: Some("1300".to_string()),
            vehicle_type: None,
        }
    }

    fn station(name: &str, area: &str, dates: Vec<DateAvailability>) -> Station {
        Station {
            name: name.to_string(),
            city: "Lahore".to_string(),
            area: area.to_string(),
            price: 1000.0,
            available_dates: dates,
        }
    }

    fn dataset() -> Arc<Dataset> {
        let june10 = DateAvailability::from_calendar(d("2024-06-10"), &["10:00 AM", "11:00 AM"]);
        let june11 = DateAvailability::from_calendar(d("2024-06-11"), &["02:00 PM"]);
        let saturday = DateAvailability::from_calendar(d("2024-06-15"), &["10:00 AM"]);
        let holiday = DateAvailability::from_calendar(d("2024-08-14"), &["10:00 AM"]);
        Arc::new(Dataset::new(
            vec![vehicle("ABC-123")],
            vec![
                station(
                    "Lahore Main",
                    "Gulberg",
                    vec![june10.clone(), june11, saturday, holiday],
                ),
                station("Lahore North", "Gulberg", vec![june10.clone()]),
                station("Cantt Center", "Cantt", vec![june10]),
                Station {
                    name: "Islamabad Center".to_string(),
                    city: "Islamabad".to_string(),
                    area: "G-9".to_string(),
                    price: 1200.0,
                    available_dates: vec![],
                },
            ],
        ))
    }

    fn wizard() -> BookingWizard {
        let data = dataset();
        BookingWizard::new(
            data.clone(),
            data,
            Arc::new(SequenceSource::new(vec![4321])),
        )
    }

    /// A wizard filled in up to the confirmation step.
    fn confirmed_wizard() -> BookingWizard {
        let mut w = wizard();
        w.lookup_vehicle("ABC-123").unwrap();
        w.next().unwrap();
        w.select_city("Lahore").unwrap();
        w.select_area("Gulberg").unwrap();
        w.select_station("Lahore Main").unwrap();
        w.next().unwrap();
        w.select_date(d("2024-06-10")).unwrap();
        w.select_time_slot("10:00 AM").unwrap();
        w.next().unwrap();
        w
    }

    #[test]
    fn test_new_wizard_is_empty() {
        let w = wizard();
        assert_eq!(w.current_step(), WizardStep::VehicleInfo);
        assert_eq!(w.draft(), &BookingDraft::default());
        assert!(!w.is_submitted());
    }

    #[test]
    fn test_known_registration_advances() {
        let mut w = wizard();
        let found = w.lookup_vehicle("ABC-123").unwrap();
        assert_eq!(found.registration_number, "ABC-123");
        assert_eq!(w.next().unwrap(), WizardStep::StationSelect);
        assert_eq!(w.current_step().number(), 2);
    }

    #[test]
    fn test_unknown_registration_blocks_next() {
        let mut w = wizard();
        let err = w.lookup_vehicle("ZZZ-999").unwrap_err();
        assert_eq!(err, WizardError::VehicleNotFound("ZZZ-999".to_string()));
        assert_eq!(w.draft().vehicle, VehicleLookupState::NotFound);
        assert!(matches!(
            w.next(),
            Err(WizardError::InvalidStepTransition { from: 1, to: 2 })
        ));
        assert_eq!(w.current_step().number(), 1);
    }

    #[test]
    fn test_not_found_differs_from_not_searched() {
        let mut w = wizard();
        assert_eq!(w.draft().vehicle, VehicleLookupState::NotSearched);
        let _ = w.lookup_vehicle("ZZZ-999");
        assert_eq!(w.draft().vehicle, VehicleLookupState::NotFound);

        let pending = w.begin_lookup("zzz-998").unwrap();
        assert_eq!(w.draft().registration_number, "ZZZ-998");
        assert_eq!(w.draft().vehicle, VehicleLookupState::NotSearched);
        drop(pending);
    }

    #[test]
    fn test_whitespace_registration_has_no_side_effects() {
        let mut w = wizard();
        w.lookup_vehicle("ABC-123").unwrap();
        let before = w.draft().clone();
        assert_eq!(
            w.lookup_vehicle("ABC 123").unwrap_err(),
            WizardError::RegistrationIncomplete
        );
        assert_eq!(w.draft(), &before);
        assert!(!w.is_looking_up());
    }

    #[test]
    fn test_lookup_in_flight_rejects_second_lookup() {
        let mut w = wizard();
        let pending = w.begin_lookup("ABC-123").unwrap();
        assert!(w.is_looking_up());
        assert_eq!(w.begin_lookup("ABC-123").unwrap_err(), WizardError::LookupInFlight);
        w.finish_lookup(pending, Some(vehicle("ABC-123"))).unwrap();
        assert!(!w.is_looking_up());
    }

    #[test]
    fn test_dropped_lookup_clears_flag() {
        let mut w = wizard();
        let pending = w.begin_lookup("ABC-123").unwrap();
        drop(pending);
        assert!(!w.is_looking_up());
        assert!(w.begin_lookup("ABC-123").is_ok());
    }

    #[test]
    fn test_stale_lookup_ignored() {
        let mut w = wizard();
        let pending = w.begin_lookup("ABC-123").unwrap();
        w.reset().unwrap();
        let err = w.finish_lookup(pending, Some(vehicle("ABC-123"))).unwrap_err();
        assert_eq!(err, WizardError::StaleLookup("ABC-123".to_string()));
        assert_eq!(w.draft().vehicle, VehicleLookupState::NotSearched);
        assert_eq!(w.draft().registration_number, "");
    }

    #[test]
    fn test_city_selection_cascades() {
        let mut w = wizard();
        w.select_city("Lahore").unwrap();
        w.select_area("Gulberg").unwrap();
        w.select_station("Lahore Main").unwrap();

        w.select_city("Islamabad").unwrap();
        assert_eq!(w.draft().city, "Islamabad");
        assert!(w.draft().area.is_empty());
        assert!(w.draft().station_name.is_empty());

        let once = w.draft().clone();
        w.select_city("Islamabad").unwrap();
        assert_eq!(w.draft(), &once);
    }

    #[test]
    fn test_area_selection_clears_station() {
        let mut w = wizard();
        w.select_city("Lahore").unwrap();
        w.select_area("Gulberg").unwrap();
        w.select_station("Lahore Main").unwrap();
        w.select_area("Cantt").unwrap();
        assert_eq!(w.draft().area, "Cantt");
        assert!(w.draft().station_name.is_empty());
    }

    #[test]
    fn test_unknown_selections_rejected() {
        let mut w = wizard();
        assert!(matches!(
            w.select_city("Quetta"),
            Err(WizardError::UnknownSelection { kind: "city", .. })
        ));
        w.select_city("Lahore").unwrap();
        assert!(w.select_area("G-9").is_err());
        w.select_area("Cantt").unwrap();
        assert!(w.select_station("Lahore Main").is_err());
        assert!(w.draft().station_name.is_empty());
    }

    #[test]
    fn test_station_change_resets_time_slot() {
        let mut w = wizard();
        w.select_city("Lahore").unwrap();
        w.select_area("Gulberg").unwrap();
        w.select_station("Lahore Main").unwrap();
        w.select_date(d("2024-06-10")).unwrap();
        w.select_time_slot("10:00 AM").unwrap();

        w.select_station("Lahore Main").unwrap();
        assert_eq!(w.draft().time_slot.as_deref(), Some("10:00 AM"));

        w.select_station("Lahore North").unwrap();
        assert_eq!(w.draft().station_name, "Lahore North");
        assert_eq!(w.draft().time_slot, None);
        assert_eq!(w.draft().date, Some(d("2024-06-10")));
    }

    #[test]
    fn test_date_change_resets_time_slot() {
        let mut w = wizard();
        w.select_city("Lahore").unwrap();
        w.select_area("Gulberg").unwrap();
        w.select_station("Lahore Main").unwrap();
        w.select_date(d("2024-06-10")).unwrap();
        w.select_time_slot("11:00 AM").unwrap();
        w.select_date(d("2024-06-11")).unwrap();
        assert_eq!(w.draft().time_slot, None);
        assert_eq!(w.available_slots(), vec!["02:00 PM".to_string()]);
    }

    #[test]
    fn test_tapping_disabled_date_changes_nothing() {
        let mut w = wizard();
        w.select_city("Lahore").unwrap();
        w.select_area("Gulberg").unwrap();
        w.select_station("Lahore Main").unwrap();
        w.select_date(d("2024-06-10")).unwrap();
        w.select_time_slot("10:00 AM").unwrap();
        let before = w.draft().clone();

        for tapped in ["2024-08-14", "2024-06-15", "2024-06-20"] {
            let err = w.select_date(d(tapped)).unwrap_err();
            assert_eq!(err, WizardError::DateNotSelectable(d(tapped)));
            assert_eq!(w.draft(), &before);
        }
    }

    #[test]
    fn test_holiday_not_selectable_on_fresh_draft() {
        let mut w = wizard();
        w.select_city("Lahore").unwrap();
        w.select_area("Gulberg").unwrap();
        w.select_station("Lahore Main").unwrap();
        assert!(w.select_date(d("2024-08-14")).is_err());
        assert_eq!(w.draft().date, None);
    }

    #[test]
    fn test_slot_must_belong_to_date() {
        let mut w = wizard();
        w.select_city("Lahore").unwrap();
        w.select_area("Gulberg").unwrap();
        w.select_station("Lahore Main").unwrap();
        assert!(w.select_time_slot("10:00 AM").is_err());
        w.select_date(d("2024-06-10")).unwrap();
        assert!(w.select_time_slot("09:00 PM").is_err());
        assert_eq!(w.draft().time_slot, None);
    }

    #[test]
    fn test_jump_rules() {
        let mut w = wizard();
        assert!(w.jump_to(3).is_err());
        assert!(w.jump_to(2).is_err());
        assert_eq!(w.current_step(), WizardStep::VehicleInfo);

        w.lookup_vehicle("ABC-123").unwrap();
        assert_eq!(w.jump_to(2).unwrap(), WizardStep::StationSelect);
        assert!(w.jump_to(4).is_err());
        assert!(w.jump_to(0).is_err());
        assert!(w.jump_to(9).is_err());
        assert_eq!(w.jump_to(1).unwrap(), WizardStep::VehicleInfo);
        assert_eq!(w.jump_to(1).unwrap(), WizardStep::VehicleInfo);
    }

    #[test]
    fn test_far_jump_is_noop() {
        let mut w = confirmed_wizard();
        w.jump_to(1).unwrap();
        let before = w.draft().clone();
        assert!(w.jump_to(3).is_err());
        assert!(w.jump_to(4).is_err());
        assert_eq!(w.draft(), &before);
    }

    #[test]
    fn test_back_keeps_data() {
        let mut w = confirmed_wizard();
        assert_eq!(w.back().unwrap(), WizardStep::DateTime);
        assert_eq!(w.back().unwrap(), WizardStep::StationSelect);
        assert_eq!(w.back().unwrap(), WizardStep::VehicleInfo);
        assert!(w.back().is_err());
        assert_eq!(w.draft().time_slot.as_deref(), Some("10:00 AM"));
        assert_eq!(w.draft().station_name, "Lahore Main");
    }

    #[test]
    fn test_next_capped_at_confirmation() {
        let mut w = confirmed_wizard();
        assert_eq!(w.current_step(), WizardStep::Confirmation);
        assert!(w.next().is_err());
        assert_eq!(w.current_step(), WizardStep::Confirmation);
    }

    #[test]
    fn test_submit_only_from_confirmation() {
        let mut w = wizard();
        assert!(matches!(
            w.submit(),
            Err(WizardError::InvalidStepTransition { .. })
        ));
        assert!(!w.is_submitted());
    }

    #[test]
    fn test_submit_creates_pending_booking() {
        let mut w = confirmed_wizard();
        let booking = w.submit().unwrap();
        assert_eq!(booking.psid, "VICS-004321");
        assert!(is_valid_psid(&booking.psid));
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.station_name, "Lahore Main");
        assert_eq!(booking.amount, 1000.0);
        assert_eq!(booking.vehicle_name.as_deref(), Some("Toyota Corolla"));
        assert_eq!(w.confirmed(), Some(&booking));
        assert!(w.valid_actions().is_empty());
        assert_eq!(w.submit().unwrap_err(), WizardError::AlreadySubmitted);
    }

    #[test]
    fn test_double_submit_while_in_flight() {
        let mut w = confirmed_wizard();
        let first = w.begin_submit().unwrap();
        assert!(w.is_submitting());
        assert_eq!(w.begin_submit().unwrap_err(), WizardError::SubmissionInFlight);
        assert_eq!(w.select_time_slot("11:00 AM").unwrap_err(), WizardError::SubmissionInFlight);
        w.finish_submit(first);
        assert!(!w.is_submitting());
        assert!(w.is_submitted());
    }

    #[test]
    fn test_failed_submission_clears_flag() {
        let mut w = confirmed_wizard();
        let pending = w.begin_submit().unwrap();
        drop(pending);
        assert!(!w.is_submitting());
        assert!(!w.is_submitted());
        assert!(w.submit().is_ok());
    }

    #[test]
    fn test_reset_discards_draft() {
        let mut w = confirmed_wizard();
        w.submit().unwrap();
        w.reset().unwrap();
        assert_eq!(w.draft(), &BookingDraft::default());
        assert!(w.confirmed().is_none());
    }

    #[test]
    fn test_valid_actions() {
        let mut w = wizard();
        assert_eq!(w.valid_actions(), vec![WizardAction::JumpTo { step: 1 }]);

        w.lookup_vehicle("ABC-123").unwrap();
        assert_eq!(
            w.valid_actions(),
            vec![
                WizardAction::Next,
                WizardAction::JumpTo { step: 1 },
                WizardAction::JumpTo { step: 2 },
            ]
        );

        let w = confirmed_wizard();
        let actions = w.valid_actions();
        assert!(actions.contains(&WizardAction::Submit));
        assert!(actions.contains(&WizardAction::Back));
        assert!(!actions.contains(&WizardAction::Next));
    }

    #[test]
    fn test_view_options_follow_selection() {
        let mut w = wizard();
        w.select_city("Lahore").unwrap();
        w.select_area("Gulberg").unwrap();
        w.select_station("Lahore Main").unwrap();
        w.select_date(d("2024-06-10")).unwrap();

        let view = w.view();
        assert_eq!(view.step, 1);
        assert_eq!(view.options.cities, vec!["Islamabad", "Lahore"]);
        assert_eq!(view.options.areas, vec!["Cantt", "Gulberg"]);
        assert_eq!(view.options.stations.len(), 2);
        assert_eq!(view.options.dates.len(), 4);
        assert_eq!(view.options.dates.iter().filter(|d| d.selectable).count(), 2);
        assert_eq!(view.options.time_slots, vec!["10:00 AM", "11:00 AM"]);
        assert!(!view.steps[0].complete);
        assert!(view.steps[1].complete);
    }
}
