use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use super::availability::parse_date;
use super::{DateAvailability, Station, VehicleRecord};

/// Read-only access to vehicle records, keyed by normalized registration.
pub trait VehicleRepository: Send + Sync {
    /// `registration` is already trimmed and uppercased.
    fn find_by_registration(&self, registration: &str) -> Option<VehicleRecord>;
}

/// Read-only access to stations grouped by city.
pub trait StationRepository: Send + Sync {
    fn cities(&self) -> Vec<String>;
    fn stations_in(&self, city: &str) -> &[Station];
}

// Field names follow the fixture file, not our model.
#[derive(Debug, Deserialize)]
struct RawDataset {
    #[serde(default)]
    vehicle_information: Vec<RawVehicle>,
    #[serde(default)]
    station_information: BTreeMap<String, Vec<RawStation>>,
}

#[derive(Debug, Deserialize)]
struct RawVehicle {
    vehicle_registration_number: String,
    #[serde(default)]
    vehicle_name: String,
    #[serde(default)]
    variant: String,
    #[serde(default)]
    color: String,
    #[serde(rename = "model year", default)]
    model_year: String,
    #[serde(default)]
    owner: String,
    #[serde(default)]
    chassis: String,
    #[serde(default)]
    registration: String,
    #[serde(rename = "vehicle_CC")]
    vehicle_cc: Option<String>,
    vehicle_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawStation {
    station_name: String,
    #[serde(default)]
    area: String,
    #[serde(default)]
    price: f64,
    #[serde(default)]
    available_dates: Vec<RawDate>,
}

#[derive(Debug, Deserialize)]
struct RawDate {
    date: String,
    #[serde(default)]
    is_weekend: bool,
    #[serde(default)]
    is_independence_day: bool,
    #[serde(default)]
    available_time_slots: Vec<String>,
}

/// The static fixture standing in for a backend: vehicles plus stations by city.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    vehicles: Vec<VehicleRecord>,
    stations: BTreeMap<String, Vec<Station>>,
}

impl Dataset {
    pub fn new(vehicles: Vec<VehicleRecord>, stations: Vec<Station>) -> Self {
        let mut by_city: BTreeMap<String, Vec<Station>> = BTreeMap::new();
        for station in stations {
            by_city.entry(station.city.clone()).or_default().push(station);
        }
        Self {
            vehicles,
            stations: by_city,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset: {}", path.display()))?;
        let dataset = Self::from_json(&raw)
            .with_context(|| format!("failed to parse dataset: {}", path.display()))?;
        tracing::info!(
            vehicles = dataset.vehicles.len(),
            cities = dataset.stations.len(),
            "loaded dataset from {}",
            path.display()
        );
        Ok(dataset)
    }

    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        let raw: RawDataset = serde_json::from_str(s)?;

        let mut vehicles = Vec::with_capacity(raw.vehicle_information.len());
        for v in raw.vehicle_information {
            let registration_number = v.vehicle_registration_number.trim().to_string();
            if registration_number.is_empty() {
                return Err(anyhow::anyhow!("vehicle with empty registration number"));
            }
            vehicles.push(VehicleRecord {
                registration_number,
                name: v.vehicle_name,
                variant: v.variant,
                color: v.color,
                model_year: v.model_year,
                owner: v.owner,
                chassis_number: v.chassis,
                registration_date: v.registration,
                engine_cc: v.vehicle_cc,
                vehicle_type: v.vehicle_type,
            });
        }

        let mut stations = BTreeMap::new();
        for (city, raw_stations) in raw.station_information {
            let mut parsed = Vec::with_capacity(raw_stations.len());
            for s in raw_stations {
                let mut available_dates = Vec::with_capacity(s.available_dates.len());
                for d in s.available_dates {
                    let entry = DateAvailability {
                        date: parse_date(&d.date)?,
                        is_weekend: d.is_weekend,
                        is_holiday: d.is_independence_day,
                        available_time_slots: d.available_time_slots,
                    };
                    if entry.flags_disagree_with_calendar() {
                        tracing::warn!(
                            station = %s.station_name,
                            date = %entry.date,
                            "dataset flags disagree with calendar, keeping dataset values"
                        );
                    }
                    available_dates.push(entry);
                }
                parsed.push(Station {
                    name: s.station_name,
                    city: city.clone(),
                    area: s.area,
                    price: s.price,
                    available_dates,
                });
            }
            stations.insert(city, parsed);
        }

        Ok(Self { vehicles, stations })
    }
}

impl VehicleRepository for Dataset {
    fn find_by_registration(&self, registration: &str) -> Option<VehicleRecord> {
        self.vehicles
            .iter()
            .find(|v| v.registration_number.to_uppercase() == registration)
            .cloned()
    }
}

impl StationRepository for Dataset {
    fn cities(&self) -> Vec<String> {
        self.stations.keys().cloned().collect()
    }

    fn stations_in(&self, city: &str) -> &[Station] {
        self.stations.get(city).map(Vec::as_slice).unwrap_or(&[])
    }
}
