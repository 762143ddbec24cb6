use std::collections::BTreeSet;

use crate::models::{Station, StationRepository};

pub fn cities_of(repo: &dyn StationRepository) -> BTreeSet<String> {
    repo.cities().into_iter().collect()
}

/// Distinct areas among `city`'s stations; empty for an unknown city.
pub fn areas_of(repo: &dyn StationRepository, city: &str) -> BTreeSet<String> {
    repo.stations_in(city)
        .iter()
        .map(|s| s.area.clone())
        .collect()
}

pub fn stations_of(repo: &dyn StationRepository, city: &str, area: &str) -> Vec<Station> {
    repo.stations_in(city)
        .iter()
        .filter(|s| s.city == city && s.area == area)
        .cloned()
        .collect()
}

pub fn find_station(
    repo: &dyn StationRepository,
    city: &str,
    area: &str,
    name: &str,
) -> Option<Station> {
    repo.stations_in(city)
        .iter()
        .find(|s| s.area == area && s.name == name)
        .cloned()
}

/// Station finder: optional exact city filter plus a case-insensitive
/// substring query over station name, area and city.
pub fn search_stations(
    repo: &dyn StationRepository,
    city: Option<&str>,
    query: Option<&str>,
) -> Vec<Station> {
    let query = query
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    let cities = match city.filter(|c| !c.is_empty()) {
        Some(c) => vec![c.to_string()],
        None => repo.cities(),
    };

    cities
        .iter()
        .flat_map(|c| repo.stations_in(c).iter())
        .filter(|s| match &query {
            Some(q) => {
                s.name.to_lowercase().contains(q)
                    || s.area.to_lowercase().contains(q)
                    || s.city.to_lowercase().contains(q)
            }
            None => true,
        })
        .cloned()
        .collect()
}
