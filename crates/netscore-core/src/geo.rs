//! Geo enricher: attaches [`GeoLocation`] when the row names a place.

use crate::row::{RawRow, RawValue};
use crate::types::GeoLocation;

pub const COUNTRY_ALIASES: &[&str] = &["country"];
pub const CITY_ALIASES: &[&str] = &["city"];
pub const LATITUDE_ALIASES: &[&str] = &["latitude", "lat"];
pub const LONGITUDE_ALIASES: &[&str] = &["longitude", "lon", "lng"];

/// Returns `None` unless `country` or `city` is present.
pub fn enrich(row: &RawRow) -> Option<GeoLocation> {
    if !row.has_any(COUNTRY_ALIASES) && !row.has_any(CITY_ALIASES) {
        return None;
    }
    Some(GeoLocation {
        country: row.first_present(COUNTRY_ALIASES).and_then(RawValue::as_text),
        city: row.first_present(CITY_ALIASES).and_then(RawValue::as_text),
        latitude: coordinate(row, LATITUDE_ALIASES),
        longitude: coordinate(row, LONGITUDE_ALIASES),
    })
}

fn coordinate(row: &RawRow, aliases: &[&str]) -> Option<f64> {
    let parsed = match row.first_present(aliases)? {
        RawValue::Number(n) => Some(*n),
        RawValue::Text(s) => s.trim().parse::<f64>().ok(),
        RawValue::Absent => None,
    };
    parsed.filter(|n| n.is_finite())
}
