//! Data models for trip segments, weather snapshots and packing output
//!
//! This module contains the data structures shared by the geocoding resolver,
//! the weather provider, the itinerary builder and the packing rule engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PackcastError;

/// One contiguous date range at one location within a multi-stop trip
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TripSegment {
    /// First day of the segment (inclusive)
    pub start_date: NaiveDate,
    /// Last day of the segment (inclusive)
    pub end_date: NaiveDate,
    /// Free-text location, e.g. "Rome, Italy" or "Springfield, IL"
    pub location: String,
}

impl TripSegment {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, location: impl Into<String>) -> Self {
        Self {
            start_date,
            end_date,
            location: location.into(),
        }
    }

    /// Check the segment's date-order invariant
    pub fn validate(&self) -> Result<(), PackcastError> {
        if self.end_date < self.start_date {
            return Err(PackcastError::validation(format!(
                "end date must not precede start date for {}",
                self.location
            )));
        }
        Ok(())
    }

    /// Number of calendar days covered, start and end inclusive
    #[must_use]
    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Resolved geographic coordinates for a location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Resolved place name
    pub name: String,
    /// Country or region name (may be empty when the service omits it)
    pub country: String,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64, name: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            name: name.into(),
            country: String::new(),
        }
    }

    /// Round coordinates for cache key generation
    #[must_use]
    pub fn rounded(&self, precision: u32) -> (f64, f64) {
        let multiplier = 10_f64.powi(precision as i32);
        let lat = (self.latitude * multiplier).round() / multiplier;
        let lon = (self.longitude * multiplier).round() / multiplier;
        (lat, lon)
    }

    /// Cache key shared by all dates at (roughly) the same place
    #[must_use]
    pub fn cache_key(&self) -> String {
        let (lat, lon) = self.rounded(2);
        format!("forecast:{lat:.2}:{lon:.2}")
    }
}

/// Fidelity tier of a weather snapshot
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum DataTier {
    /// Live daily forecast for the exact date
    #[serde(rename = "forecast")]
    Forecast,
    /// Current conditions used as a stand-in for a date missing from the payload
    #[serde(rename = "current")]
    Current,
    /// Statistical approximation for dates outside the forecast horizon
    #[serde(rename = "historical-estimate")]
    HistoricalEstimate,
    /// Keyword-heuristic fallback when the location could not be resolved
    #[serde(rename = "mock")]
    Mock,
}

impl DataTier {
    /// Label shown next to a day so degraded data is never presented as live
    #[must_use]
    pub fn display_label(&self) -> &'static str {
        match self {
            DataTier::Forecast => "forecast",
            DataTier::Current => "current",
            DataTier::HistoricalEstimate => "estimated",
            DataTier::Mock => "demo data",
        }
    }

    /// Whether the snapshot came from the live weather service
    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self, DataTier::Forecast | DataTier::Current)
    }
}

/// Best-effort weather for one location on one calendar day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// Representative temperature in whole degrees Celsius
    pub temp: i32,
    /// Daily high in whole degrees Celsius
    pub temp_high: i32,
    /// Daily low in whole degrees Celsius
    pub temp_low: i32,
    /// Human-readable condition phrase, e.g. "slight rain"
    pub condition: String,
    /// Icon glyph for the condition
    pub icon: String,
    /// Precipitation sum in mm
    pub precipitation: f32,
    /// Probability of precipitation, 0-100
    pub precipitation_chance: u8,
    /// Relative humidity, 0-100
    pub humidity: u8,
    /// UV index (non-negative)
    pub uv_index: f32,
    /// Provenance of this snapshot
    pub data_tier: DataTier,
}

/// One calendar day of the trip with its resolved weather
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TripDay {
    pub date: NaiveDate,
    pub location: String,
    pub weather: WeatherSnapshot,
}

/// Caller-supplied day counts for non-casual occasions
///
/// Days not claimed by any occasion are "casual". Counts are advisory hints
/// for the packing rule engine, not itinerary structure.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(default)]
pub struct OccasionCounts {
    pub semi_formal: u32,
    pub formal: u32,
    pub lounge: u32,
    pub adventure: u32,
    pub beach: u32,
    pub business: u32,
}

impl OccasionCounts {
    /// Total days earmarked for any occasion
    #[must_use]
    pub fn special_days(&self) -> u32 {
        self.semi_formal + self.formal + self.lounge + self.adventure + self.beach + self.business
    }

    /// Days left over for generic casual wear
    #[must_use]
    pub fn casual_days(&self, trip_length: usize) -> u32 {
        (trip_length as u32).saturating_sub(self.special_days())
    }
}

/// The fully expanded trip: day sequence, source segments and occasion hints
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TripData {
    /// Day entries sorted ascending by date (stable across overlapping segments)
    pub days: Vec<TripDay>,
    /// The segments the days were expanded from, in input order
    pub segments: Vec<TripSegment>,
    /// Occasion day-count hints
    pub occasions: OccasionCounts,
}

/// Urgency flag for a packing category
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "high")]
    High,
}

/// One named packing category with its recommended items
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PackingCategory {
    pub name: String,
    /// Item descriptions in recommendation order
    pub items: Vec<String>,
    /// Absent means default/low urgency
    pub priority: Option<Priority>,
}

impl PackingCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
            priority: None,
        }
    }
}

/// Temperature display preference
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TempUnit {
    Celsius,
    Fahrenheit,
}

impl TempUnit {
    /// Convert a Celsius value into this unit
    #[must_use]
    pub fn convert(&self, celsius: i32) -> i32 {
        match self {
            TempUnit::Celsius => celsius,
            TempUnit::Fahrenheit => ((celsius as f64 * 9.0 / 5.0) + 32.0).round() as i32,
        }
    }

    /// Format a Celsius value for display, e.g. "72°F"
    #[must_use]
    pub fn display(&self, celsius: i32) -> String {
        let suffix = match self {
            TempUnit::Celsius => "C",
            TempUnit::Fahrenheit => "F",
        };
        format!("{}°{suffix}", self.convert(celsius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_segment_validation() {
        let ok = TripSegment::new(date(2024, 7, 10), date(2024, 7, 12), "Miami, FL");
        assert!(ok.validate().is_ok());
        assert_eq!(ok.day_count(), 3);

        let single = TripSegment::new(date(2024, 7, 10), date(2024, 7, 10), "Miami, FL");
        assert!(single.validate().is_ok());
        assert_eq!(single.day_count(), 1);

        let reversed = TripSegment::new(date(2024, 7, 12), date(2024, 7, 10), "Miami, FL");
        assert!(reversed.validate().is_err());
    }

    #[test]
    fn test_rounded_coordinates() {
        let coords = Coordinates::new(46.818234, 8.227456, "Interlaken");
        let (lat, lon) = coords.rounded(2);
        assert_eq!(lat, 46.82);
        assert_eq!(lon, 8.23);
        assert_eq!(coords.cache_key(), "forecast:46.82:8.23");
    }

    #[test]
    fn test_occasion_accounting() {
        let occasions = OccasionCounts {
            formal: 2,
            beach: 3,
            ..Default::default()
        };
        assert_eq!(occasions.special_days(), 5);
        assert_eq!(occasions.casual_days(7), 2);
        // More claimed days than trip days clamps to zero casual
        assert_eq!(occasions.casual_days(3), 0);
    }

    #[test]
    fn test_data_tier_labels() {
        assert_eq!(DataTier::Forecast.display_label(), "forecast");
        assert_eq!(DataTier::Mock.display_label(), "demo data");
        assert!(DataTier::Current.is_live());
        assert!(!DataTier::HistoricalEstimate.is_live());
    }

    #[test]
    fn test_data_tier_serialization() {
        let json = serde_json::to_string(&DataTier::HistoricalEstimate).unwrap();
        assert_eq!(json, "\"historical-estimate\"");
        let tier: DataTier = serde_json::from_str("\"mock\"").unwrap();
        assert_eq!(tier, DataTier::Mock);
    }

    #[test]
    fn test_temp_unit_conversion() {
        assert_eq!(TempUnit::Fahrenheit.convert(0), 32);
        assert_eq!(TempUnit::Fahrenheit.convert(22), 72);
        assert_eq!(TempUnit::Celsius.convert(22), 22);
        assert_eq!(TempUnit::Fahrenheit.display(32), "90°F");
    }
}
