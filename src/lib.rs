//! packcast - trip weather aggregation and packing recommendations
//!
//! Resolves free-text locations to coordinates, gathers best-effort weather
//! for every day of a multi-stop trip and turns the result into a categorized
//! packing list. Weather comes in tiers: live Open-Meteo forecast data where
//! available, a latitude/season estimate outside the forecast horizon and a
//! keyword-heuristic mock when a location cannot be resolved. Every snapshot
//! is tagged with its tier so degraded data is never presented as live.

pub mod conditions;
pub mod config;
pub mod error;
pub mod geocode;
pub mod itinerary;
pub mod models;
pub mod packing;
pub mod weather;

pub use config::{EngineConfig, RuleThresholds, WeatherConfig};
pub use error::PackcastError;
pub use geocode::{GeocodingResolver, OpenMeteoGeocoder};
pub use itinerary::build_trip;
pub use models::{
    Coordinates, DataTier, OccasionCounts, PackingCategory, Priority, TempUnit, TripData, TripDay,
    TripSegment, WeatherSnapshot,
};
pub use packing::{TripStats, WeatherSummary, assess, generate};
pub use weather::{OpenMeteoForecast, WeatherProvider, WeatherSource};

/// Crate version, exposed for the HTTP user agent and the CLI banner
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convenience alias for fallible engine operations
pub type Result<T> = std::result::Result<T, PackcastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
