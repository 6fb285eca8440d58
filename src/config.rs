//! Configuration for the `packcast` engine
//!
//! Endpoint and timeout settings for the Open-Meteo clients, plus every
//! numeric boundary used by the packing rule engine. The threshold constants
//! deliberately live here rather than inline in the rules: the product has
//! retuned them before and will again.

use crate::error::PackcastError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration for the engine
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Weather and geocoding API settings
    pub weather: WeatherConfig,
    /// Packing rule thresholds
    pub thresholds: RuleThresholds,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Weather and geocoding API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Base URL of the geocoding search API
    pub geocoding_base_url: String,
    /// Base URL of the forecast API
    pub forecast_base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    /// Days of forecast requested from the API
    pub forecast_days: u32,
    /// Days of recent past included in the forecast payload
    pub past_days: u32,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_base_url: default_geocoding_base_url(),
            forecast_base_url: default_forecast_base_url(),
            timeout_seconds: default_timeout(),
            forecast_days: 16,
            past_days: 7,
        }
    }
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_forecast_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Numeric boundaries for the packing rule engine
///
/// Temperatures are degrees Celsius, UV is index points, humidity and
/// precipitation chance are percentages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuleThresholds {
    /// A day at or above this counts as hot
    pub hot_temp: i32,
    /// A day at or above this counts as very hot
    pub very_hot_temp: i32,
    /// A day at or below this counts as cold
    pub cold_temp: i32,
    /// A day at or below this counts as freezing
    pub freezing_temp: i32,
    /// A day at or above this counts as swim weather
    pub swim_temp: i32,
    /// UV index at or above this counts as high
    pub high_uv: f32,
    /// UV index at or above this counts as extreme
    pub extreme_uv: f32,
    /// Humidity above this counts as a high-humidity day
    pub high_humidity: u8,
    /// Precipitation chance above this counts as a rain day
    pub rain_chance: u8,
    /// Precipitation chance above this counts as a heavy-rain day
    pub heavy_rain_chance: u8,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            hot_temp: 28,
            very_hot_temp: 32,
            cold_temp: 10,
            freezing_temp: 0,
            swim_temp: 24,
            high_uv: 6.0,
            extreme_uv: 8.0,
            high_humidity: 75,
            rain_chance: 30,
            heavy_rain_chance: 70,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (error, warn, info, debug, trace)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file, filling missing fields with defaults
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, PackcastError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| {
            PackcastError::config(format!("could not parse {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check configuration invariants
    pub fn validate(&self) -> Result<(), PackcastError> {
        if self.weather.geocoding_base_url.is_empty() || self.weather.forecast_base_url.is_empty() {
            return Err(PackcastError::config("API base URLs must not be empty"));
        }
        if self.weather.timeout_seconds == 0 {
            return Err(PackcastError::config("request timeout must be positive"));
        }
        let t = &self.thresholds;
        if t.very_hot_temp < t.hot_temp {
            return Err(PackcastError::config("very_hot_temp must be >= hot_temp"));
        }
        if t.freezing_temp > t.cold_temp {
            return Err(PackcastError::config("freezing_temp must be <= cold_temp"));
        }
        if t.extreme_uv < t.high_uv {
            return Err(PackcastError::config("extreme_uv must be >= high_uv"));
        }
        if t.heavy_rain_chance < t.rain_chance {
            return Err(PackcastError::config(
                "heavy_rain_chance must be >= rain_chance",
            ));
        }
        Ok(())
    }
}
