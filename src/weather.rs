//! Weather provider with tiered fidelity
//!
//! Given a free-text location and a target date, produces a [`WeatherSnapshot`]
//! by selecting among three strategies: live forecast data from Open-Meteo,
//! a latitude/season estimate for dates outside the forecast horizon, and a
//! keyword-heuristic mock when the location cannot be resolved at all. The
//! provider is total: every call path ends in a snapshot tagged with its tier,
//! never in an error.

use crate::conditions::classify;
use crate::config::WeatherConfig;
use crate::geocode::GeocodingResolver;
use crate::models::{Coordinates, DataTier, WeatherSnapshot};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, instrument, warn};

/// Combined forecast payload from Open-Meteo: current conditions, daily
/// aggregates and hourly humidity for the whole forecast window
#[derive(Debug, Deserialize, Clone)]
pub struct ForecastResponse {
    pub current_weather: Option<CurrentWeather>,
    pub daily: Option<DailyData>,
    pub hourly: Option<HourlyData>,
}

/// Current conditions block
#[derive(Debug, Deserialize, Clone)]
pub struct CurrentWeather {
    pub temperature: f32,
    pub weathercode: u8,
}

/// Daily aggregates, one entry per date in `time`
#[derive(Debug, Deserialize, Clone)]
pub struct DailyData {
    pub time: Vec<String>,
    #[serde(rename = "weathercode")]
    pub weather_code: Option<Vec<Option<u8>>>,
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Option<Vec<Option<f32>>>,
    #[serde(rename = "temperature_2m_min")]
    pub temperature_min: Option<Vec<Option<f32>>>,
    #[serde(rename = "precipitation_sum")]
    pub precipitation: Option<Vec<Option<f32>>>,
    #[serde(rename = "precipitation_probability_max")]
    pub precipitation_chance: Option<Vec<Option<u8>>>,
    #[serde(rename = "uv_index_max")]
    pub uv_index: Option<Vec<Option<f32>>>,
}

/// Hourly relative humidity for the same window
#[derive(Debug, Deserialize, Clone)]
pub struct HourlyData {
    pub time: Vec<String>,
    #[serde(rename = "relative_humidity_2m")]
    pub relative_humidity: Option<Vec<Option<f32>>>,
}

/// Safe indexed access into an optional column of optional values
fn value_at<T: Copy>(column: &Option<Vec<Option<T>>>, index: usize) -> Option<T> {
    column.as_ref().and_then(|v| v.get(index)).and_then(|v| *v)
}

/// Network backend for forecast fetches, mockable in tests
#[async_trait]
pub trait ForecastFetcher: Send + Sync {
    /// Fetch the combined forecast payload for a coordinate pair
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<ForecastResponse>;
}

/// Open-Meteo forecast API client (no API key required)
pub struct OpenMeteoForecast {
    client: reqwest::Client,
    base_url: String,
    forecast_days: u32,
    past_days: u32,
}

impl OpenMeteoForecast {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("packcast/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create forecast HTTP client")?;
        Ok(Self {
            client,
            base_url: config.forecast_base_url.clone(),
            forecast_days: config.forecast_days,
            past_days: config.past_days,
        })
    }
}

#[async_trait]
impl ForecastFetcher for OpenMeteoForecast {
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<ForecastResponse> {
        let url = format!(
            "{}/forecast?latitude={latitude}&longitude={longitude}\
             &current_weather=true\
             &daily=weathercode,temperature_2m_max,temperature_2m_min,precipitation_sum,precipitation_probability_max,uv_index_max\
             &hourly=relative_humidity_2m\
             &timezone=auto&forecast_days={}&past_days={}",
            self.base_url, self.forecast_days, self.past_days
        );
        debug!("Forecast request URL: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("Forecast API returned status {}", response.status());
        }

        response
            .json()
            .await
            .with_context(|| "Failed to parse forecast response")
    }
}

/// Anything that can hand out a weather snapshot for a location and date
///
/// The itinerary builder depends on this seam rather than on the concrete
/// provider so tests can count calls.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn weather_for(&self, location: &str, date: NaiveDate) -> WeatherSnapshot;
}

type CachedForecast = Arc<OnceCell<Option<Arc<ForecastResponse>>>>;

/// Tiered weather provider
///
/// Owns the geocoding resolver, a per-rounded-coordinate forecast cache and a
/// seedable random source for the approximation tiers.
pub struct WeatherProvider {
    resolver: GeocodingResolver,
    fetcher: Box<dyn ForecastFetcher>,
    forecast_cache: Mutex<HashMap<String, CachedForecast>>,
    rng: Mutex<StdRng>,
    /// Reference date for the forecast-horizon check
    today: NaiveDate,
    /// Days of recent past inside the forecast window
    past_days: i64,
    /// Days of future inside the forecast window
    forecast_days: i64,
}

impl WeatherProvider {
    pub fn new(
        resolver: GeocodingResolver,
        fetcher: impl ForecastFetcher + 'static,
        config: &WeatherConfig,
    ) -> Self {
        Self {
            resolver,
            fetcher: Box::new(fetcher),
            forecast_cache: Mutex::new(HashMap::new()),
            rng: Mutex::new(StdRng::from_os_rng()),
            today: Utc::now().date_naive(),
            past_days: i64::from(config.past_days),
            forecast_days: i64::from(config.forecast_days),
        }
    }

    /// Replace the random source, for deterministic tests
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// Override the reference date for the horizon check, for tests
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Access to the owned geocoding resolver
    pub fn resolver(&self) -> &GeocodingResolver {
        &self.resolver
    }

    /// Drop all cached forecast payloads
    pub async fn clear_cache(&self) {
        self.forecast_cache.lock().await.clear();
    }

    /// Fetch (or reuse) the forecast payload for a coordinate pair
    ///
    /// Payloads are shared across all dates at the same rounded coordinates,
    /// including concurrent lookups within one itinerary build. Failed fetches
    /// are not cached, so a later build can retry.
    async fn forecast_for(&self, coords: &Coordinates) -> Option<Arc<ForecastResponse>> {
        let key = coords.cache_key();
        let cell = {
            let mut cache = self.forecast_cache.lock().await;
            cache
                .entry(key.clone())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        let payload = cell
            .get_or_init(|| async {
                match self.fetcher.fetch(coords.latitude, coords.longitude).await {
                    Ok(payload) => Some(Arc::new(payload)),
                    Err(e) => {
                        warn!("Forecast fetch for {} failed: {}", key, e);
                        None
                    }
                }
            })
            .await
            .clone();

        if payload.is_none() {
            // Evict only the cell this call initialized or waited on; a
            // concurrent retry may already have replaced it with a fresh
            // in-flight fetch that must not be discarded
            let mut cache = self.forecast_cache.lock().await;
            if cache
                .get(&key)
                .is_some_and(|current| Arc::ptr_eq(current, &cell))
            {
                cache.remove(&key);
            }
        }
        payload
    }

    /// Build a snapshot from the forecast payload for the target date
    ///
    /// Returns `None` when the payload carries neither a matching daily entry
    /// nor a current-conditions block.
    fn forecast_snapshot(&self, payload: &ForecastResponse, date: NaiveDate) -> Option<WeatherSnapshot> {
        let date_str = date.format("%Y-%m-%d").to_string();
        let humidity = Self::mean_humidity(payload.hourly.as_ref(), &date_str);

        if let Some(daily) = &payload.daily {
            if let Some(index) = daily.time.iter().position(|t| t == &date_str) {
                if let (Some(max), Some(min)) = (
                    value_at(&daily.temperature_max, index),
                    value_at(&daily.temperature_min, index),
                ) {
                    let code = value_at(&daily.weather_code, index).unwrap_or(0);
                    let condition = classify(code);
                    return Some(WeatherSnapshot {
                        temp: ((max + min) / 2.0).round() as i32,
                        temp_high: max.round() as i32,
                        temp_low: min.round() as i32,
                        condition: condition.text.to_string(),
                        icon: condition.icon.to_string(),
                        precipitation: value_at(&daily.precipitation, index).unwrap_or(0.0),
                        precipitation_chance: value_at(&daily.precipitation_chance, index)
                            .unwrap_or(0),
                        humidity,
                        uv_index: value_at(&daily.uv_index, index).unwrap_or(0.0),
                        data_tier: DataTier::Forecast,
                    });
                }
            }
        }

        // Date not in the daily block (e.g. today not yet populated): fall
        // back to current conditions with a widened high/low band
        let current = payload.current_weather.as_ref()?;
        let temp = current.temperature.round() as i32;
        let condition = classify(current.weathercode);
        Some(WeatherSnapshot {
            temp,
            temp_high: temp + 3,
            temp_low: temp - 3,
            condition: condition.text.to_string(),
            icon: condition.icon.to_string(),
            precipitation: 0.0,
            precipitation_chance: 0,
            humidity,
            uv_index: 0.0,
            data_tier: DataTier::Current,
        })
    }

    /// Mean of the target date's non-null hourly humidity readings, default 50
    fn mean_humidity(hourly: Option<&HourlyData>, date_str: &str) -> u8 {
        let Some(hourly) = hourly else { return 50 };
        let Some(values) = &hourly.relative_humidity else {
            return 50;
        };

        let samples: Vec<f32> = hourly
            .time
            .iter()
            .zip(values.iter())
            .filter(|(time, _)| time.starts_with(date_str))
            .filter_map(|(_, value)| *value)
            .collect();

        if samples.is_empty() {
            50
        } else {
            (samples.iter().sum::<f32>() / samples.len() as f32).round() as u8
        }
    }

    /// Historical-estimate tier: latitude bands plus seasonal adjustment
    async fn historical_estimate(&self, coords: &Coordinates, date: NaiveDate) -> WeatherSnapshot {
        let season = Season::of(date);

        let abs_latitude = coords.latitude.abs();
        let mut base_temp: f64 = if abs_latitude > 60.0 {
            5.0
        } else if abs_latitude > 45.0 {
            15.0
        } else if abs_latitude < 23.5 {
            28.0
        } else {
            20.0
        };

        // Hemisphere flips which season warms and which cools
        if coords.latitude > 0.0 {
            if season.is_winter {
                base_temp -= 10.0;
            }
            if season.is_summer {
                base_temp += 8.0;
            }
        } else {
            if season.is_winter {
                base_temp += 8.0;
            }
            if season.is_summer {
                base_temp -= 10.0;
            }
        }

        let mut rng = self.rng.lock().await;
        let temp = (base_temp + rng.random_range(-3.0..=3.0)).round() as i32;
        let (precipitation, precipitation_chance) = random_precipitation(&mut rng, 0.3);
        let condition = classify(if season.is_winter { 3 } else { 1 });

        WeatherSnapshot {
            temp,
            temp_high: temp + 3,
            temp_low: temp - 3,
            condition: condition.text.to_string(),
            icon: condition.icon.to_string(),
            precipitation,
            precipitation_chance,
            humidity: rng.random_range(40..=80),
            uv_index: rng.random_range(0.0..8.0),
            data_tier: DataTier::HistoricalEstimate,
        }
    }

    /// Mock tier: keyword heuristics over the raw location string
    async fn mock_snapshot(&self, location: &str, date: NaiveDate) -> WeatherSnapshot {
        let season = Season::of(date);
        let loc = location.to_lowercase();
        let contains_any =
            |keywords: &[&str]| keywords.iter().any(|keyword| loc.contains(keyword));

        let mut base_temp: f64 = if contains_any(&["phoenix", "arizona", "vegas"]) {
            if season.is_summer { 40.0 } else { 25.0 }
        } else if contains_any(&["seattle", "portland"]) {
            if season.is_summer { 22.0 } else { 8.0 }
        } else if contains_any(&["miami", "florida"]) {
            if season.is_summer { 32.0 } else { 24.0 }
        } else if contains_any(&["new york", "chicago"]) {
            if season.is_summer {
                26.0
            } else if season.is_winter {
                2.0
            } else {
                15.0
            }
        } else {
            20.0
        };

        if season.is_winter {
            base_temp -= 8.0;
        }
        if season.is_summer {
            base_temp += 5.0;
        }

        let mut rng = self.rng.lock().await;
        let temp = (base_temp + rng.random_range(-3.0..=3.0)).round() as i32;
        let uv_index = if season.is_summer {
            rng.random_range(6.0..10.0)
        } else {
            rng.random_range(2.0..6.0)
        };
        let humidity: u8 = if contains_any(&["humid", "florida", "houston"]) {
            rng.random_range(70..=90)
        } else {
            rng.random_range(40..=70)
        };
        let (precipitation, precipitation_chance) = random_precipitation(&mut rng, 0.2);

        let (condition, icon) = if temp > 30 {
            ("hot and sunny", "☀️")
        } else if temp < 5 {
            ("cold", "❄️")
        } else {
            ("pleasant", "⛅")
        };

        WeatherSnapshot {
            temp,
            temp_high: temp + 3,
            temp_low: temp - 3,
            condition: condition.to_string(),
            icon: icon.to_string(),
            precipitation,
            precipitation_chance,
            humidity,
            uv_index,
            data_tier: DataTier::Mock,
        }
    }
}

#[async_trait]
impl WeatherSource for WeatherProvider {
    /// Get a best-effort snapshot for a location and date
    ///
    /// Never errors: geocoding misses and transport failures degrade to the
    /// mock tier, dates outside the forecast horizon to the estimate tier.
    #[instrument(skip(self))]
    async fn weather_for(&self, location: &str, date: NaiveDate) -> WeatherSnapshot {
        let Some(coords) = self.resolver.resolve(location).await else {
            debug!("'{}' did not resolve, using mock weather", location);
            return self.mock_snapshot(location, date).await;
        };

        let days_from_now = (date - self.today).num_days();
        if (-self.past_days..=self.forecast_days).contains(&days_from_now) {
            match self.forecast_for(&coords).await {
                Some(payload) => match self.forecast_snapshot(&payload, date) {
                    Some(snapshot) => snapshot,
                    None => self.mock_snapshot(location, date).await,
                },
                // Transport failure is demoted, never propagated
                None => self.mock_snapshot(location, date).await,
            }
        } else {
            self.historical_estimate(&coords, date).await
        }
    }
}

/// Season classification used by the approximation tiers
#[derive(Debug, Clone, Copy)]
struct Season {
    is_winter: bool,
    is_summer: bool,
}

impl Season {
    fn of(date: NaiveDate) -> Self {
        let month = date.month();
        Self {
            is_winter: month == 12 || month <= 2,
            is_summer: (6..=9).contains(&month),
        }
    }
}

/// Bounded random precipitation: with probability `chance` a nonzero amount
/// (0-10 mm) and chance (20-70%), otherwise dry
fn random_precipitation(rng: &mut StdRng, chance: f64) -> (f32, u8) {
    if rng.random_bool(chance) {
        (
            rng.random_range(0.0..10.0f32).round(),
            rng.random_range(20..=70),
        )
    } else {
        (0.0, 0)
    }
}
