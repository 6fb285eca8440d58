//! Geocoding resolution
//!
//! Resolves free-text locations ("Rome, Italy", "Springfield, IL") to
//! coordinates via the Open-Meteo geocoding API. User input is messy, so the
//! resolver tries an ordered list of search-term variants and takes the first
//! one that returns a result. Results are memoized by the exact input string,
//! and concurrent resolutions of the same string share one in-flight lookup.

use crate::config::WeatherConfig;
use crate::models::Coordinates;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, instrument};

/// US state abbreviations and their full names, used to expand inputs like
/// "Springfield, IL" that the geocoding service often fails to match directly
static STATE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Look up the full name for a two-letter state abbreviation
#[must_use]
pub fn full_state_name(abbreviation: &str) -> Option<&'static str> {
    let upper = abbreviation.to_uppercase();
    STATE_ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| *abbr == upper)
        .map(|(_, name)| *name)
}

/// Build the ordered list of search-term variants for a location input
///
/// Order matters: more specific guesses come first, the "assume USA" suffixes
/// last. Duplicate variants are dropped so each term is queried at most once.
#[must_use]
pub fn search_terms(location: &str) -> Vec<String> {
    let trimmed = location.trim();
    let mut terms: Vec<String> = Vec::new();
    let mut push = |term: String| {
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
    };

    push(trimmed.to_string());

    // City-only guess: text before the first comma
    if let Some(city) = trimmed.split(',').next() {
        push(city.trim().to_string());
    }

    // Commas replaced by spaces, whitespace normalized
    push(
        trimmed
            .replace(',', " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" "),
    );

    // "City, XX" with a recognized state abbreviation expands to full-name variants
    let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
    if parts.len() == 2 {
        if let Some(state) = full_state_name(parts[1]) {
            push(format!("{}, {state}", parts[0]));
            push(format!("{} {state}", parts[0]));
            push(format!("{}, {state}, USA", parts[0]));
        }
    }

    push(format!("{trimmed}, USA"));
    push(format!("{trimmed}, United States"));

    terms
}

/// Network backend for geocoding searches, mockable in tests
#[async_trait]
pub trait GeocodingBackend: Send + Sync {
    /// Search for a term, returning zero or more candidate locations
    async fn search(&self, term: &str) -> Result<Vec<Coordinates>>;
}

/// Geocoding search response from Open-Meteo
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    admin1: Option<String>,
}

impl From<GeocodingResult> for Coordinates {
    fn from(result: GeocodingResult) -> Self {
        Coordinates {
            latitude: result.latitude,
            longitude: result.longitude,
            name: result.name,
            country: result.country.or(result.admin1).unwrap_or_default(),
        }
    }
}

/// Open-Meteo geocoding API client (no API key required)
pub struct OpenMeteoGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl OpenMeteoGeocoder {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("packcast/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create geocoding HTTP client")?;
        Ok(Self {
            client,
            base_url: config.geocoding_base_url.clone(),
        })
    }
}

#[async_trait]
impl GeocodingBackend for OpenMeteoGeocoder {
    async fn search(&self, term: &str) -> Result<Vec<Coordinates>> {
        let url = format!(
            "{}/search?name={}&count=5&language=en&format=json",
            self.base_url,
            urlencoding::encode(term)
        );
        debug!("Geocoding request URL: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("Geocoding API returned status {}", response.status());
        }

        let body: GeocodingResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse geocoding response")?;

        Ok(body
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Coordinates::from)
            .collect())
    }
}

type CachedLookup = Arc<OnceCell<Option<Coordinates>>>;

/// Resolver with variant fallback and a memoizing cache
///
/// The cache stores negative results too: an input that resolved to nothing
/// once will not hit the network again for the lifetime of the resolver.
pub struct GeocodingResolver {
    backend: Box<dyn GeocodingBackend>,
    cache: Mutex<HashMap<String, CachedLookup>>,
}

impl GeocodingResolver {
    pub fn new(backend: impl GeocodingBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a free-text location to coordinates
    ///
    /// Returns `None` when every search-term variant comes up empty. Transport
    /// failures are not fatal here: an erroring variant is skipped and the
    /// next one tried.
    #[instrument(skip(self))]
    pub async fn resolve(&self, location: &str) -> Option<Coordinates> {
        let cell = {
            let mut cache = self.cache.lock().await;
            cache
                .entry(location.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        cell.get_or_init(|| self.lookup(location)).await.clone()
    }

    /// Drop all memoized lookups
    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }

    async fn lookup(&self, location: &str) -> Option<Coordinates> {
        for term in search_terms(location) {
            match self.backend.search(&term).await {
                Ok(results) => {
                    if let Some(first) = results.into_iter().next() {
                        debug!(
                            "Resolved '{}' via '{}' to {} ({:.4}, {:.4})",
                            location, term, first.name, first.latitude, first.longitude
                        );
                        return Some(first);
                    }
                }
                Err(e) => {
                    debug!("Geocoding variant '{}' failed: {}, trying next", term, e);
                }
            }
        }
        debug!("No geocoding result for '{}'", location);
        None
    }
}
