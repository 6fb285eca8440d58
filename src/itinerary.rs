//! Trip itinerary building
//!
//! Expands an ordered list of trip segments into a chronologically sorted
//! sequence of weather-annotated day entries. Input is validated before any
//! network activity so invalid trips never produce partial work.

use crate::error::PackcastError;
use crate::models::{OccasionCounts, TripData, TripDay, TripSegment};
use crate::weather::WeatherSource;
use chrono::Duration;
use futures::future::join_all;
use tracing::{debug, warn};

/// Build the full trip data for a list of segments
///
/// Every calendar day of every segment (start and end inclusive) becomes one
/// [`TripDay`] carrying a weather snapshot. Overlapping segments keep one day
/// per segment; the final sort is stable, so same-date days stay in segment
/// input order. Day lookups run concurrently - the date sort restores
/// ordering afterwards.
pub async fn build_trip(
    provider: &impl WeatherSource,
    segments: Vec<TripSegment>,
    occasions: OccasionCounts,
) -> Result<TripData, PackcastError> {
    if segments.is_empty() {
        return Err(PackcastError::validation("at least one trip segment is required"));
    }
    for segment in &segments {
        segment.validate()?;
    }

    let trip_length: i64 = segments.iter().map(TripSegment::day_count).sum();
    if i64::from(occasions.special_days()) > trip_length {
        // Occasion counts are advisory hints; the rule engine clamps them
        warn!(
            "Occasion days ({}) exceed trip length ({}), extra days are ignored",
            occasions.special_days(),
            trip_length
        );
    }

    debug!(
        "Building itinerary: {} segment(s), {} day(s)",
        segments.len(),
        trip_length
    );

    let lookups = segments.iter().flat_map(|segment| {
        let days = segment.day_count();
        (0..days).map(move |offset| {
            let date = segment.start_date + Duration::days(offset);
            async move {
                let weather = provider.weather_for(&segment.location, date).await;
                TripDay {
                    date,
                    location: segment.location.clone(),
                    weather,
                }
            }
        })
    });

    let mut days = join_all(lookups).await;
    days.sort_by_key(|day| day.date);

    Ok(TripData {
        days,
        segments,
        occasions,
    })
}
