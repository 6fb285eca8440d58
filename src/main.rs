//! Command line demo for the packcast engine
//!
//! Builds an itinerary from location/date-range arguments, prints the daily
//! weather calendar with tier provenance and the generated packing list.
//!
//! Usage:
//!   packcast LOCATION START END [LOCATION START END ...] [--formal N]
//!            [--semi-formal N] [--business N] [--lounge N] [--adventure N]
//!            [--beach N] [--fahrenheit] [--config PATH]
//!
//! Dates are ISO (YYYY-MM-DD).

use anyhow::{Context, Result};
use chrono::NaiveDate;
use packcast::{
    EngineConfig, GeocodingResolver, OccasionCounts, OpenMeteoForecast, OpenMeteoGeocoder,
    TempUnit, TripSegment, WeatherProvider, build_trip, packing,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

struct CliArgs {
    segments: Vec<TripSegment>,
    occasions: OccasionCounts,
    unit: TempUnit,
    config_path: Option<String>,
}

fn next_value(iter: &mut std::slice::Iter<'_, String>, flag: &str) -> Result<u32> {
    iter.next()
        .with_context(|| format!("{flag} requires a value"))?
        .parse()
        .with_context(|| format!("{flag} requires a whole number"))
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut segments = Vec::new();
    let mut occasions = OccasionCounts::default();
    let mut unit = TempUnit::Celsius;
    let mut config_path = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--formal" => occasions.formal = next_value(&mut iter, "--formal")?,
            "--semi-formal" => occasions.semi_formal = next_value(&mut iter, "--semi-formal")?,
            "--business" => occasions.business = next_value(&mut iter, "--business")?,
            "--lounge" => occasions.lounge = next_value(&mut iter, "--lounge")?,
            "--adventure" => occasions.adventure = next_value(&mut iter, "--adventure")?,
            "--beach" => occasions.beach = next_value(&mut iter, "--beach")?,
            "--fahrenheit" => unit = TempUnit::Fahrenheit,
            "--config" => {
                config_path = Some(
                    iter.next()
                        .context("--config requires a file path")?
                        .clone(),
                );
            }
            location => {
                let start = iter.next().context("missing start date after location")?;
                let end = iter.next().context("missing end date after start date")?;
                let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")
                    .with_context(|| format!("invalid start date '{start}'"))?;
                let end = NaiveDate::parse_from_str(end, "%Y-%m-%d")
                    .with_context(|| format!("invalid end date '{end}'"))?;
                segments.push(TripSegment::new(start, end, location));
            }
        }
    }

    if segments.is_empty() {
        anyhow::bail!("usage: packcast LOCATION START END [LOCATION START END ...] [options]");
    }

    Ok(CliArgs {
        segments,
        occasions,
        unit,
        config_path,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args(&std::env::args().skip(1).collect::<Vec<_>>())?;

    let config = match &args.config_path {
        Some(path) => EngineConfig::load_from_path(path)?,
        None => EngineConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    info!("packcast {} starting", packcast::VERSION);

    let resolver = GeocodingResolver::new(OpenMeteoGeocoder::new(&config.weather)?);
    let fetcher = OpenMeteoForecast::new(&config.weather)?;
    let provider = WeatherProvider::new(resolver, fetcher, &config.weather);

    let trip = build_trip(&provider, args.segments, args.occasions).await?;

    println!("Trip calendar ({} days)", trip.days.len());
    println!("{}", "-".repeat(72));
    for day in &trip.days {
        let assessment = packing::assess(&day.weather);
        println!(
            "{}  {:<24} {:>6}  {} {}  [{}]",
            day.date,
            day.location,
            args.unit.display(day.weather.temp),
            assessment.icon,
            assessment.label,
            day.weather.data_tier.display_label(),
        );
    }

    let stats = packing::TripStats::from_trip(&trip, &config.thresholds);
    let summary = packing::WeatherSummary::from_stats(&stats, &config.thresholds);
    println!();
    println!(
        "Temperatures {} to {}, max UV {:.1}{}, avg humidity {}%, {} rainy day(s)",
        args.unit.display(summary.min_temp),
        args.unit.display(summary.max_temp),
        summary.max_uv,
        if summary.uv_label.is_empty() {
            String::new()
        } else {
            format!(" ({})", summary.uv_label)
        },
        summary.avg_humidity,
        summary.rainy_days,
    );

    println!();
    println!("Packing list");
    println!("{}", "-".repeat(72));
    for category in packing::generate(&trip, &config.thresholds) {
        let tag = match category.priority {
            Some(priority) => format!(" [{priority:?} priority]"),
            None => String::new(),
        };
        println!("{}{}", category.name, tag);
        for item in &category.items {
            println!("  - {item}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_single_segment() {
        let args = parse_args(&strings(&["Miami, FL", "2024-07-10", "2024-07-12"])).unwrap();
        assert_eq!(args.segments.len(), 1);
        assert_eq!(args.segments[0].location, "Miami, FL");
        assert_eq!(args.occasions, OccasionCounts::default());
        assert_eq!(args.unit, TempUnit::Celsius);
    }

    #[test]
    fn test_parse_segments_with_occasions() {
        let args = parse_args(&strings(&[
            "Rome, Italy",
            "2024-09-01",
            "2024-09-04",
            "Paris, France",
            "2024-09-05",
            "2024-09-07",
            "--formal",
            "2",
            "--beach",
            "1",
            "--fahrenheit",
        ]))
        .unwrap();
        assert_eq!(args.segments.len(), 2);
        assert_eq!(args.occasions.formal, 2);
        assert_eq!(args.occasions.beach, 1);
        assert_eq!(args.unit, TempUnit::Fahrenheit);
    }

    #[test]
    fn test_parse_rejects_bad_dates_and_empty_input() {
        assert!(parse_args(&strings(&["Miami", "not-a-date", "2024-07-12"])).is_err());
        assert!(parse_args(&strings(&["Miami", "2024-07-10"])).is_err());
        assert!(parse_args(&[]).is_err());
    }
}
