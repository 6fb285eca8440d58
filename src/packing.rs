//! Packing rule engine
//!
//! A pure, deterministic function from trip data to an ordered list of
//! packing categories. All rules evaluate independently against aggregate
//! trip statistics - no early exit, so one day can contribute items to
//! several categories. Every numeric boundary comes from
//! [`RuleThresholds`](crate::config::RuleThresholds).

use crate::config::RuleThresholds;
use crate::models::{PackingCategory, Priority, TripData, WeatherSnapshot};

/// Aggregate weather and occasion statistics for one trip
///
/// Computed once per rule-engine invocation; also drives the trip weather
/// summary shown above the packing list.
#[derive(Debug, Clone, PartialEq)]
pub struct TripStats {
    pub trip_length: usize,
    pub min_temp: i32,
    pub max_temp: i32,
    pub max_uv: f32,
    pub hot_days: u32,
    pub very_hot_days: u32,
    pub cold_days: u32,
    pub freezing_days: u32,
    pub snow_days: u32,
    pub swim_days: u32,
    pub high_uv_days: u32,
    pub extreme_uv_days: u32,
    pub avg_humidity: f32,
    pub high_humidity_days: u32,
    pub rain_days: u32,
    pub heavy_rain_days: u32,
    pub special_days: u32,
    pub casual_days: u32,
}

impl TripStats {
    /// Compute the aggregates for a trip
    #[must_use]
    pub fn from_trip(trip: &TripData, thresholds: &RuleThresholds) -> Self {
        let days = &trip.days;
        let count = |predicate: &dyn Fn(&WeatherSnapshot) -> bool| -> u32 {
            days.iter().filter(|d| predicate(&d.weather)).count() as u32
        };

        let temps: Vec<i32> = days.iter().map(|d| d.weather.temp).collect();
        let humidity_sum: f32 = days.iter().map(|d| f32::from(d.weather.humidity)).sum();

        Self {
            trip_length: days.len(),
            min_temp: temps.iter().copied().min().unwrap_or(0),
            max_temp: temps.iter().copied().max().unwrap_or(0),
            max_uv: days
                .iter()
                .map(|d| d.weather.uv_index)
                .fold(0.0, f32::max),
            hot_days: count(&|w| w.temp >= thresholds.hot_temp),
            very_hot_days: count(&|w| w.temp >= thresholds.very_hot_temp),
            cold_days: count(&|w| w.temp <= thresholds.cold_temp),
            freezing_days: count(&|w| w.temp <= thresholds.freezing_temp),
            snow_days: count(&|w| w.condition.contains("snow")),
            swim_days: count(&|w| w.temp >= thresholds.swim_temp),
            high_uv_days: count(&|w| w.uv_index >= thresholds.high_uv),
            extreme_uv_days: count(&|w| w.uv_index >= thresholds.extreme_uv),
            avg_humidity: if days.is_empty() {
                0.0
            } else {
                humidity_sum / days.len() as f32
            },
            high_humidity_days: count(&|w| w.humidity > thresholds.high_humidity),
            rain_days: count(&|w| w.precipitation_chance > thresholds.rain_chance),
            heavy_rain_days: count(&|w| w.precipitation_chance > thresholds.heavy_rain_chance),
            special_days: trip.occasions.special_days(),
            casual_days: trip.occasions.casual_days(days.len()),
        }
    }

    /// Days available for generic casual wardrobe scaling
    ///
    /// When occasions claim part of the trip, basics are scaled to the casual
    /// remainder (at least one day); otherwise the full trip length.
    #[must_use]
    fn wardrobe_days(&self) -> u32 {
        if self.special_days > 0 {
            self.casual_days.max(1)
        } else {
            self.trip_length as u32
        }
    }
}

/// Trip-level weather summary for display above the packing list
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSummary {
    pub min_temp: i32,
    pub max_temp: i32,
    pub max_uv: f32,
    /// "Extreme", "High" or empty
    pub uv_label: &'static str,
    pub avg_humidity: u8,
    pub rainy_days: u32,
    pub trip_length: usize,
}

impl WeatherSummary {
    #[must_use]
    pub fn from_stats(stats: &TripStats, thresholds: &RuleThresholds) -> Self {
        let uv_label = if stats.max_uv >= thresholds.extreme_uv {
            "Extreme"
        } else if stats.max_uv >= thresholds.high_uv {
            "High"
        } else {
            ""
        };
        Self {
            min_temp: stats.min_temp,
            max_temp: stats.max_temp,
            max_uv: stats.max_uv,
            uv_label,
            avg_humidity: stats.avg_humidity.round() as u8,
            rainy_days: stats.rain_days,
            trip_length: stats.trip_length,
        }
    }
}

/// Short weather assessment for one day of the calendar
#[derive(Debug, Clone, PartialEq)]
pub struct DayAssessment {
    pub label: String,
    pub icon: String,
}

/// Summarize one day's weather into a short label and icon
///
/// Severe conditions (thunderstorms, snow) take precedence; otherwise a
/// temperature band label gets humidity and rain overlays.
#[must_use]
pub fn assess(weather: &WeatherSnapshot) -> DayAssessment {
    if weather.condition.contains("thunderstorm") {
        let label = if weather.condition.contains("hail") {
            "Thunder + Hail"
        } else {
            "Storms"
        };
        return DayAssessment {
            label: label.to_string(),
            icon: "⛈️".to_string(),
        };
    }
    if weather.condition.contains("snow") {
        let label = if weather.condition.contains("heavy") {
            "Heavy Snow"
        } else if weather.condition.contains("slight") {
            "Light Snow"
        } else {
            "Snow"
        };
        return DayAssessment {
            label: label.to_string(),
            icon: "❄️".to_string(),
        };
    }

    let avg_c = f64::from(weather.temp_high + weather.temp_low) / 2.0;
    let avg_f = (avg_c * 9.0 / 5.0 + 32.0).round() as i32;
    let humid = weather.humidity >= 70;

    let (temp_label, temp_icon) = if avg_f >= 95 {
        if humid {
            ("Extreme Heat + Humidity", "🥵")
        } else {
            ("Extreme Heat", "🔥")
        }
    } else if avg_f >= 80 {
        if humid { ("Hot + Humid", "🌡️") } else { ("Hot", "☀️") }
    } else if avg_f >= 60 {
        if humid {
            ("Warm + Humid", "🌫️")
        } else {
            ("Pleasant", "😊")
        }
    } else if avg_f >= 45 {
        ("Cool", "🧥")
    } else if avg_f >= 32 {
        ("Cold", "❄️")
    } else {
        ("Freezing", "🧊")
    };

    // Rain overlays the temperature label, combining with it for extremes
    if weather.precipitation_chance >= 70 {
        let label = if avg_f >= 80 {
            format!("Heavy Rain + {temp_label}")
        } else {
            "Heavy Rain".to_string()
        };
        DayAssessment {
            label,
            icon: "🌧️".to_string(),
        }
    } else if weather.precipitation_chance >= 25 {
        let label = if avg_f >= 95 {
            format!("Rain + {temp_label}")
        } else {
            "Possible Rain".to_string()
        };
        DayAssessment {
            label,
            icon: "🌦️".to_string(),
        }
    } else {
        DayAssessment {
            label: temp_label.to_string(),
            icon: temp_icon.to_string(),
        }
    }
}

/// Scale a day count by a factor, rounding up
fn ceil_scale(days: u32, factor: f64) -> u32 {
    (f64::from(days) * factor).ceil() as u32
}

/// Append a category to the output when it has any items
fn push_category(
    out: &mut Vec<PackingCategory>,
    name: &str,
    items: Vec<String>,
    priority: Option<Priority>,
) {
    if !items.is_empty() {
        out.push(PackingCategory {
            name: name.to_string(),
            items,
            priority,
        });
    }
}

/// Generate the ordered packing category list for a trip
///
/// Pure and deterministic: identical trip data always yields identical
/// categories. Categories with no fired conditions are omitted.
#[must_use]
pub fn generate(trip: &TripData, thresholds: &RuleThresholds) -> Vec<PackingCategory> {
    let stats = TripStats::from_trip(trip, thresholds);
    generate_from_stats(&stats, trip)
}

fn generate_from_stats(stats: &TripStats, trip: &TripData) -> Vec<PackingCategory> {
    let mut categories = Vec::new();
    if stats.trip_length == 0 {
        return categories;
    }
    let occasions = &trip.occasions;
    let trip_length = stats.trip_length as u32;

    // TRIP OVERVIEW - only when occasions claim part of the trip
    if stats.special_days > 0 {
        let mut parts = vec![format!("{} casual", stats.casual_days)];
        let labeled = [
            (occasions.formal, "formal"),
            (occasions.semi_formal, "semi-formal"),
            (occasions.business, "business"),
            (occasions.lounge, "lounge"),
            (occasions.adventure, "adventure"),
            (occasions.beach, "beach"),
        ];
        for (count, label) in labeled {
            if count > 0 {
                parts.push(format!("{count} {label}"));
            }
        }
        push_category(
            &mut categories,
            "Trip Overview",
            vec![format!(
                "Trip breakdown: {} day(s) - {}",
                trip_length,
                parts.join(", ")
            )],
            None,
        );
    }

    // SPECIAL OCCASIONS - formal, semi-formal and business days
    let mut occasion_items = Vec::new();
    if occasions.formal > 0 {
        let outfits = occasions.formal.div_ceil(2);
        occasion_items.push(format!("{outfits} formal outfit(s)"));
        occasion_items.push("Dress shoes".to_string());
    }
    if occasions.semi_formal > 0 {
        let outfits = occasions.semi_formal.div_ceil(2);
        occasion_items.push(format!("{outfits} smart-casual outfit(s)"));
    }
    if occasions.business > 0 {
        occasion_items.push(format!("{} business outfit(s)", occasions.business.min(5)));
        occasion_items.push("Blazer or sport coat".to_string());
        if occasions.business > 2 {
            occasion_items.push("Wrinkle-release spray".to_string());
        }
    }
    push_category(&mut categories, "Special Occasions", occasion_items, None);

    // ACTIVITY WEAR - adventure and lounge days
    let mut activity_items = Vec::new();
    if occasions.adventure > 0 {
        let outfits = (occasions.adventure + 1).min(5);
        activity_items.push(format!("{outfits} quick-dry activity outfit(s)"));
        activity_items.push("Hiking daypack".to_string());
        if occasions.adventure > 2 {
            activity_items.push("Trail shoes or hiking boots".to_string());
        }
    }
    if occasions.lounge > 0 {
        let sets = occasions.lounge.div_ceil(2);
        activity_items.push(format!("{sets} comfortable loungewear set(s)"));
    }
    push_category(&mut categories, "Activity Wear", activity_items, None);

    // CLOTHING - weather-driven basics, scaled to casual-day availability
    let wardrobe_days = stats.wardrobe_days();
    let mut clothing_items = Vec::new();
    if stats.hot_days > 0 {
        let tshirts = (stats.hot_days + 1)
            .min(ceil_scale(wardrobe_days, 0.7))
            .max(1);
        clothing_items.push(format!("{tshirts} lightweight t-shirts"));
        clothing_items.push(format!("{} pairs of shorts", stats.hot_days.min(3)));

        if stats.high_humidity_days > 2 {
            clothing_items.push(format!(
                "{} moisture-wicking shirts",
                ceil_scale(stats.hot_days, 0.5)
            ));
            clothing_items.push("Quick-dry underwear for humid days".to_string());
        }
    }

    if stats.max_temp >= 20 && stats.min_temp >= 15 {
        clothing_items.push("1-2 light pants".to_string());
        clothing_items.push("1 light sweater or cardigan".to_string());
    }

    if stats.cold_days > 0 {
        clothing_items.push("Warm jacket or coat".to_string());
        clothing_items.push(format!("{} warm layers", (stats.cold_days + 1).min(4)));
        if stats.cold_days > 2 {
            clothing_items.push("Thermal underwear".to_string());
        }
    }

    if stats.snow_days > 0 || stats.freezing_days > 0 {
        clothing_items.push("Heavy winter coat".to_string());
        clothing_items.push("Insulated gloves or mittens".to_string());
        clothing_items.push("Warm winter hat or beanie".to_string());
        clothing_items.push("Scarf or neck warmer".to_string());
        clothing_items.push(format!(
            "{} pairs of wool socks",
            stats.snow_days.max(stats.freezing_days)
        ));

        if stats.freezing_days > 3 {
            clothing_items.push("Face mask or balaclava".to_string());
            clothing_items.push("Hand and foot warmers".to_string());
        }
    }

    clothing_items.push(format!(
        "{} pairs of pants or jeans",
        ceil_scale(wardrobe_days, 0.5).max(1)
    ));
    clothing_items.push(format!("{} sets of underwear", trip_length + 1));
    push_category(&mut categories, "Clothing", clothing_items, None);

    // SWIMWEAR & BEACH - swim-weather or earmarked beach days
    if stats.swim_days >= 2 || occasions.beach > 0 {
        let mut swim_items = Vec::new();

        if stats.swim_days >= 5 || occasions.beach >= 3 {
            swim_items.push("2-3 swimsuits or swim trunks".to_string());
            swim_items.push("Beach cover-up or sarong".to_string());
        } else {
            swim_items.push("1-2 swimsuits or swim trunks".to_string());
        }

        if stats.very_hot_days >= 2 {
            swim_items.push("Beach towel".to_string());
            swim_items.push("Flip-flops or water shoes".to_string());
        }

        if stats.extreme_uv_days >= 2 && stats.swim_days >= 3 {
            swim_items.push("Rash guard (UPF protection)".to_string());
            swim_items.push("Wide-brim beach hat".to_string());
        }

        if occasions.beach > 0 {
            swim_items.push("Beach bag or tote".to_string());
        }

        let priority = (stats.very_hot_days >= 3).then_some(Priority::Medium);
        push_category(&mut categories, "Swimwear & Beach", swim_items, priority);
    }

    // SUN PROTECTION - scaled to UV exposure
    if stats.high_uv_days > 0 || stats.max_temp >= 25 {
        let mut sun_items = Vec::new();

        if stats.extreme_uv_days >= 3 {
            let bottles = stats.extreme_uv_days.div_ceil(3);
            sun_items.push(format!("SPF 50+ sunscreen ({bottles} bottles recommended)"));
            sun_items.push("UPF 50+ long-sleeve shirts".to_string());
            sun_items.push("Wide-brim sun hat with neck protection".to_string());
            sun_items.push("Zinc sunscreen for face and lips".to_string());
        } else if stats.high_uv_days >= 2 {
            let bottles = stats.high_uv_days.div_ceil(4);
            sun_items.push(format!("SPF 30+ sunscreen ({bottles} bottles)"));
            sun_items.push("Sun hat or cap".to_string());
        }

        if stats.high_uv_days > 0 {
            sun_items.push("UV-protection sunglasses".to_string());
            sun_items.push("Lip balm with SPF".to_string());
        }

        if stats.hot_days >= 3 && stats.high_uv_days >= 2 {
            sun_items.push(format!("{} UPF clothing items", stats.hot_days.min(3)));
        }

        let priority = if stats.extreme_uv_days >= 2 {
            Priority::High
        } else {
            Priority::Medium
        };
        push_category(&mut categories, "Sun Protection", sun_items, Some(priority));
    }

    // WEATHER PROTECTION - rain and snow gear
    if stats.rain_days > 0 || stats.snow_days > 0 {
        let mut weather_items = Vec::new();

        if stats.heavy_rain_days >= 2 {
            weather_items.push("Waterproof rain jacket".to_string());
            weather_items.push("Rain pants".to_string());
            weather_items.push("Compact umbrella plus a backup".to_string());
        } else if stats.rain_days >= 2 {
            weather_items.push("Water-resistant jacket".to_string());
            weather_items.push("Compact umbrella".to_string());
        }

        if stats.rain_days > 0 {
            weather_items.push("Waterproof phone and electronics case".to_string());
            weather_items.push(format!("{} quick-dry towels", stats.rain_days.div_ceil(2)));
        }

        if stats.snow_days > 0 {
            weather_items.push("Waterproof winter boots".to_string());
            weather_items.push("Warm, waterproof gloves".to_string());
            weather_items.push("Snow gaiters".to_string());
        }

        if stats.freezing_days > 2 {
            weather_items.push("Ice cleats or crampons".to_string());
            weather_items.push("Emergency blanket".to_string());
        }

        let priority = if stats.heavy_rain_days >= 2 || stats.snow_days >= 2 {
            Priority::High
        } else {
            Priority::Medium
        };
        push_category(
            &mut categories,
            "Weather Protection",
            weather_items,
            Some(priority),
        );
    }

    // FOOTWEAR - always present, weather-augmented
    let mut footwear_items = vec!["Comfortable walking shoes".to_string()];
    if stats.hot_days >= 2 {
        footwear_items.push("1-2 pairs of breathable sandals".to_string());
    }
    if stats.swim_days >= 3 {
        footwear_items.push("Flip-flops or beach sandals".to_string());
    }
    if stats.cold_days > 0 || stats.snow_days > 0 {
        footwear_items.push("Warm, waterproof boots".to_string());
        footwear_items.push(format!(
            "{} pairs of thick socks",
            (stats.cold_days + 2).min(6)
        ));
    }
    if stats.rain_days > 2 {
        footwear_items.push("Waterproof shoes or boots".to_string());
    }
    if stats.freezing_days > 0 {
        footwear_items.push("Insulated winter boots".to_string());
        footwear_items.push("Wool or thermal socks".to_string());
    }
    push_category(&mut categories, "Footwear", footwear_items, None);

    // TRAVEL ACCESSORIES - always present
    let mut accessory_items = vec![
        "Daypack or backpack".to_string(),
        "Portable phone charger".to_string(),
        "Travel adapter".to_string(),
    ];
    if stats.high_humidity_days > 2 {
        accessory_items.push("Moisture-absorbing packets".to_string());
        accessory_items.push("Waterproof packing cubes".to_string());
    }
    if stats.extreme_uv_days >= 2 {
        accessory_items.push("Cooling towel".to_string());
        accessory_items.push("Insulated water bottle".to_string());
    }
    if stats.freezing_days > 1 {
        accessory_items.push("Thermal water bottle".to_string());
        accessory_items.push("Portable hand warmers".to_string());
    }
    if trip_length > 7 {
        accessory_items.push("Laundry detergent pods".to_string());
        accessory_items.push("Travel clothesline".to_string());
    }
    push_category(&mut categories, "Travel Accessories", accessory_items, None);

    // HEALTH & COMFORT - only when at least one condition fires
    let mut health_items = Vec::new();
    if stats.avg_humidity < 40.0 || stats.freezing_days > 1 {
        health_items.push("Extra moisturizer".to_string());
        health_items.push("Hydrating lip balm".to_string());
    }
    if stats.high_humidity_days > 2 {
        health_items.push("Anti-chafing balm".to_string());
        health_items.push("Antifungal powder".to_string());
    }
    if stats.extreme_uv_days >= 2 {
        health_items.push("Aloe vera gel for sunburn relief".to_string());
        health_items.push("Electrolyte supplements".to_string());
    }
    if stats.cold_days > 2 {
        health_items.push("Hand and foot warmers".to_string());
        health_items.push("Cold-weather lip protection".to_string());
    }
    if stats.freezing_days > 1 {
        health_items.push("Frostbite prevention cream".to_string());
        health_items.push("Emergency heat packs".to_string());
    }
    push_category(&mut categories, "Health & Comfort", health_items, None);

    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataTier, OccasionCounts, TripDay, TripSegment};
    use chrono::NaiveDate;
    use rstest::rstest;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    fn snapshot(temp: i32) -> WeatherSnapshot {
        WeatherSnapshot {
            temp,
            temp_high: temp + 3,
            temp_low: temp - 3,
            condition: "clear sky".to_string(),
            icon: "☀️".to_string(),
            precipitation: 0.0,
            precipitation_chance: 10,
            humidity: 50,
            uv_index: 4.0,
            data_tier: DataTier::Forecast,
        }
    }

    fn trip_of(snapshots: Vec<WeatherSnapshot>, occasions: OccasionCounts) -> TripData {
        let days: Vec<TripDay> = snapshots
            .into_iter()
            .enumerate()
            .map(|(i, weather)| TripDay {
                date: date(1 + i as u32),
                location: "Testville".to_string(),
                weather,
            })
            .collect();
        let segments = vec![TripSegment::new(
            days.first().map(|d| d.date).unwrap_or_else(|| date(1)),
            days.last().map(|d| d.date).unwrap_or_else(|| date(1)),
            "Testville",
        )];
        TripData {
            days,
            segments,
            occasions,
        }
    }

    fn find<'a>(categories: &'a [PackingCategory], name: &str) -> Option<&'a PackingCategory> {
        categories.iter().find(|c| c.name == name)
    }

    fn miami_scenario() -> TripData {
        let day = WeatherSnapshot {
            temp: 32,
            temp_high: 35,
            temp_low: 29,
            condition: "clear sky".to_string(),
            icon: "☀️".to_string(),
            precipitation: 0.0,
            precipitation_chance: 10,
            humidity: 80,
            uv_index: 9.0,
            data_tier: DataTier::Forecast,
        };
        trip_of(vec![day.clone(), day.clone(), day], OccasionCounts::default())
    }

    #[test]
    fn test_stats_for_miami_scenario() {
        let trip = miami_scenario();
        let stats = TripStats::from_trip(&trip, &RuleThresholds::default());

        assert_eq!(stats.trip_length, 3);
        assert_eq!(stats.hot_days, 3);
        assert_eq!(stats.very_hot_days, 3);
        assert_eq!(stats.extreme_uv_days, 3);
        assert_eq!(stats.high_uv_days, 3);
        assert_eq!(stats.high_humidity_days, 3);
        assert_eq!(stats.swim_days, 3);
        assert_eq!(stats.rain_days, 0);
        assert_eq!(stats.snow_days, 0);
        assert_eq!(stats.max_uv, 9.0);
    }

    #[test]
    fn test_miami_scenario_categories() {
        let trip = miami_scenario();
        let categories = generate(&trip, &RuleThresholds::default());

        let sun = find(&categories, "Sun Protection").expect("sun protection expected");
        assert_eq!(sun.priority, Some(Priority::High));
        assert!(sun.items.iter().any(|i| i.contains("SPF 50+")));

        let swim = find(&categories, "Swimwear & Beach").expect("swimwear expected");
        assert_eq!(swim.priority, Some(Priority::Medium));
        assert!(swim.items.iter().any(|i| i.contains("Rash guard")));

        assert!(find(&categories, "Weather Protection").is_none());
    }

    #[test]
    fn test_idempotence() {
        let trip = miami_scenario();
        let thresholds = RuleThresholds::default();
        let first = generate(&trip, &thresholds);
        let second = generate(&trip, &thresholds);
        assert_eq!(first, second);
    }

    #[test]
    fn test_freezing_days_add_winter_items_monotonically() {
        let thresholds = RuleThresholds::default();
        let mild = trip_of(vec![snapshot(5); 4], OccasionCounts::default());
        let mild_categories = generate(&mild, &thresholds);
        let mild_clothing = find(&mild_categories, "Clothing").unwrap();
        assert!(!mild_clothing.items.iter().any(|i| i.contains("Heavy winter coat")));

        let freezing = trip_of(
            vec![snapshot(5), snapshot(5), snapshot(-2), snapshot(-5)],
            OccasionCounts::default(),
        );
        let cold_categories = generate(&freezing, &thresholds);
        let cold_clothing = find(&cold_categories, "Clothing").unwrap();
        assert!(cold_clothing.items.iter().any(|i| i.contains("Heavy winter coat")));
        assert!(
            cold_clothing
                .items
                .iter()
                .any(|i| i.contains("Insulated gloves or mittens"))
        );

        // Already-present cold items keep at least their previous quantity:
        // warm layers go from min(4+1,4)=4 to min(4+1,4)=4 (both trips are
        // all cold days), wool socks appear with the freezing count
        let layers = |c: &PackingCategory| {
            c.items
                .iter()
                .find(|i| i.contains("warm layers"))
                .and_then(|i| i.split_whitespace().next().unwrap().parse::<u32>().ok())
                .unwrap()
        };
        assert!(layers(cold_clothing) >= layers(mild_clothing));
    }

    #[test]
    fn test_trip_overview_present_iff_occasions() {
        let thresholds = RuleThresholds::default();

        let plain = trip_of(vec![snapshot(20); 5], OccasionCounts::default());
        assert!(find(&generate(&plain, &thresholds), "Trip Overview").is_none());

        let occasions = OccasionCounts {
            formal: 1,
            beach: 2,
            ..Default::default()
        };
        let special = trip_of(vec![snapshot(20); 5], occasions);
        let categories = generate(&special, &thresholds);
        let overview = find(&categories, "Trip Overview").expect("overview expected");
        assert_eq!(overview.items.len(), 1);
        assert!(overview.items[0].contains("2 casual"));
        assert!(overview.items[0].contains("1 formal"));
        assert!(overview.items[0].contains("2 beach"));
    }

    #[test]
    fn test_occasion_categories() {
        let thresholds = RuleThresholds::default();
        let occasions = OccasionCounts {
            formal: 2,
            business: 3,
            adventure: 2,
            lounge: 1,
            ..Default::default()
        };
        let trip = trip_of(vec![snapshot(20); 10], occasions);
        let categories = generate(&trip, &thresholds);

        let special = find(&categories, "Special Occasions").unwrap();
        assert!(special.items.iter().any(|i| i.contains("1 formal outfit")));
        assert!(special.items.iter().any(|i| i.contains("3 business outfit")));
        assert!(special.items.iter().any(|i| i == "Dress shoes"));
        assert!(special.items.iter().any(|i| i.contains("Wrinkle-release")));

        let activity = find(&categories, "Activity Wear").unwrap();
        assert!(activity.items.iter().any(|i| i.contains("3 quick-dry")));
        assert!(activity.items.iter().any(|i| i.contains("1 comfortable loungewear")));
    }

    #[test]
    fn test_casual_day_scaling_of_basics() {
        let thresholds = RuleThresholds::default();
        let plain = trip_of(vec![snapshot(30); 10], OccasionCounts::default());
        let plain_clothing = find(&generate(&plain, &thresholds), "Clothing")
            .unwrap()
            .clone();
        // 10 wardrobe days: min(10+1, ceil(10*0.7)) = 7 t-shirts
        assert!(plain_clothing.items.iter().any(|i| i == "7 lightweight t-shirts"));

        let occasions = OccasionCounts {
            business: 6,
            ..Default::default()
        };
        let busy = trip_of(vec![snapshot(30); 10], occasions);
        let busy_clothing = find(&generate(&busy, &thresholds), "Clothing")
            .unwrap()
            .clone();
        // Only 4 casual days left: min(10+1, ceil(4*0.7)) = 3 t-shirts
        assert!(busy_clothing.items.iter().any(|i| i == "3 lightweight t-shirts"));
    }

    #[test]
    fn test_weather_protection_priority_bands() {
        let thresholds = RuleThresholds::default();

        let mut rainy = snapshot(18);
        rainy.precipitation_chance = 50;
        let light = trip_of(vec![rainy.clone(), rainy.clone(), snapshot(18)], OccasionCounts::default());
        let light_weather = generate(&light, &thresholds);
        let category = find(&light_weather, "Weather Protection").unwrap();
        assert_eq!(category.priority, Some(Priority::Medium));
        assert!(category.items.iter().any(|i| i == "Compact umbrella"));

        let mut pouring = snapshot(18);
        pouring.precipitation_chance = 85;
        let heavy = trip_of(vec![pouring.clone(), pouring], OccasionCounts::default());
        let heavy_weather = generate(&heavy, &thresholds);
        let category = find(&heavy_weather, "Weather Protection").unwrap();
        assert_eq!(category.priority, Some(Priority::High));
        assert!(category.items.iter().any(|i| i == "Waterproof rain jacket"));
    }

    #[test]
    fn test_snow_days_trigger_snow_gear() {
        let thresholds = RuleThresholds::default();
        let mut snowy = snapshot(-1);
        snowy.condition = "moderate snow".to_string();
        let trip = trip_of(vec![snowy.clone(), snowy], OccasionCounts::default());
        let categories = generate(&trip, &thresholds);

        let weather = find(&categories, "Weather Protection").unwrap();
        assert_eq!(weather.priority, Some(Priority::High));
        assert!(weather.items.iter().any(|i| i == "Waterproof winter boots"));

        let footwear = find(&categories, "Footwear").unwrap();
        assert!(footwear.items.iter().any(|i| i == "Insulated winter boots"));
    }

    #[test]
    fn test_quantity_caps() {
        let thresholds = RuleThresholds::default();
        // Three weeks of deep cold
        let trip = trip_of(vec![snapshot(-5); 21], OccasionCounts::default());
        let categories = generate(&trip, &thresholds);

        let clothing = find(&categories, "Clothing").unwrap();
        assert!(clothing.items.iter().any(|i| i == "4 warm layers"));

        let footwear = find(&categories, "Footwear").unwrap();
        assert!(footwear.items.iter().any(|i| i == "6 pairs of thick socks"));
    }

    #[test]
    fn test_always_present_categories() {
        let thresholds = RuleThresholds::default();
        let trip = trip_of(vec![snapshot(18); 3], OccasionCounts::default());
        let categories = generate(&trip, &thresholds);

        assert!(find(&categories, "Clothing").is_some());
        assert!(find(&categories, "Footwear").is_some());
        assert!(find(&categories, "Travel Accessories").is_some());
        // Mild dry weather fires no health conditions
        assert!(find(&categories, "Health & Comfort").is_none());
    }

    #[test]
    fn test_category_order_is_stable() {
        let thresholds = RuleThresholds::default();
        let occasions = OccasionCounts {
            formal: 1,
            adventure: 1,
            ..Default::default()
        };
        let mut hot = snapshot(33);
        hot.uv_index = 9.0;
        hot.humidity = 80;
        let trip = trip_of(vec![hot.clone(), hot.clone(), hot], occasions);
        let categories = generate(&trip, &thresholds);

        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        let expected_order = [
            "Trip Overview",
            "Special Occasions",
            "Activity Wear",
            "Clothing",
            "Swimwear & Beach",
            "Sun Protection",
            "Footwear",
            "Travel Accessories",
            "Health & Comfort",
        ];
        assert_eq!(names, expected_order);
    }

    #[test]
    fn test_long_trip_laundry_items() {
        let thresholds = RuleThresholds::default();
        let trip = trip_of(vec![snapshot(20); 9], OccasionCounts::default());
        let categories = generate(&trip, &thresholds);
        let accessories = find(&categories, "Travel Accessories").unwrap();
        assert!(accessories.items.iter().any(|i| i == "Laundry detergent pods"));
    }

    #[rstest]
    #[case(96, "Thunder + Hail", "⛈️")]
    #[case(95, "Storms", "⛈️")]
    #[case(75, "Heavy Snow", "❄️")]
    #[case(71, "Light Snow", "❄️")]
    fn test_assess_severe_conditions(#[case] code: u8, #[case] label: &str, #[case] icon: &str) {
        let mut weather = snapshot(10);
        weather.condition = crate::conditions::classify(code).text.to_string();
        // Severe weather wins over rain and temperature overlays
        weather.precipitation_chance = 80;
        let assessment = assess(&weather);
        assert_eq!(assessment.label, label);
        assert_eq!(assessment.icon, icon);
    }

    #[test]
    fn test_assess_temperature_bands_and_rain_overlay() {
        // 22C avg is "Pleasant" when dry
        let pleasant = assess(&snapshot(22));
        assert_eq!(pleasant.label, "Pleasant");

        let mut rainy = snapshot(22);
        rainy.precipitation_chance = 40;
        assert_eq!(assess(&rainy).label, "Possible Rain");

        let mut pouring = snapshot(22);
        pouring.precipitation_chance = 80;
        assert_eq!(assess(&pouring).label, "Heavy Rain");

        // Hot and humid combination
        let mut muggy = snapshot(30);
        muggy.humidity = 85;
        assert_eq!(assess(&muggy).label, "Hot + Humid");

        let freezing = assess(&snapshot(-5));
        assert_eq!(freezing.label, "Freezing");
        assert_eq!(freezing.icon, "🧊");
    }

    #[test]
    fn test_weather_summary() {
        let trip = miami_scenario();
        let thresholds = RuleThresholds::default();
        let stats = TripStats::from_trip(&trip, &thresholds);
        let summary = WeatherSummary::from_stats(&stats, &thresholds);

        assert_eq!(summary.min_temp, 32);
        assert_eq!(summary.max_temp, 32);
        assert_eq!(summary.uv_label, "Extreme");
        assert_eq!(summary.avg_humidity, 80);
        assert_eq!(summary.rainy_days, 0);
        assert_eq!(summary.trip_length, 3);
    }
}
