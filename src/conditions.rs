//! Weather code classification
//!
//! Maps WMO weather codes (as used by the Open-Meteo API) to a condition
//! phrase and an icon glyph. Pure and total: unknown codes fall back to a
//! generic condition rather than failing.

/// Condition phrase and icon for one weather code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub text: &'static str,
    pub icon: &'static str,
}

/// Default used for codes outside the known set
pub const UNKNOWN_CONDITION: Condition = Condition {
    text: "unknown",
    icon: "🌤️",
};

/// Classify a WMO weather code into a condition phrase and icon
#[must_use]
pub fn classify(code: u8) -> Condition {
    let (text, icon) = match code {
        0 => ("clear sky", "☀️"),
        1 => ("mainly clear", "🌤️"),
        2 => ("partly cloudy", "⛅"),
        3 => ("overcast", "☁️"),
        45 => ("fog", "🌫️"),
        48 => ("depositing rime fog", "🌫️"),
        51 => ("light drizzle", "🌦️"),
        53 => ("moderate drizzle", "🌦️"),
        55 => ("dense drizzle", "🌧️"),
        61 => ("slight rain", "🌧️"),
        63 => ("moderate rain", "🌧️"),
        65 => ("heavy rain", "🌧️"),
        71 => ("slight snow", "❄️"),
        73 => ("moderate snow", "❄️"),
        75 => ("heavy snow", "❄️"),
        80 => ("slight rain showers", "🌦️"),
        81 => ("moderate rain showers", "🌧️"),
        82 => ("violent rain showers", "🌧️"),
        95 => ("thunderstorm", "⛈️"),
        96 => ("thunderstorm with hail", "⛈️"),
        99 => ("thunderstorm with heavy hail", "⛈️"),
        _ => return UNKNOWN_CONDITION,
    };
    Condition { text, icon }
}
