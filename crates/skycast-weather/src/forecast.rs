//! Daily forecast cards sampled from the 3-hour series.
//!
//! Entries are taken at a fixed stride of 8 (8 x 3h = 24h) rather than by
//! calendar day, so the cards drift with the first entry's time of day.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::types::{round_display, ForecastEntry};

/// 3-hour slots per day
pub const DAILY_STRIDE: usize = 8;
/// Cards shown
pub const FORECAST_DAYS: usize = 5;

/// Entries at positions 0, 8, 16, 24, 32 that exist, in order
pub fn sample_daily<T>(entries: &[T]) -> Vec<&T> {
    entries
        .iter()
        .step_by(DAILY_STRIDE)
        .take(FORECAST_DAYS)
        .collect()
}

/// One forecast card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastCard {
    pub timestamp: i64,
    /// Short weekday, e.g. "Mon"
    pub day: String,
    pub icon_url: String,
    pub temperature: i64,
}

/// What the forecast region shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForecastRegion {
    Cards(Vec<ForecastCard>),
    Unavailable,
}

impl ForecastRegion {
    pub fn cards(&self) -> &[ForecastCard] {
        match self {
            Self::Cards(cards) => cards,
            Self::Unavailable => &[],
        }
    }
}

/// Build the cards for a forecast series.
///
/// A sampled entry without an icon makes the whole region unavailable.
pub fn build_cards<Tz: TimeZone>(
    entries: &[ForecastEntry],
    icon_base_url: &str,
    tz: &Tz,
) -> ForecastRegion
where
    Tz::Offset: std::fmt::Display,
{
    let mut cards = Vec::with_capacity(FORECAST_DAYS);
    for entry in sample_daily(entries) {
        let Some(icon) = entry.icon.as_deref() else {
            tracing::debug!(timestamp = entry.timestamp, "Forecast entry without icon");
            return ForecastRegion::Unavailable;
        };
        cards.push(ForecastCard {
            timestamp: entry.timestamp,
            day: weekday_label(entry.timestamp, tz),
            icon_url: format!("{}/{}.png", icon_base_url.trim_end_matches('/'), icon),
            temperature: round_display(entry.temperature),
        });
    }
    ForecastRegion::Cards(cards)
}

/// Short weekday name of a unix timestamp in `tz`
pub fn weekday_label<Tz: TimeZone>(unix: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    DateTime::from_timestamp(unix, 0)
        .map(|dt| dt.with_timezone(tz).format("%a").to_string())
        .unwrap_or_default()
}

/// "HH:MM" of a unix timestamp in `tz`, "--:--" when out of range
pub fn clock_label<Tz: TimeZone>(unix: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    DateTime::from_timestamp(unix, 0)
        .map(|dt| dt.with_timezone(tz).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    // 2024-01-01 00:00:00 UTC, a Monday
    const MONDAY: i64 = 1_704_067_200;

    fn series(len: usize) -> Vec<ForecastEntry> {
        (0..len)
            .map(|i| ForecastEntry {
                timestamp: MONDAY + i as i64 * 3 * 3600,
                temperature: i as f64,
                icon: Some(format!("{:02}d", i % 10)),
            })
            .collect()
    }

    #[test]
    fn test_samples_every_eighth() {
        let entries: Vec<usize> = (0..40).collect();
        let picked: Vec<usize> = sample_daily(&entries).into_iter().copied().collect();
        assert_eq!(picked, vec![0, 8, 16, 24, 32]);
    }

    #[test]
    fn test_short_series_skips_missing_positions() {
        let entries: Vec<usize> = (0..20).collect();
        let picked: Vec<usize> = sample_daily(&entries).into_iter().copied().collect();
        assert_eq!(picked, vec![0, 8, 16]);

        let empty: Vec<usize> = Vec::new();
        assert!(sample_daily(&empty).is_empty());
    }

    #[test]
    fn test_long_series_caps_at_five() {
        let entries: Vec<usize> = (0..100).collect();
        assert_eq!(sample_daily(&entries).len(), FORECAST_DAYS);
    }

    #[test]
    fn test_build_cards() {
        let region = build_cards(&series(40), "https://openweathermap.org/img/wn/", &Utc);
        let cards = region.cards();

        assert_eq!(cards.len(), 5);
        assert_eq!(
            cards.iter().map(|c| c.day.as_str()).collect::<Vec<_>>(),
            vec!["Mon", "Tue", "Wed", "Thu", "Fri"]
        );
        assert_eq!(cards[1].temperature, 8);
        assert_eq!(cards[1].icon_url, "https://openweathermap.org/img/wn/08d.png");
        assert!(cards.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn test_missing_icon_makes_region_unavailable() {
        let mut entries = series(40);
        entries[16].icon = None;
        assert_eq!(build_cards(&entries, "x", &Utc), ForecastRegion::Unavailable);

        // Unsampled entries do not matter
        let mut entries = series(40);
        entries[3].icon = None;
        assert_eq!(build_cards(&entries, "x", &Utc).cards().len(), 5);
    }

    #[test]
    fn test_clock_label() {
        assert_eq!(clock_label(MONDAY + 7 * 3600 + 5 * 60, &Utc), "07:05");
        assert_eq!(clock_label(i64::MAX, &Utc), "--:--");
    }
}
