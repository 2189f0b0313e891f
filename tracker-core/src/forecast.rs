//! Reduction of the provider's 3-hour forecast feed to one entry per day.
//!
//! For every calendar day the reading taken at `12:00:00` stands in for the
//! whole day; days without a noon reading fall back to their earliest entry.
//! No min/max or averaging is done across a day's samples.

use std::collections::HashMap;

use serde::Deserialize;

use crate::model::ForecastDaySummary;

/// Maximum number of days kept from a forecast feed.
pub const FORECAST_HORIZON_DAYS: usize = 5;

const NOON: &str = "12:00:00";

/// One 3-hour sample of the `/forecast` feed.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    /// Local date-time as `"YYYY-MM-DD HH:MM:SS"`.
    pub dt_txt: String,
    pub main: ForecastMain,
    #[serde(default)]
    pub weather: Vec<ForecastCondition>,
    pub wind: ForecastWind,
    #[serde(default)]
    pub visibility: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastCondition {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastWind {
    pub speed: f64,
}

/// Body of the `/forecast` endpoint; only the sample list is used.
#[derive(Debug, Deserialize)]
pub struct ForecastFeed {
    pub list: Vec<ForecastEntry>,
}

impl ForecastEntry {
    /// First 10 characters of `dt_txt`.
    fn day_key(&self) -> &str {
        self.dt_txt.get(..10).unwrap_or(&self.dt_txt)
    }

    fn is_noon(&self) -> bool {
        self.dt_txt.get(11..) == Some(NOON)
    }

    fn to_summary(&self, date: &str) -> ForecastDaySummary {
        let condition = self.weather.first();

        ForecastDaySummary {
            date: date.to_string(),
            temperature_c: self.main.temp,
            icon_code: condition.map(|c| c.icon.clone()).unwrap_or_default(),
            condition_description: condition
                .map(|c| c.description.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            feels_like_c: self.main.feels_like,
            humidity_pct: self.main.humidity,
            wind_speed_ms: self.wind.speed,
            visibility_meters: self.visibility,
        }
    }
}

/// Group `entries` by calendar day and pick one representative per day.
///
/// Days are returned in the order their first sample appears, which is
/// chronological for the provider's feed. At most [`FORECAST_HORIZON_DAYS`]
/// days are returned.
pub fn summarize_days(entries: &[ForecastEntry]) -> Vec<ForecastDaySummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&ForecastEntry>> = HashMap::new();

    for entry in entries {
        let key = entry.day_key();
        groups
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(entry);
    }

    order
        .into_iter()
        .take(FORECAST_HORIZON_DAYS)
        .filter_map(|day| {
            let samples = groups.get(day)?;
            let representative = samples
                .iter()
                .find(|e| e.is_noon())
                .or_else(|| samples.first())?;
            Some(representative.to_summary(day))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(dt_txt: &str, temp: f64) -> ForecastEntry {
        ForecastEntry {
            dt_txt: dt_txt.to_string(),
            main: ForecastMain { temp, feels_like: temp - 1.0, humidity: 50 },
            weather: vec![ForecastCondition {
                description: format!("sample {dt_txt}"),
                icon: "03d".to_string(),
            }],
            wind: ForecastWind { speed: 3.5 },
            visibility: 10_000,
        }
    }

    /// 40 samples, 3 hours apart, starting 2024-05-01 00:00.
    fn full_feed() -> Vec<ForecastEntry> {
        (0..40)
            .map(|i| {
                let day = i / 8 + 1;
                let hour = (i % 8) * 3;
                entry(&format!("2024-05-0{day} {hour:02}:00:00"), f64::from(i))
            })
            .collect()
    }

    #[test]
    fn empty_feed_yields_no_days() {
        assert!(summarize_days(&[]).is_empty());
    }

    #[test]
    fn full_feed_uses_noon_sample_of_each_day() {
        let days = summarize_days(&full_feed());

        let dates: Vec<_> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(
            dates,
            ["2024-05-01", "2024-05-02", "2024-05-03", "2024-05-04", "2024-05-05"]
        );

        for (idx, day) in days.iter().enumerate() {
            // noon is the 5th sample (index 4) of every day
            let expected = (idx * 8 + 4) as f64;
            assert_eq!(day.temperature_c, expected);
            assert_eq!(
                day.condition_description,
                format!("sample {} 12:00:00", day.date)
            );
        }
    }

    #[test]
    fn noon_fields_are_copied_exactly() {
        let mut noon = entry("2024-05-01 12:00:00", 21.4);
        noon.main.humidity = 77;
        noon.main.feels_like = 19.9;
        noon.wind.speed = 6.2;
        noon.visibility = 8_500;
        noon.weather = vec![
            ForecastCondition { description: "light rain".into(), icon: "10d".into() },
            ForecastCondition { description: "mist".into(), icon: "50d".into() },
        ];

        let feed = vec![entry("2024-05-01 09:00:00", 15.0), noon, entry("2024-05-01 15:00:00", 22.0)];
        let days = summarize_days(&feed);

        assert_eq!(
            days,
            vec![ForecastDaySummary {
                date: "2024-05-01".into(),
                temperature_c: 21.4,
                icon_code: "10d".into(),
                condition_description: "light rain".into(),
                feels_like_c: 19.9,
                humidity_pct: 77,
                wind_speed_ms: 6.2,
                visibility_meters: 8_500,
            }]
        );
    }

    #[test]
    fn day_without_noon_falls_back_to_first_sample() {
        let feed = vec![
            entry("2024-05-01 15:00:00", 20.0),
            entry("2024-05-01 18:00:00", 17.0),
            entry("2024-05-01 21:00:00", 14.0),
            entry("2024-05-02 00:00:00", 11.0),
            entry("2024-05-02 12:00:00", 19.0),
        ];

        let days = summarize_days(&feed);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].temperature_c, 20.0);
        assert_eq!(days[1].temperature_c, 19.0);
    }

    #[test]
    fn single_sample_day_is_used_as_is() {
        let days = summarize_days(&[entry("2024-05-06 21:00:00", 9.5)]);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, "2024-05-06");
        assert_eq!(days[0].temperature_c, 9.5);
    }

    #[test]
    fn horizon_is_capped_at_five_days() {
        let feed: Vec<_> = (1..=7)
            .map(|d| entry(&format!("2024-05-0{d} 12:00:00"), f64::from(d)))
            .collect();

        let days = summarize_days(&feed);
        assert_eq!(days.len(), FORECAST_HORIZON_DAYS);
        assert_eq!(days.last().map(|d| d.date.as_str()), Some("2024-05-05"));
    }

    #[test]
    fn noon_match_requires_exact_time_of_day() {
        // "12:00:00" appearing elsewhere in the string is not noon
        let feed = vec![entry("2024-05-01 09:00:00", 1.0), entry("2024-05-01 12:00:001", 2.0)];
        let days = summarize_days(&feed);
        assert_eq!(days[0].temperature_c, 1.0);
    }

    #[test]
    fn missing_condition_defaults() {
        let mut e = entry("2024-05-01 12:00:00", 5.0);
        e.weather.clear();
        let days = summarize_days(&[e]);
        assert_eq!(days[0].icon_code, "");
        assert_eq!(days[0].condition_description, "Unknown");
    }

    #[test]
    fn feed_parses_provider_json() {
        let json = r#"{
            "cod": "200",
            "cnt": 1,
            "list": [{
                "dt": 1714564800,
                "main": {"temp": 18.3, "feels_like": 17.6, "humidity": 55, "pressure": 1015},
                "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
                "wind": {"speed": 4.1, "deg": 200, "gust": 6.0},
                "visibility": 10000,
                "dt_txt": "2024-05-01 12:00:00"
            }],
            "city": {"name": "Zagreb", "country": "HR"}
        }"#;

        let feed: ForecastFeed = serde_json::from_str(json).expect("valid feed");
        let days = summarize_days(&feed.list);
        assert_eq!(days[0].icon_code, "01d");
        assert_eq!(days[0].wind_speed_ms, 4.1);
    }

    #[test]
    fn feed_without_list_is_rejected() {
        let json = r#"{"cod": "200", "message": "unexpected"}"#;
        assert!(serde_json::from_str::<ForecastFeed>(json).is_err());
    }
}
