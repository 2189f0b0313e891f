use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// URL of the provider's 2x icon for a condition icon code, e.g. `"10d"`.
pub fn icon_url(icon_code: &str) -> String {
    format!("{ICON_BASE_URL}/{icon_code}@2x.png")
}

/// Current conditions for one city, always in metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city_name: String,
    /// ISO-3166 alpha-2.
    pub country_code: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_speed_ms: f64,
    pub wind_direction_deg: u16,
    pub visibility_meters: u32,
    pub condition_main: String,
    pub condition_description: String,
    pub icon_code: String,
}

impl CurrentWeather {
    pub fn icon_url(&self) -> String {
        icon_url(&self.icon_code)
    }
}

/// One geocoding hit for a free-text city query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySearchMatch {
    pub name: String,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub admin_state: Option<String>,
}

impl CitySearchMatch {
    /// Display label: `"Name, State, CC"`, skipping the state when absent.
    pub fn label(&self) -> String {
        match self.admin_state.as_deref().filter(|s| !s.is_empty()) {
            Some(state) => format!("{}, {}, {}", self.name, state, self.country_code),
            None => format!("{}, {}", self.name, self.country_code),
        }
    }
}

/// Representative forecast for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDaySummary {
    /// Calendar day as `YYYY-MM-DD`.
    pub date: String,
    pub temperature_c: f64,
    pub icon_code: String,
    pub condition_description: String,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_ms: f64,
    pub visibility_meters: u32,
}

impl ForecastDaySummary {
    pub fn day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    pub fn icon_url(&self) -> String {
        icon_url(&self.icon_code)
    }
}
