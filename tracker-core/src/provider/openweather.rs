use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::{
    config::ApiSettings,
    error::FetchError,
    forecast::{ForecastFeed, summarize_days},
    model::{CitySearchMatch, CurrentWeather, ForecastDaySummary},
};

use super::{SEARCH_LIMIT, WeatherProvider};

/// All temperatures are requested in Celsius.
const UNITS: &str = "metric";

const USER_AGENT: &str = concat!("weather-tracker/", env!("CARGO_PKG_VERSION"));

/// Client for the OpenWeather current-weather, forecast and geocoding APIs.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    settings: ApiSettings,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(settings: ApiSettings) -> Result<Self, FetchError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { settings, http })
    }

    /// Issue a GET and decode a successful JSON body into `T`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        debug!(url, "requesting provider");

        let res = self
            .http
            .get(url)
            .query(query)
            .query(&[("appid", self.settings.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let body = truncate_body(&body);
            warn!(url, %status, body = %body, "provider request failed");
            return Err(FetchError::Status { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn current_weather(&self, query: &[(&str, &str)]) -> Result<CurrentWeather, FetchError> {
        let url = format!("{}/weather", self.settings.base_url);
        let parsed: OwCurrentResponse = self.get_json(&url, query).await?;
        Ok(parsed.into())
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn fetch_current_weather(&self, city: &str) -> Result<CurrentWeather, FetchError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(FetchError::EmptyQuery);
        }

        self.current_weather(&[("q", city), ("units", UNITS)]).await
    }

    #[instrument(skip(self))]
    async fn fetch_current_weather_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<CurrentWeather, FetchError> {
        let (lat, lon) = (lat.to_string(), lon.to_string());
        self.current_weather(&[("lat", lat.as_str()), ("lon", lon.as_str()), ("units", UNITS)]).await
    }

    #[instrument(skip(self))]
    async fn search_cities(&self, query: &str) -> Result<Vec<CitySearchMatch>, FetchError> {
        let url = format!("{}/direct", self.settings.geo_base_url);
        let limit = SEARCH_LIMIT.to_string();

        let parsed: Vec<OwGeoMatch> =
            self.get_json(&url, &[("q", query), ("limit", limit.as_str())]).await?;

        Ok(parsed.into_iter().take(SEARCH_LIMIT).map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn fetch_five_day_forecast(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<Vec<ForecastDaySummary>, FetchError> {
        let url = format!("{}/forecast", self.settings.base_url);
        let (lat, lon) = (lat.to_string(), lon.to_string());

        let feed: ForecastFeed = self
            .get_json(&url, &[("lat", lat.as_str()), ("lon", lon.as_str()), ("units", UNITS)])
            .await?;

        debug!(samples = feed.list.len(), "aggregating forecast feed");
        Ok(summarize_days(&feed.list))
    }
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    #[serde(default)]
    deg: u16,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    visibility: u32,
}

impl From<OwCurrentResponse> for CurrentWeather {
    fn from(raw: OwCurrentResponse) -> Self {
        let (condition_main, condition_description, icon_code) = match raw.weather.into_iter().next() {
            Some(w) => (w.main, w.description, w.icon),
            None => ("Unknown".to_string(), "Unknown".to_string(), String::new()),
        };

        Self {
            city_name: raw.name,
            country_code: raw.sys.country,
            temperature_c: raw.main.temp,
            feels_like_c: raw.main.feels_like,
            humidity_pct: raw.main.humidity,
            pressure_hpa: raw.main.pressure,
            wind_speed_ms: raw.wind.speed,
            wind_direction_deg: raw.wind.deg,
            visibility_meters: raw.visibility,
            condition_main,
            condition_description,
            icon_code,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoMatch {
    name: String,
    #[serde(default)]
    country: String,
    lat: f64,
    lon: f64,
    state: Option<String>,
}

impl From<OwGeoMatch> for CitySearchMatch {
    fn from(raw: OwGeoMatch) -> Self {
        Self {
            name: raw.name,
            country_code: raw.country,
            latitude: raw.lat,
            longitude: raw.lon,
            admin_state: raw.state,
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
