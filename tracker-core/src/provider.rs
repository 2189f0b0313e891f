use crate::{
    config::{ApiSettings, Config},
    error::FetchError,
    model::{CitySearchMatch, CurrentWeather, ForecastDaySummary},
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Maximum number of geocoding matches requested and returned.
pub const SEARCH_LIMIT: usize = 5;

/// Source of weather data and city lookups.
///
/// Every call is a single request against the provider; there are no
/// retries and no caching.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_current_weather(&self, city: &str) -> Result<CurrentWeather, FetchError>;

    async fn fetch_current_weather_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<CurrentWeather, FetchError>;

    /// Up to [`SEARCH_LIMIT`] matches; an unknown place yields an empty list.
    async fn search_cities(&self, query: &str) -> Result<Vec<CitySearchMatch>, FetchError>;

    /// One summary per day, chronologically ordered, at most five days.
    async fn fetch_five_day_forecast(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<Vec<ForecastDaySummary>, FetchError>;
}

/// Construct the provider client from explicit settings.
pub fn provider_from_settings(settings: ApiSettings) -> anyhow::Result<Box<dyn WeatherProvider>> {
    Ok(Box::new(OpenWeatherClient::new(settings)?))
}

/// Construct the provider client from on-disk config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    provider_from_settings(config.api_settings()?)
}
