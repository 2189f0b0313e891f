//! Core library for the `weather-tracker` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client (current weather, city search, 5-day forecast)
//! - Forecast aggregation into one representative entry per day
//! - Favorite cities persisted in a local key-value store
//! - Debounced search-as-you-type
//!
//! It is used by `tracker-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod favorites;
pub mod forecast;
pub mod model;
pub mod provider;
pub mod search;

pub use config::{ApiSettings, Config};
pub use error::{FetchError, StorageError};
pub use favorites::{FavoritesStore, FileStore, KeyValueStore, MemoryStore};
pub use forecast::summarize_days;
pub use model::{CitySearchMatch, CurrentWeather, ForecastDaySummary, icon_url};
pub use provider::{WeatherProvider, openweather::OpenWeatherClient};
pub use search::SearchDebouncer;
