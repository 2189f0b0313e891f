use std::{io::Write, sync::Arc};

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracker_core::{
    Config, FavoritesStore, FileStore, WeatherProvider,
    provider::provider_from_config,
    search::{MIN_QUERY_CHARS, SearchDebouncer},
};

use crate::render;

/// Shown on the home view when nothing has been bookmarked yet.
const POPULAR_CITIES: &[&str] = &["Zagreb", "Sarajevo"];

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-tracker", version, about = "Weather Tracker CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather for a city or coordinates.
    Current(Location),

    /// Search cities by name.
    Search {
        /// Query text; required unless `--live` is given.
        query: Option<String>,

        /// Read successive search-field states from stdin, one per line,
        /// and search as you type.
        #[arg(long, conflicts_with = "query")]
        live: bool,
    },

    /// Show the 5-day forecast for a city or coordinates.
    Forecast(Location),

    /// Manage favorite cities.
    Favorites {
        #[command(subcommand)]
        action: FavoritesCommand,
    },

    /// Current weather for every favorite city.
    Home,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesCommand {
    /// List favorite cities in the order they were added.
    List,
    /// Bookmark a city.
    Add { city: String },
    /// Remove a city from favorites.
    Remove { city: String },
    /// Tell whether a city is a favorite.
    Check { city: String },
}

/// Either a city name or a `--lat`/`--lon` pair.
#[derive(Debug, Args)]
pub struct Location {
    /// City name, e.g. "Zagreb".
    pub city: Option<String>,

    #[arg(long, requires = "lon", conflicts_with = "city", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    #[arg(long, requires = "lat", conflicts_with = "city", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
enum Target {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl Location {
    fn target(&self) -> Result<Target> {
        match (&self.city, self.lat, self.lon) {
            (Some(city), _, _) => Ok(Target::City(city.clone())),
            (None, Some(lat), Some(lon)) => Ok(Target::Coordinates { lat, lon }),
            _ => Err(anyhow!("Provide a city name or both --lat and --lon.")),
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure => configure(&mut config)?,
            Command::Current(location) => {
                let provider = provider_from_config(&config)?;
                let weather = match location.target()? {
                    Target::City(city) => provider.fetch_current_weather(&city).await,
                    Target::Coordinates { lat, lon } => {
                        provider.fetch_current_weather_by_coordinates(lat, lon).await
                    }
                }
                .context("No weather data found")?;

                println!("{}", render::current_weather(&weather));
            }
            Command::Search { query, live } => {
                let provider: Arc<dyn WeatherProvider> = Arc::from(provider_from_config(&config)?);
                if live {
                    live_search(provider, BufReader::new(tokio::io::stdin()), &mut std::io::stdout())
                        .await?;
                } else {
                    let query = query.ok_or_else(|| anyhow!("Provide a query or use --live."))?;
                    // failures read the same as an empty result
                    let matches = provider.search_cities(&query).await.unwrap_or_else(|e| {
                        tracing::debug!(error = %e, "city search failed");
                        Vec::new()
                    });
                    println!("{}", render::search_results(&matches));
                }
            }
            Command::Forecast(location) => {
                let provider = provider_from_config(&config)?;
                let (lat, lon) = match location.target()? {
                    Target::Coordinates { lat, lon } => (lat, lon),
                    Target::City(city) => {
                        let first = provider
                            .search_cities(&city)
                            .await
                            .context("City lookup failed")?
                            .into_iter()
                            .next()
                            .ok_or_else(|| anyhow!("No cities found for '{city}'."))?;
                        println!("{}", first.label());
                        (first.latitude, first.longitude)
                    }
                };

                let days = provider
                    .fetch_five_day_forecast(lat, lon)
                    .await
                    .context("Failed to fetch 5-day forecast")?;
                println!("{}", render::forecast(&days));
            }
            Command::Favorites { action } => {
                let favorites = favorites_store(&config)?;
                match action {
                    FavoritesCommand::List => {
                        let cities = favorites.list_favorites().await?;
                        if cities.is_empty() {
                            println!("No saved cities");
                        }
                        for city in cities {
                            println!("{city}");
                        }
                    }
                    FavoritesCommand::Add { city } => {
                        favorites.add_favorite(&city).await?;
                        println!("Saved {city}");
                    }
                    FavoritesCommand::Remove { city } => {
                        favorites.remove_favorite(&city).await?;
                        println!("Removed {city}");
                    }
                    FavoritesCommand::Check { city } => {
                        let saved = favorites.is_favorite(&city).await?;
                        println!("{}", if saved { "yes" } else { "no" });
                    }
                }
            }
            Command::Home => home(&config).await?,
        }

        Ok(())
    }
}

fn configure(config: &mut Config) -> Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key);
    config.api_settings()?;
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn favorites_store(config: &Config) -> Result<FavoritesStore<FileStore>> {
    Ok(FavoritesStore::new(FileStore::new(config.data_dir()?)))
}

async fn home(config: &Config) -> Result<()> {
    let provider = provider_from_config(config)?;

    // an unreadable favorites file shows up as an empty list here
    let favorites = favorites_store(config)?.list_favorites().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to read favorites");
        Vec::new()
    });

    println!("Your Cities");
    if favorites.is_empty() {
        println!("  No saved cities");
    }
    print_city_cards(provider.as_ref(), &favorites).await;

    println!();
    println!("Popular Cities");
    let popular: Vec<String> = POPULAR_CITIES.iter().map(|c| c.to_string()).collect();
    print_city_cards(provider.as_ref(), &popular).await;

    Ok(())
}

/// One request per city, in order.
async fn print_city_cards(provider: &dyn WeatherProvider, cities: &[String]) {
    for city in cities {
        match provider.fetch_current_weather(city).await {
            Ok(weather) => println!("  {}", render::city_card(&weather)),
            Err(e) => {
                tracing::debug!(city = %city, error = %e, "current weather failed");
                println!("  {city}: no weather data found");
            }
        }
    }
}

/// Treat each input line as the current content of a search field.
///
/// Every publication is printed, including the empty list that clears the
/// results when the field drops below the search gate.
async fn live_search<R, W>(provider: Arc<dyn WeatherProvider>, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut search = SearchDebouncer::new(provider);
    let mut results = search.subscribe();
    let mut lines = input.lines();
    let mut awaiting = false;

    loop {
        tokio::select! {
            biased;

            changed = results.changed() => {
                changed.context("Search results channel closed")?;
                awaiting = false;
                writeln!(out, "{}", render::search_results(&results.borrow_and_update()))?;
            }
            line = lines.next_line() => {
                let Some(text) = line.context("Failed to read search input")? else {
                    break;
                };
                search.input(&text);
                awaiting = text.trim().chars().count() >= MIN_QUERY_CHARS;
            }
        }
    }

    if awaiting {
        results.changed().await.context("Search results channel closed")?;
        writeln!(out, "{}", render::search_results(&results.borrow_and_update()))?;
    }

    Ok(())
}
