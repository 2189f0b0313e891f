use chrono::Datelike;
use tracker_core::{CitySearchMatch, CurrentWeather, ForecastDaySummary};

/// Whole degrees, the way the cards show them.
fn degrees(celsius: f64) -> String {
    // `+ 0.0` turns -0 into 0
    format!("{}°C", celsius.round() + 0.0)
}

/// One-line card for the city list.
pub fn city_card(weather: &CurrentWeather) -> String {
    format!(
        "{:<24} {:>3}  {:>6}  {}",
        weather.city_name,
        weather.country_code,
        degrees(weather.temperature_c),
        weather.condition_description,
    )
}

pub fn current_weather(weather: &CurrentWeather) -> String {
    format!(
        "{}, {}\n  {} ({}), feels like {}\n  Humidity:   {}%\n  Pressure:   {} hPa\n  \
         Wind:       {:.1} m/s from {}°\n  Visibility: {:.1} km\n  Icon:       {}",
        weather.city_name,
        weather.country_code,
        degrees(weather.temperature_c),
        weather.condition_description,
        degrees(weather.feels_like_c),
        weather.humidity_pct,
        weather.pressure_hpa,
        weather.wind_speed_ms,
        weather.wind_direction_deg,
        f64::from(weather.visibility_meters) / 1000.0,
        weather.icon_url(),
    )
}

/// Weekday label such as `"Wed 05-01"`, falling back to the raw date.
fn day_label(day: &ForecastDaySummary) -> String {
    match day.day() {
        Some(date) => format!("{} {:02}-{:02}", date.weekday(), date.month(), date.day()),
        None => day.date.clone(),
    }
}

pub fn forecast(days: &[ForecastDaySummary]) -> String {
    if days.is_empty() {
        return "No forecast available".to_string();
    }

    days.iter()
        .map(|day| {
            format!(
                "{:<10} {:>6}  {:<20} humidity {:>3}%  wind {:.1} m/s",
                day_label(day),
                degrees(day.temperature_c),
                day.condition_description,
                day.humidity_pct,
                day.wind_speed_ms,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn search_results(matches: &[CitySearchMatch]) -> String {
    if matches.is_empty() {
        return "No cities found".to_string();
    }

    matches
        .iter()
        .enumerate()
        .map(|(idx, m)| {
            format!("{}. {} ({:.2}, {:.2})", idx + 1, m.label(), m.latitude, m.longitude)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
