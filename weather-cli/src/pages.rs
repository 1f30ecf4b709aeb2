//! Text rendering of the Home and Favorite pages.

use chrono::{DateTime, Utc};
use std::fmt::Write;
use weather_core::{City, User, Weather};

/// Current conditions block for one location.
pub fn render_current(label: &str, weather: &Weather, now: DateTime<Utc>) -> String {
    let mut out = format!("{label}\n");

    match weather.current_at(now) {
        Some(entry) => {
            let when = entry
                .time()
                .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| entry.dt_txt.clone());

            let _ = writeln!(
                out,
                "  {:.1}°C (feels like {:.1}°C), {}",
                entry.main.temp,
                entry.main.feels_like,
                entry.description()
            );
            let _ = writeln!(
                out,
                "  humidity {}%, wind {:.1} m/s",
                entry.main.humidity, entry.wind.speed
            );
            let _ = writeln!(out, "  as of {when}");
        }
        None => out.push_str("  no forecast data\n"),
    }

    out
}

pub fn render_home(user: &User, weather: &Weather, favorites: usize, now: DateTime<Utc>) -> String {
    let label = format!("Weather in {}, {}", user.city, user.country);
    let mut out = render_current(&label, weather, now);

    let _ = writeln!(
        out,
        "\n{favorites} favorite city(ies) saved. See them with `weather open favorite`."
    );
    out
}

/// Search results; `is_favorite` marks cities already saved.
pub fn render_city_list(cities: &[City], is_favorite: impl Fn(u64) -> bool) -> String {
    if cities.is_empty() {
        return "No cities found.\n".to_string();
    }

    let mut out = String::new();
    for city in cities {
        let marker = if is_favorite(city.id) { "*" } else { " " };
        let _ = writeln!(out, "{marker} [{}] {}", city.id, city.display_name());
    }
    out
}

/// One block per favorite, in list order. A failed lookup is shown inline.
pub fn render_favorites(
    entries: &[(&City, anyhow::Result<Weather>)],
    now: DateTime<Utc>,
) -> String {
    if entries.is_empty() {
        return "No favorite cities yet. Add one with `weather add <city>`.\n".to_string();
    }

    let mut out = String::new();
    for (city, weather) in entries {
        let label = format!("[{}] {}", city.id, city.display_name());
        match weather {
            Ok(weather) => out.push_str(&render_current(&label, weather, now)),
            Err(e) => {
                let _ = writeln!(out, "{label}\n  weather unavailable: {e:#}");
            }
        }
    }
    out
}
