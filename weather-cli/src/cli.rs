use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use weather_core::{Config, routes};

use crate::app::App;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather for your favorite cities")]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the OpenWeather API key and the city search endpoint.
    Configure,

    /// Open a page by name ("home", "favorite") or path ("/", "/favorite").
    Open {
        target: String,

        /// Also search cities (Home page only).
        #[arg(long)]
        search: Option<String>,
    },

    /// Search cities by name.
    Search {
        query: String,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Search cities and save one as a favorite.
    Add { query: String },

    /// Remove a favorite by city id.
    Remove { id: u64 },

    /// List favorites with their current weather.
    Favorites,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::Open { target, search } => {
                let route = routes::find(&target)?;
                App::new(config)?.open(route, search.as_deref()).await
            }
            Command::Search { query, page } => App::new(config)?.search(&query, page).await,
            Command::Add { query } => App::new(config)?.add(&query).await,
            Command::Remove { id } => App::new(config)?.remove(id),
            Command::Favorites => {
                let route = routes::resolve(weather_core::RouteName::Favorite);
                App::new(config)?.open(route, None).await
            }
        }
    }
}

fn configure(mut config: Config) -> Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Configuration cancelled")?;

    let mut cities = Text::new("City search URL:");
    if let Some(current) = config.cities_url.as_deref() {
        cities = cities.with_default(current);
    }
    let cities_url = cities.prompt().context("Configuration cancelled")?;

    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }
    if !cities_url.trim().is_empty() {
        config.cities_url = Some(cities_url.trim().to_string());
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
