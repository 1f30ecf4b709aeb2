//! Composition root: owns the configuration and the favorites store and
//! hands them to the pages.

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use inquire::{Confirm, Select};
use std::fmt;
use weather_core::{
    City, Config, FavoritesStore, FileStore, Page, Route,
    provider::{city_provider_from_config, geo_provider_from_config, weather_provider_from_config},
};

use crate::pages;

#[derive(Debug)]
pub struct App {
    config: Config,
    favorites: FavoritesStore<FileStore>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let storage = config.favorites_storage()?;
        tracing::debug!(dir = %storage.dir().display(), "Using favorites storage");

        Ok(Self { favorites: FavoritesStore::load(storage), config })
    }

    pub async fn open(&self, route: &Route, search: Option<&str>) -> Result<()> {
        tracing::debug!(route = %route.name, path = route.path, "Opening page");

        match route.page {
            Page::Home => self.home_page(search).await,
            Page::Favorite => self.favorite_page().await,
        }
    }

    async fn home_page(&self, search: Option<&str>) -> Result<()> {
        let geo = geo_provider_from_config(&self.config)?;
        let weather = weather_provider_from_config(&self.config)?;

        let user = geo.locate().await?;
        let forecast = weather.forecast(user.lat, user.lon).await?;

        print!("{}", pages::render_home(&user, &forecast, self.favorites.len(), Utc::now()));

        if let Some(query) = search {
            println!();
            self.search(query, 1).await?;
        }

        Ok(())
    }

    async fn favorite_page(&self) -> Result<()> {
        let cities = self.favorites.cities();
        let mut entries = Vec::with_capacity(cities.len());

        if !cities.is_empty() {
            let weather = weather_provider_from_config(&self.config)?;

            for city in cities {
                let result = match city.coordinates() {
                    Ok((lat, lon)) => weather.forecast(lat, lon).await,
                    Err(e) => Err(e),
                };
                if let Err(e) = &result {
                    tracing::warn!(id = city.id, error = %e, "Weather lookup failed");
                }
                entries.push((city, result));
            }
        }

        print!("{}", pages::render_favorites(&entries, Utc::now()));
        Ok(())
    }

    pub async fn search(&self, query: &str, page: u32) -> Result<()> {
        let provider = city_provider_from_config(&self.config)?;
        let found = provider.search(query, page).await?;

        print!("{}", pages::render_city_list(&found.cities, |id| self.favorites.contains(id)));
        println!(
            "Page {} of {} ({} total)",
            found.meta.current_page, found.meta.last_page, found.meta.total
        );
        Ok(())
    }

    /// Search, let the user pick one result, and save it.
    pub async fn add(&mut self, query: &str) -> Result<()> {
        let provider = city_provider_from_config(&self.config)?;
        let found = provider.search(query, 1).await?;

        if found.cities.is_empty() {
            return Err(anyhow!("No cities found for '{query}'"));
        }

        let options: Vec<CityOption> = found.cities.into_iter().map(CityOption).collect();
        let CityOption(city) = Select::new("Which city?", options)
            .prompt()
            .context("City selection cancelled")?;

        if self.favorites.contains(city.id) {
            let again = Confirm::new(&format!("{} is already a favorite. Add it again?", city.name))
                .with_default(false)
                .prompt()
                .context("Confirmation cancelled")?;
            if !again {
                return Ok(());
            }
        }

        let name = city.display_name();
        self.favorites.add_to_favorite(city)?;
        println!("Added {name} to favorites.");
        Ok(())
    }

    pub fn remove(&mut self, city_id: u64) -> Result<()> {
        let existed = self.favorites.contains(city_id);
        self.favorites.remove_from_favorite(city_id)?;

        if existed {
            println!("Removed city {city_id} from favorites.");
        } else {
            println!("City {city_id} is not a favorite; nothing to remove.");
        }
        Ok(())
    }
}

struct CityOption(City);

impl fmt::Display for CityOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.0.display_name(), self.0.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::{FAVORITES_KEY, KeyValueStore};

    fn city_json(id: u64, name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id, "code": "C", "name": name, "latitude": "1.0", "longitude": "2.0",
            "continent": {
                "code": "EU", "name": "Europe", "latitude": "0", "longitude": "0",
                "nameEs": "Europa", "nameFr": "Europe"
            },
            "country": {
                "code": "FR", "name": "France", "latitude": "0", "longitude": "0",
                "nameEs": "Francia", "nameFr": "France"
            },
            "state": { "code": "", "name": "", "latitude": "0", "longitude": "0" }
        })
    }

    fn config_in(dir: &std::path::Path) -> Config {
        Config { data_dir: Some(dir.to_path_buf()), ..Config::default() }
    }

    #[test]
    fn new_loads_saved_favorites() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStore::new(dir.path());
        let saved = serde_json::json!([city_json(1, "Paris"), city_json(2, "Lyon")]);
        storage.set(FAVORITES_KEY, &saved.to_string()).unwrap();

        let app = App::new(config_in(dir.path())).unwrap();

        assert_eq!(app.favorites.len(), 2);
        assert_eq!(app.favorites.cities()[1].name, "Lyon");
    }

    #[test]
    fn remove_persists_to_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStore::new(dir.path());
        let saved = serde_json::json!([city_json(1, "Paris"), city_json(2, "Lyon")]);
        storage.set(FAVORITES_KEY, &saved.to_string()).unwrap();

        let mut app = App::new(config_in(dir.path())).unwrap();
        app.remove(1).unwrap();
        app.remove(42).unwrap();

        let reloaded = App::new(config_in(dir.path())).unwrap();
        let ids: Vec<u64> = reloaded.favorites.cities().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn empty_favorite_page_needs_no_api_key() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(config_in(dir.path())).unwrap();

        let route = weather_core::routes::resolve(weather_core::RouteName::Favorite);
        assert!(app.open(route, None).await.is_ok());
    }

    #[test]
    fn city_option_shows_name_and_id() {
        let city: City = serde_json::from_value(city_json(7, "Nice")).unwrap();
        assert_eq!(CityOption(city).to_string(), "Nice, France [7]");
    }
}
