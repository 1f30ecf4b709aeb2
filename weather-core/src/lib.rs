//! Core library for the `weather` favorites app.
//!
//! This crate defines:
//! - The city / weather / geolocation data model
//! - The favorites store and its key/value persistence
//! - The route table of navigable pages
//! - Configuration and the HTTP API providers
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod favorites;
pub mod model;
pub mod provider;
pub mod routes;
pub mod storage;

pub use config::Config;
pub use favorites::{FAVORITES_KEY, FavoritesStore};
pub use model::{City, Continent, Country, LooseValue, Meta, RootCity, State, User, Weather};
pub use provider::{CityProvider, GeoProvider, WeatherProvider};
pub use routes::{Page, Route, RouteName, ROUTES};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
