use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A city as returned by the city search API.
///
/// Treated as an immutable value once fetched. `id` is the identifier the
/// source API assigns; the favorites list uses it for removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: u64,
    pub code: String,
    pub name: String,
    pub latitude: String,
    pub longitude: String,
    pub continent: Continent,
    pub country: Country,
    pub state: State,
    #[serde(default)]
    pub county: Option<LooseValue>,
    #[serde(default)]
    pub postcode: Option<LooseValue>,
}

impl City {
    /// Parse the textual latitude/longitude into numbers.
    pub fn coordinates(&self) -> Result<(f64, f64)> {
        let lat = self.latitude.trim().parse::<f64>().with_context(|| {
            format!("City '{}' has an invalid latitude: {:?}", self.name, self.latitude)
        })?;
        let lon = self.longitude.trim().parse::<f64>().with_context(|| {
            format!("City '{}' has an invalid longitude: {:?}", self.name, self.longitude)
        })?;

        Ok((lat, lon))
    }

    /// "Name, State, Country" with empty parts skipped.
    pub fn display_name(&self) -> String {
        [self.name.as_str(), self.state.name.as_str(), self.country.name.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Continent {
    pub code: String,
    pub name: String,
    pub latitude: String,
    pub longitude: String,
    pub name_es: String,
    pub name_fr: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub code: String,
    pub name: String,
    pub latitude: String,
    pub longitude: String,
    pub name_es: String,
    pub name_fr: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub code: String,
    pub name: String,
    pub latitude: String,
    pub longitude: String,
}

/// A field the city API types inconsistently (seen as both text and numbers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseValue {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl fmt::Display for LooseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LooseValue::Text(s) => f.write_str(s),
            LooseValue::Number(n) => write!(f, "{n}"),
            LooseValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Paging metadata of a city search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub current_page: u32,
    pub first_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
}

/// City search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootCity {
    pub cities: Vec<City>,
    pub meta: Meta,
}

/// IP geolocation of the current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub status: String,
    /// Only present when `status` is not "success".
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub region_name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub isp: String,
    #[serde(default)]
    pub org: String,
    #[serde(default, rename = "as")]
    pub asn: String,
    #[serde(default)]
    pub query: String,
}

impl User {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// 5-day / 3-hour forecast response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub cod: String,
    pub message: f64,
    pub cnt: u32,
    pub list: Vec<ForecastEntry>,
    pub city: ForecastCity,
}

impl Weather {
    /// The forecast slot closest to `now`, used as "current" weather.
    pub fn current_at(&self, now: DateTime<Utc>) -> Option<&ForecastEntry> {
        let target_ts = now.timestamp();
        self.list.iter().min_by_key(|e| e.dt.abs_diff(target_ts))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: MainReadings,
    pub weather: Vec<Condition>,
    pub clouds: Clouds,
    pub wind: Wind,
    #[serde(default)]
    pub visibility: Option<u32>,
    #[serde(default)]
    pub pop: f64,
    pub sys: Sys,
    pub dt_txt: String,
}

impl ForecastEntry {
    pub fn time(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.dt)
    }

    pub fn description(&self) -> &str {
        self.weather
            .first()
            .map(|w| w.description.as_str())
            .unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: i32,
    #[serde(default)]
    pub sea_level: Option<i32>,
    #[serde(default)]
    pub grnd_level: Option<i32>,
    pub humidity: u8,
    #[serde(default)]
    pub temp_kf: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    pub all: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub deg: f64,
    #[serde(default)]
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sys {
    pub pod: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastCity {
    pub id: u64,
    pub name: String,
    pub coord: Coord,
    pub country: String,
    #[serde(default)]
    pub population: u64,
    pub timezone: i32,
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

pub(crate) fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}
