//! The user's ordered list of favorite cities.
//!
//! The list lives in memory and is written to a [`KeyValueStore`] under
//! [`FAVORITES_KEY`] after every mutation, so a store created later over the
//! same storage observes every change.
//!
//! Loading is lenient: a missing, empty, or unparseable stored value, or a
//! failed read, yields an empty list. The failure is logged and never returned
//! to the caller. Write failures are returned; the in-memory change stays.
//!
//! Duplicate ids are allowed. Removal drops the first city with a matching id.

use crate::{model::City, storage::{KeyValueStore, StorageError}};

/// Storage key holding the serialized favorites.
pub const FAVORITES_KEY: &str = "weather";

#[derive(Debug)]
pub struct FavoritesStore<S: KeyValueStore> {
    storage: S,
    cities: Vec<City>,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Read persisted favorites from `storage`.
    pub fn load(storage: S) -> Self {
        let cities = match storage.get(FAVORITES_KEY) {
            Ok(Some(raw)) => parse_favorites(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored favorites, starting empty");
                Vec::new()
            }
        };

        tracing::debug!(count = cities.len(), "Loaded favorites");
        Self { storage, cities }
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn contains(&self, city_id: u64) -> bool {
        self.cities.iter().any(|c| c.id == city_id)
    }

    /// Append `city`. No duplicate check.
    ///
    /// On a write failure the city stays in memory and the error is returned.
    pub fn add_to_favorite(&mut self, city: City) -> Result<(), StorageError> {
        tracing::info!(id = city.id, name = %city.name, "Adding favorite");
        self.cities.push(city);
        self.persist()
    }

    /// Remove the first city with `city_id`. Unknown ids leave the list as is.
    pub fn remove_from_favorite(&mut self, city_id: u64) -> Result<(), StorageError> {
        match self.cities.iter().position(|c| c.id == city_id) {
            Some(index) => {
                let removed = self.cities.remove(index);
                tracing::info!(id = removed.id, name = %removed.name, "Removed favorite");
            }
            None => tracing::debug!(id = city_id, "No favorite with this id"),
        }

        self.persist()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let encoded = serialize_favorites(&self.cities)?;
        self.storage.set(FAVORITES_KEY, &encoded)
    }
}

pub fn serialize_favorites(cities: &[City]) -> Result<String, StorageError> {
    Ok(serde_json::to_string(cities)?)
}

/// Parse a stored favorites value, falling back to an empty list.
pub fn parse_favorites(raw: &str) -> Vec<City> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Option<Vec<City>>>(raw) {
        Ok(cities) => cities.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored favorites are unreadable, starting empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::fixtures::city, storage::MemoryStore};

    #[derive(Debug)]
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::NoDataDir)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write {
                path: format!("{key}.json").into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    fn store_with(cities: &[City]) -> FavoritesStore<MemoryStore> {
        let mut storage = MemoryStore::new();
        storage.set(FAVORITES_KEY, &serialize_favorites(cities).unwrap()).unwrap();
        FavoritesStore::load(storage)
    }

    fn persisted(store: &FavoritesStore<MemoryStore>) -> Vec<City> {
        let raw = store.storage().get(FAVORITES_KEY).unwrap().expect("value written");
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn load_without_value_is_empty() {
        let store = FavoritesStore::load(MemoryStore::new());
        assert!(store.is_empty());
    }

    #[test]
    fn load_from_corrupted_value_is_empty() {
        for raw in ["{not json", "42", "[{\"id\": \"x\"}]", ""] {
            let mut storage = MemoryStore::new();
            storage.set(FAVORITES_KEY, raw).unwrap();

            let store = FavoritesStore::load(storage);
            assert!(store.is_empty(), "expected empty list for {raw:?}");
        }
    }

    #[test]
    fn load_from_null_is_empty() {
        let store = store_with(&[]);
        assert!(store.is_empty());

        let mut storage = MemoryStore::new();
        storage.set(FAVORITES_KEY, "null").unwrap();
        assert!(FavoritesStore::load(storage).is_empty());
    }

    #[test]
    fn add_appends_to_the_end_and_persists() {
        let mut store = store_with(&[city(1, "Paris")]);

        let lyon = city(2, "Lyon");
        store.add_to_favorite(lyon.clone()).unwrap();

        assert_eq!(store.cities().last(), Some(&lyon));
        assert_eq!(store.len(), 2);
        assert_eq!(persisted(&store), store.cities());
    }

    #[test]
    fn add_allows_duplicates() {
        let mut store = store_with(&[]);

        store.add_to_favorite(city(5, "Nice")).unwrap();
        store.add_to_favorite(city(5, "Nice")).unwrap();

        assert_eq!(store.len(), 2);
    }

    #[test]
    fn remove_unknown_id_keeps_list() {
        let before = vec![city(1, "Paris"), city(2, "Lyon")];
        let mut store = store_with(&before);

        store.remove_from_favorite(99).unwrap();

        assert_eq!(store.cities(), before.as_slice());
        assert_eq!(persisted(&store), before);
    }

    #[test]
    fn remove_only_city_empties_list() {
        let mut store = store_with(&[city(5, "Nice")]);

        store.remove_from_favorite(5).unwrap();

        assert!(store.is_empty());
        assert!(persisted(&store).is_empty());
    }

    #[test]
    fn remove_drops_first_duplicate_only() {
        let mut first = city(5, "Nice");
        first.code = "first".into();
        let mut second = city(5, "Nice");
        second.code = "second".into();
        let mut store = store_with(&[first, city(7, "Lille"), second.clone()]);

        store.remove_from_favorite(5).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.cities()[0].id, 7);
        assert_eq!(store.cities()[1], second);
    }

    #[test]
    fn serialized_list_round_trips() {
        let cities = vec![city(1, "Paris"), city(2, "Lyon"), city(1, "Paris")];
        assert_eq!(parse_favorites(&serialize_favorites(&cities).unwrap()), cities);
    }

    #[test]
    fn reload_sees_previous_mutations() {
        let mut store = store_with(&[]);
        store.add_to_favorite(city(1, "Paris")).unwrap();
        store.add_to_favorite(city(2, "Lyon")).unwrap();
        store.remove_from_favorite(1).unwrap();

        let reloaded = FavoritesStore::load(store.storage().clone());
        assert_eq!(reloaded.cities(), &[city(2, "Lyon")]);
    }

    #[test]
    fn contains_matches_by_id() {
        let store = store_with(&[city(3, "Lille")]);
        assert!(store.contains(3));
        assert!(!store.contains(4));
    }

    #[test]
    fn read_failure_loads_empty_list() {
        let store = FavoritesStore::load(BrokenStore);
        assert!(store.is_empty());
    }

    #[test]
    fn write_failure_is_returned_and_keeps_memory() {
        let mut store = FavoritesStore::load(BrokenStore);

        let err = store.add_to_favorite(city(1, "Paris")).unwrap_err();
        assert!(matches!(err, StorageError::Write { .. }));
        assert_eq!(store.len(), 1);

        let err = store.remove_from_favorite(1).unwrap_err();
        assert!(err.to_string().contains("read-only"));
        assert!(store.is_empty());
    }
}
