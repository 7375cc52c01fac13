use crate::model::EntityType;
use crate::query::SearchFilters;
use anyhow::Result;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, rename, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub const SAVED_SEARCHES_FILE: &str = "saved_searches.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    pub id: String,
    pub name: String,
    pub filters: SearchFilters,
    pub query: String,
    pub entity_type: EntityType,
    #[serde(default)]
    pub created_at: String,
}

impl SavedSearch {
    /// Stamps a `search-<unix millis>` id and an RFC 3339 creation time.
    pub fn new(name: impl Into<String>, entity_type: EntityType, query: impl Into<String>, filters: SearchFilters) -> Self {
        let now = OffsetDateTime::now_utc();
        SavedSearch {
            id: format!("search-{}", now.unix_timestamp_nanos() / 1_000_000),
            name: name.into(),
            filters,
            query: query.into(),
            entity_type,
            created_at: now.format(&Rfc3339).unwrap_or_default(),
        }
    }
}

pub trait SavedSearchStore: Send + Sync {
    /// Appends `search` to the stored list.
    fn save(&self, search: SavedSearch) -> Result<()>;
    fn list(&self) -> Result<Vec<SavedSearch>>;
}

pub struct StorePaths {
    pub root: PathBuf,
}

impl StorePaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn saved_searches(&self) -> PathBuf { self.root.join(SAVED_SEARCHES_FILE) }
    pub fn saved_searches_tmp(&self) -> PathBuf { self.root.join(format!("{SAVED_SEARCHES_FILE}.tmp")) }
}

/// Saved searches as a JSON array in `<root>/saved_searches.json`.
pub struct JsonFileStore {
    paths: StorePaths,
    // serializes read-modify-write cycles within this process
    lock: RwLock<()>,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { paths: StorePaths::new(root), lock: RwLock::new(()) }
    }

    pub fn path(&self) -> PathBuf {
        self.paths.saved_searches()
    }

    fn read_all(&self) -> Result<Vec<SavedSearch>> {
        let mut f = match File::open(self.paths.saved_searches()) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut buf = String::new();
        f.read_to_string(&mut buf)?;
        if buf.trim().is_empty() {
            return Ok(Vec::new());
        }
        let searches: Vec<SavedSearch> = serde_json::from_str(&buf)?;
        Ok(searches)
    }

    /// Writes a sibling temp file and renames it over the live one, so a
    /// failed write never leaves a truncated list behind.
    fn write_all(&self, searches: &[SavedSearch]) -> Result<()> {
        create_dir_all(&self.paths.root)?;
        let tmp = self.paths.saved_searches_tmp();
        let json = serde_json::to_string_pretty(searches)?;
        let mut f = File::create(&tmp)?;
        f.write_all(json.as_bytes())?;
        f.sync_all()?;
        drop(f);
        rename(&tmp, self.paths.saved_searches())?;
        Ok(())
    }
}

impl SavedSearchStore for JsonFileStore {
    fn save(&self, search: SavedSearch) -> Result<()> {
        let _guard = self.lock.write();
        let mut searches = self.read_all()?;
        tracing::debug!(id = %search.id, existing = searches.len(), "saving search");
        searches.push(search);
        self.write_all(&searches)
    }

    fn list(&self) -> Result<Vec<SavedSearch>> {
        let _guard = self.lock.read();
        self.read_all()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    searches: RwLock<Vec<SavedSearch>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SavedSearchStore for MemoryStore {
    fn save(&self, search: SavedSearch) -> Result<()> {
        self.searches.write().push(search);
        Ok(())
    }

    fn list(&self) -> Result<Vec<SavedSearch>> {
        Ok(self.searches.read().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Facet;

    #[test]
    fn new_search_gets_id_and_timestamp() {
        let mut filters = SearchFilters::default();
        filters.toggle(Facet::Country, "China");
        let s = SavedSearch::new("China suppliers", EntityType::Supplier, "", filters);
        assert!(s.id.starts_with("search-"));
        assert!(!s.created_at.is_empty());
        assert_eq!(s.filters.country, vec!["China"]);
    }

    #[test]
    fn memory_store_appends() {
        let store = MemoryStore::new();
        store.save(SavedSearch::new("a", EntityType::Carrier, "ftl", SearchFilters::default())).unwrap();
        store.save(SavedSearch::new("b", EntityType::Carrier, "ltl", SearchFilters::default())).unwrap();
        let names: Vec<String> = store.list().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
