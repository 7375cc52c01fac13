//! Loading the base collection from JSON / JSONL files.

use crate::model::{EntityType, Record};
use anyhow::{bail, Context, Result};
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Every record known to the dashboard, in load order.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    records: Vec<Record>,
    seen: HashSet<(EntityType, String)>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut catalog = Catalog::new();
        for record in records {
            catalog.insert(record);
        }
        catalog
    }

    /// Returns false and drops the record when its `(entity type, id)` is
    /// already present.
    pub fn insert(&mut self, record: Record) -> bool {
        let key = (record.entity_type(), record.id().to_string());
        if !self.seen.insert(key) {
            tracing::warn!(entity_type = %record.entity_type(), id = record.id(), "duplicate record skipped");
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records of one type, in load order.
    pub fn records_of(&self, entity_type: EntityType) -> Vec<Record> {
        self.records.iter().filter(|r| r.entity_type() == entity_type).cloned().collect()
    }

    pub fn find(&self, entity_type: EntityType, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.entity_type() == entity_type && r.id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn counts(&self) -> BTreeMap<EntityType, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.entity_type()).or_insert(0) += 1;
        }
        counts
    }
}

/// Load a `.json` (array or single object) or `.jsonl` file, or every such
/// file under a directory.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let input_path = path.as_ref();
    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(extension(p), Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    } else {
        bail!("catalog path not found: {}", input_path.display());
    }

    let mut catalog = Catalog::new();
    for file in &files {
        let loaded = if extension(file) == Some("jsonl") {
            load_jsonl(file, &mut catalog)
        } else {
            load_json(file, &mut catalog)
        };
        loaded.with_context(|| format!("loading {}", file.display()))?;
    }
    tracing::info!(files = files.len(), records = catalog.len(), "catalog loaded");
    Ok(catalog)
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|s| s.to_str())
}

fn load_jsonl(file: &Path, catalog: &mut Catalog) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let record: Record = serde_json::from_str(&line).with_context(|| format!("line {}", line_no + 1))?;
        catalog.insert(record);
    }
    Ok(())
}

fn load_json(file: &Path, catalog: &mut Catalog) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                let record: Record = serde_json::from_value(v)?;
                catalog.insert(record);
            }
        }
        serde_json::Value::Object(_) => {
            let record: Record = serde_json::from_value(json)?;
            catalog.insert(record);
        }
        _ => tracing::warn!(file = %file.display(), "ignoring non-record json"),
    }
    Ok(())
}
