// ==============================================================================
// cache.rs - Cross-Reference Dataset Cache
// ==============================================================================
// Description: Keyed auxiliary datasets consulted by the $include directive
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Formats:
//   TSV (one dataset per file, rows accumulate per key):
//     b0001    thrL leader peptide
//     b0001    operon thrLABC
//   JSON (any number of datasets):
//     { "operons": { "b0001": ["thrL", "thrA"] } }
// ==============================================================================

use csv::ReaderBuilder;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while loading or querying datasets
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid dataset row at line {line}: {details}")]
    InvalidRow { line: u64, details: String },

    #[error("Unknown dataset '{0}'")]
    UnknownDataset(String),
}

/// Keyed lookup of string expansions, grouped by dataset name
pub trait GlobalCache {
    /// All expansions recorded for `key` in `dataset`, in insertion order
    fn lookup(&self, dataset: &str, key: &str) -> Result<Vec<String>, CacheError>;
}

/// Cache with no datasets; every lookup fails
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl GlobalCache for NoCache {
    fn lookup(&self, dataset: &str, _key: &str) -> Result<Vec<String>, CacheError> {
        Err(CacheError::UnknownDataset(dataset.to_string()))
    }
}

/// In-memory datasets: dataset → key → values
#[derive(Debug, Clone, Default)]
pub struct DatasetCache {
    datasets: HashMap<String, HashMap<String, Vec<String>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `key` in `dataset`, creating either as needed
    pub fn insert(&mut self, dataset: &str, key: impl Into<String>, value: impl Into<String>) {
        self.datasets
            .entry(dataset.to_string())
            .or_default()
            .entry(key.into())
            .or_default()
            .push(value.into());
    }

    /// Register an empty dataset so lookups against it succeed
    pub fn add_dataset(&mut self, dataset: &str) {
        self.datasets.entry(dataset.to_string()).or_default();
    }

    pub fn contains_dataset(&self, dataset: &str) -> bool {
        self.datasets.contains_key(dataset)
    }

    /// Names of all loaded datasets, sorted
    pub fn dataset_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.datasets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Load a two-column tab-delimited file as dataset `name`
    ///
    /// # Format
    /// - Column 1: lookup key
    /// - Column 2: expansion value
    ///
    /// Lines starting with '#' are skipped. Repeated keys accumulate values.
    pub fn load_tsv(&mut self, name: &str, path: impl AsRef<Path>) -> Result<usize, CacheError> {
        let path = path.as_ref();
        info!("Loading dataset '{}' from {:?}", name, path);
        let file = std::fs::File::open(path)?;
        self.load_tsv_reader(name, file)
    }

    /// Load a two-column tab-delimited dataset from any reader
    pub fn load_tsv_reader<R: Read>(&mut self, name: &str, reader: R) -> Result<usize, CacheError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .quoting(false)
            .comment(Some(b'#'))
            .flexible(true)
            .from_reader(reader);

        self.add_dataset(name);
        let mut rows = 0;
        for result in reader.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line());

            if record.len() != 2 {
                return Err(CacheError::InvalidRow {
                    line,
                    details: format!("Expected 2 tab-delimited fields, found {}", record.len()),
                });
            }

            // $include trims the link value the same way
            self.insert(name, record[0].trim(), record[1].trim());
            rows += 1;
        }

        debug!("Dataset '{}': {} rows", name, rows);
        Ok(rows)
    }

    /// Load every dataset from a JSON document
    ///
    /// The document maps dataset names to objects of key → list of values.
    pub fn load_json(&mut self, path: impl AsRef<Path>) -> Result<usize, CacheError> {
        let path = path.as_ref();
        info!("Loading datasets from {:?}", path);
        let file = std::fs::File::open(path)?;
        self.load_json_reader(std::io::BufReader::new(file))
    }

    /// Load datasets from a JSON document read from any reader
    pub fn load_json_reader<R: Read>(&mut self, reader: R) -> Result<usize, CacheError> {
        let document: HashMap<String, HashMap<String, Vec<String>>> =
            serde_json::from_reader(reader)?;

        let count = document.len();
        for (dataset, entries) in document {
            let target = self.datasets.entry(dataset).or_default();
            for (key, values) in entries {
                target.entry(key).or_default().extend(values);
            }
        }

        debug!("Loaded {} datasets from JSON", count);
        Ok(count)
    }
}

impl GlobalCache for DatasetCache {
    fn lookup(&self, dataset: &str, key: &str) -> Result<Vec<String>, CacheError> {
        let entries = self
            .datasets
            .get(dataset)
            .ok_or_else(|| CacheError::UnknownDataset(dataset.to_string()))?;
        Ok(entries.get(key).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut cache = DatasetCache::new();
        cache.insert("operons", "b0001", "thrL");
        cache.insert("operons", "b0001", "thrA");

        assert_eq!(cache.lookup("operons", "b0001").unwrap(), vec!["thrL", "thrA"]);
        assert!(cache.lookup("operons", "b9999").unwrap().is_empty());
        assert!(matches!(
            cache.lookup("pathways", "b0001"),
            Err(CacheError::UnknownDataset(name)) if name == "pathways"
        ));
    }

    #[test]
    fn test_load_tsv() {
        let file = create_test_file("\
# key\tvalue
b0001\tthrL leader peptide
b0001\toperon thrLABC
b0002\tthrA
");
        let mut cache = DatasetCache::new();
        let rows = cache.load_tsv("notes", file.path()).unwrap();

        assert_eq!(rows, 3);
        assert_eq!(
            cache.lookup("notes", "b0001").unwrap(),
            vec!["thrL leader peptide", "operon thrLABC"]
        );
        assert_eq!(cache.dataset_names(), vec!["notes"]);
    }

    #[test]
    fn test_load_tsv_rejects_ragged_row() {
        let file = create_test_file("b0001\tthrL\textra\n");
        let mut cache = DatasetCache::new();

        match cache.load_tsv("notes", file.path()).unwrap_err() {
            CacheError::InvalidRow { line, .. } => assert_eq!(line, 1),
            other => panic!("Expected InvalidRow error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_tsv_still_registers_dataset() {
        let file = create_test_file("# nothing here\n");
        let mut cache = DatasetCache::new();
        cache.load_tsv("empty", file.path()).unwrap();

        assert!(cache.contains_dataset("empty"));
        assert!(cache.lookup("empty", "k").unwrap().is_empty());
    }

    #[test]
    fn test_load_json() {
        let json = r#"{ "operons": { "b0001": ["thrL", "thrA"] }, "go": { "b0002": [] } }"#;
        let mut cache = DatasetCache::new();
        let count = cache.load_json_reader(json.as_bytes()).unwrap();

        assert_eq!(count, 2);
        assert_eq!(cache.lookup("operons", "b0001").unwrap(), vec!["thrL", "thrA"]);
        assert!(cache.lookup("go", "b0002").unwrap().is_empty());
    }

    #[test]
    fn test_no_cache_fails() {
        assert!(NoCache.lookup("anything", "k").is_err());
    }
}
