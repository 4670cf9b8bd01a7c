//! Non-recursive discovery of data files in a home directory.

use crate::error::ConfigError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Supported file categories. Variants are declared in label order so the
/// serialized map keys come out sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FileCategory {
    #[serde(rename = "CSV Files")]
    Csv,
    #[serde(rename = "DuckDB Databases")]
    Database,
    #[serde(rename = "Excel Files")]
    Excel,
    #[serde(rename = "JSON Files")]
    Json,
    #[serde(rename = "Parquet Files")]
    Parquet,
}

impl FileCategory {
    /// Maps a file extension (without the dot, any case) to a category.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "db" | "duckdb" => Some(Self::Database),
            "csv" => Some(Self::Csv),
            "parquet" => Some(Self::Parquet),
            "json" => Some(Self::Json),
            "xlsx" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// Files found in a directory, grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FileCatalog {
    files: BTreeMap<FileCategory, Vec<String>>,
}

impl FileCatalog {
    pub fn get(&self, category: FileCategory) -> Option<&[String]> {
        self.files.get(&category).map(Vec::as_slice)
    }

    pub fn total(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn insert(&mut self, category: FileCategory, name: String) {
        self.files.entry(category).or_default().push(name);
    }

    fn sort(&mut self) {
        for names in self.files.values_mut() {
            names.sort();
        }
    }
}

/// Lists supported files directly inside `dir`. Subdirectories are not
/// descended into.
pub fn list_supported_files(dir: impl AsRef<Path>) -> io::Result<FileCatalog> {
    let dir = dir.as_ref();
    let mut catalog = FileCatalog::default();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        // Follows symlinks; dangling links are skipped.
        if !path.is_file() {
            continue;
        }
        let Some(category) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(FileCategory::from_extension)
        else {
            continue;
        };
        catalog.insert(category, entry.file_name().to_string_lossy().into_owned());
    }

    catalog.sort();
    debug!("Found {} supported files in {}", catalog.total(), dir.display());
    Ok(catalog)
}

/// Lists a configured home directory, reporting failures as configuration
/// errors.
pub fn catalog_home_dir(dir: &str) -> Result<FileCatalog, ConfigError> {
    list_supported_files(dir).map_err(|e| ConfigError::ListFiles(e.to_string()))
}
