//! Person database loading
//!
//! Deserializes the JSON person files and the application config naming
//! them. The engine core only ever sees the resulting in-memory list.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::person::Person;

/// Errors reading or decoding input files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode `{path}`: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Application configuration: which database files to load, the optional
/// filter anchor and ego's sex. Field names match the JSON config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartConfig {
    /// Directory prefix for the database files.
    pub base_path: String,
    /// Database file names, without the `.json` extension.
    pub files: Vec<String>,
    /// Identifier restricting the chart to one person's line; empty for no
    /// filter.
    pub filter_identifier: String,
    /// Set to false if ego is a woman.
    pub ego_male: bool,
    pub author_name: String,
    pub author_location: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            base_path: "data/".to_string(),
            files: Vec::new(),
            filter_identifier: String::new(),
            ego_male: true,
            author_name: String::new(),
            author_location: String::new(),
        }
    }
}

impl ChartConfig {
    /// Reads the config from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| LoadError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Paths of the person database files this config names, in file order.
    pub fn data_files(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .map(|file| Path::new(&self.base_path).join(format!("{file}.json")))
            .collect()
    }
}

/// Decodes a person list from JSON text.
pub fn persons_from_json(json: &str) -> Result<Vec<Person>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads one person database file.
pub fn load_persons_file(path: &Path) -> Result<Vec<Person>, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads and concatenates every database file named by the config, in file
/// order.
pub fn load_persons(config: &ChartConfig) -> Result<Vec<Person>, LoadError> {
    let mut persons = Vec::new();
    for path in config.data_files() {
        let mut chunk = load_persons_file(&path)?;
        debug!(path = %path.display(), count = chunk.len(), "database file loaded");
        persons.append(&mut chunk);
    }
    Ok(persons)
}
