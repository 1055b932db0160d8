//! Secret store access.
//!
//! # Responsibilities
//! - Fetch all parameters directly under a hierarchical path
//! - JSON-decode values where possible, keep them as strings otherwise
//!
//! # Design Decisions
//! - `SecretStore` is the injection seam: tests plug in an in-memory map,
//!   deployments plug in whatever parameter service protects the secrets
//! - Fetches are non-recursive: only direct children of the path count

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// A keyed secret store holding gateway parameters under a path.
pub trait SecretStore: Send + Sync {
    /// Fetch every parameter directly under `path`, decrypted.
    fn fetch(&self, path: &str) -> Result<BTreeMap<String, String>, ConfigError>;
}

/// Directory-backed secret store: one file per parameter.
///
/// The hierarchical path maps onto a filesystem directory; the file name is
/// the parameter key and the file contents the value.
pub struct DirStore;

impl SecretStore for DirStore {
    fn fetch(&self, path: &str) -> Result<BTreeMap<String, String>, ConfigError> {
        let dir = Path::new(path);
        if !dir.is_dir() {
            return Err(ConfigError::PathNotFound(path.to_string()));
        }

        let mut params = BTreeMap::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let key = entry.file_name().to_string_lossy().into_owned();
            let raw = fs::read_to_string(entry.path())?;
            params.insert(key, decode_value(&raw));
        }
        Ok(params)
    }
}

/// In-memory secret store for tests and local runs.
#[derive(Default)]
pub struct MemoryStore {
    params: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new(params: BTreeMap<String, String>) -> Self {
        Self { params }
    }
}

impl SecretStore for MemoryStore {
    fn fetch(&self, _path: &str) -> Result<BTreeMap<String, String>, ConfigError> {
        Ok(self
            .params
            .iter()
            .map(|(k, v)| (k.clone(), decode_value(v)))
            .collect())
    }
}

/// Decode a raw parameter value.
///
/// JSON string literals are unwrapped; everything else is kept verbatim
/// (trimmed of surrounding whitespace).
fn decode_value(raw: &str) -> String {
    let trimmed = raw.trim();
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::String(inner)) => inner,
        _ => trimmed.to_string(),
    }
}
