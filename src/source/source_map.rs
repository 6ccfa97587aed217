//! # Precompiled Source Map
//!
//! The source map is the fast path of source lookup: a `name -> source text`
//! table computed ahead of time so production lookups never touch component
//! files.
//!
//! ## Data File
//!
//! ```json
//! {
//!   "generated_at": "2025-02-05T10:30:00Z",
//!   "components": {
//!     "Skeleton": "\"use client\";\n...",
//!     "SkeletonShowcase": "..."
//!   }
//! }
//! ```
//!
//! [`generate`] builds this file from the registry and the component
//! directories; [`JsonSourceMapFile`] loads it back.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::source::registry::RegistryEntry;
use crate::source::resolver::SourceResolver;

/// Default location of the generated data file, relative to the project root.
pub const DEFAULT_SOURCE_MAP_PATH: &str = "data/componentSourceMap.json";

/// In-memory `name -> source text` table.
pub type SourceMap = HashMap<String, String>;

/// Supplies the precompiled source map to a resolver.
///
/// Called at most once per resolver until [`SourceResolver::reset`].
pub trait SourceMapProvider: Send + Sync {
    fn load(&self) -> Result<SourceMap>;
}

impl<P: SourceMapProvider + ?Sized> SourceMapProvider for Box<P> {
    fn load(&self) -> Result<SourceMap> {
        (**self).load()
    }
}

/// Serialized form of the source map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMapFile {
    pub generated_at: DateTime<Utc>,
    /// Sorted so regenerated files diff cleanly
    pub components: BTreeMap<String, String>,
}

impl SourceMapFile {
    /// Load a source map data file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read source map: {}", path.display()))?;
        let file: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse source map: {}", path.display()))?;
        Ok(file)
    }

    /// Write the data file, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create source map directory: {}", parent.display())
            })?;
        }

        let contents =
            serde_json::to_string_pretty(self).context("Failed to serialize source map")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write source map: {}", path.display()))?;

        Ok(())
    }
}

/// Loads the source map from a generated JSON data file.
#[derive(Debug, Clone)]
pub struct JsonSourceMapFile {
    path: PathBuf,
}

impl JsonSourceMapFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SourceMapProvider for JsonSourceMapFile {
    fn load(&self) -> Result<SourceMap> {
        let file = SourceMapFile::load_from(&self.path)?;
        Ok(file.components.into_iter().collect())
    }
}

/// A source map that is already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSourceMap(pub SourceMap);

impl SourceMapProvider for StaticSourceMap {
    fn load(&self) -> Result<SourceMap> {
        Ok(self.0.clone())
    }
}

/// Build a fresh source map.
///
/// Every registry entry is resolved through the filesystem strategies and
/// stored under its display name. Every `.tsx` file below `component_roots`
/// is stored under its file stem (`components/vui/Skeleton.tsx` ->
/// `Skeleton`), unless an entry already claimed that key.
pub fn generate(
    resolver: &SourceResolver,
    entries: &[RegistryEntry],
    root: &Path,
    component_roots: &[String],
) -> SourceMapFile {
    let mut components = BTreeMap::new();

    for entry in entries {
        match resolver.resolve_from_filesystem(&entry.name) {
            Some(source) => {
                debug!(component = %entry.name, "Captured registry entry");
                components.insert(entry.name.clone(), source);
            }
            None => warn!(component = %entry.name, "No source found for registry entry"),
        }
    }

    for dir in component_roots {
        let dir_path = root.join(dir);
        if !dir_path.is_dir() {
            continue;
        }

        for entry in WalkDir::new(&dir_path)
            .into_iter()
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!(error = %err, "Failed to read directory entry");
                    None
                }
            })
        {
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("tsx") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if components.contains_key(stem) {
                continue;
            }

            match fs::read_to_string(path) {
                Ok(source) => {
                    components.insert(stem.to_string(), source);
                }
                Err(err) => warn!(path = %path.display(), error = %err, "Failed to read component"),
            }
        }
    }

    info!(count = components.len(), "Generated source map");

    SourceMapFile {
        generated_at: Utc::now(),
        components,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_to_load_from_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("map.json");

        let mut components = BTreeMap::new();
        components.insert("Skeleton".to_string(), "export function Skeleton() {}".to_string());
        let file = SourceMapFile {
            generated_at: Utc::now(),
            components,
        };

        file.save_to(&path).unwrap();
        let loaded = SourceMapFile::load_from(&path).unwrap();
        assert_eq!(loaded.components, file.components);
    }

    #[test]
    fn test_json_provider_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let provider = JsonSourceMapFile::new(temp_dir.path().join("missing.json"));
        assert!(provider.load().is_err());
    }

    #[test]
    fn test_json_provider_invalid_json_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("map.json");
        fs::write(&path, "{ not json").unwrap();

        let provider = JsonSourceMapFile::new(&path);
        assert!(provider.load().is_err());
    }

    #[test]
    fn test_json_provider_loads_components() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("map.json");
        fs::write(
            &path,
            r#"{"generated_at":"2025-02-05T10:30:00Z","components":{"Card":"card source"}}"#,
        )
        .unwrap();

        let map = JsonSourceMapFile::new(&path).load().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["Card"], "card source");
    }

    #[test]
    fn test_static_provider() {
        let mut map = SourceMap::new();
        map.insert("A".to_string(), "a".to_string());
        let provider = StaticSourceMap(map);
        assert_eq!(provider.load().unwrap()["A"], "a");
    }
}
