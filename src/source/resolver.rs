//! # Source Resolver
//!
//! Maps a component's display name to its source text.
//!
//! ## Lookup Order
//!
//! The first strategy that produces text wins:
//!
//! 1. Exact key match in the precompiled [`SourceMap`]
//! 2. The registry entry's `path:` field, read from disk
//! 3. The registry import side-table, keyed by the entry's `component:` symbol
//!    (or the display name with whitespace removed)
//! 4. A scan of the candidate directories for `<Symbol>.tsx`, `<Symbol>.ts`,
//!    `<Symbol>/index.tsx` or `<Symbol>/index.ts`
//! 5. A placeholder component that displays the requested name
//!
//! Strategies 2-4 only run when the resolver was built with
//! `allow_filesystem_fallback`. Filesystem errors are logged and treated as a
//! miss for that strategy; [`SourceResolver::resolve`] never fails.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, error, info, warn};

use crate::source::fs::SourceFs;
use crate::source::registry::{self, ImportTable, RegistryEntry, DEFAULT_REGISTRY_PATH};
use crate::source::source_map::{SourceMap, SourceMapProvider};
use crate::source::utils::{strip_whitespace, symbol_for_display_name};

/// Directories searched by the last filesystem strategy, relative to the root
pub const DEFAULT_SEARCH_DIRS: &[&str] = &[
    "components",
    "components/vui",
    "components/ui",
    "components/vui/text",
    "components/vui/buttons",
    "components/vui/backgrounds",
    "components/vui/ai",
];

/// Construction-time settings of a [`SourceResolver`].
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Registry file, relative to the filesystem root
    pub registry_path: PathBuf,
    /// Candidate directories for the directory scan, in search order
    pub search_dirs: Vec<String>,
    /// Enables strategies 2-4. Off in production.
    pub allow_filesystem_fallback: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            registry_path: PathBuf::from(DEFAULT_REGISTRY_PATH),
            search_dirs: DEFAULT_SEARCH_DIRS.iter().map(|d| d.to_string()).collect(),
            allow_filesystem_fallback: true,
        }
    }
}

impl ResolverOptions {
    /// Options for packaged builds: source map only.
    pub fn production() -> Self {
        Self {
            allow_filesystem_fallback: false,
            ..Default::default()
        }
    }
}

/// Resolves component source text by display name.
pub struct SourceResolver {
    fs: Box<dyn SourceFs>,
    provider: Box<dyn SourceMapProvider>,
    options: ResolverOptions,
    /// Filled on first access; concurrent initializers compute the same map
    source_map: OnceLock<SourceMap>,
}

impl std::fmt::Debug for SourceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceResolver")
            .field("options", &self.options)
            .field("source_map_loaded", &self.source_map.get().is_some())
            .finish_non_exhaustive()
    }
}

impl SourceResolver {
    pub fn new(
        fs: impl SourceFs + 'static,
        provider: impl SourceMapProvider + 'static,
        options: ResolverOptions,
    ) -> Self {
        Self {
            fs: Box::new(fs),
            provider: Box::new(provider),
            options,
            source_map: OnceLock::new(),
        }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// The precompiled source map, loaded on first access.
    ///
    /// A provider failure is logged and leaves an empty map in the cache.
    pub fn source_map(&self) -> &SourceMap {
        self.source_map.get_or_init(|| match self.provider.load() {
            Ok(map) => {
                info!(count = map.len(), "Loaded precompiled source map");
                map
            }
            Err(err) => {
                error!(error = ?err, "Failed to load precompiled source map");
                SourceMap::new()
            }
        })
    }

    /// Drop the cached source map so the next lookup reloads it.
    pub fn reset(&mut self) {
        self.source_map.take();
    }

    /// Return the source text for `name`, or a placeholder if none exists.
    pub fn resolve(&self, name: &str) -> String {
        if let Some(source) = self.source_map().get(name) {
            debug!(component = name, "Found in precompiled source map");
            return source.clone();
        }

        if self.options.allow_filesystem_fallback {
            debug!(component = name, "Not in source map, trying filesystem fallback");
            if let Some(source) = self.resolve_from_filesystem(name) {
                return source;
            }
        }

        let mode = if self.options.allow_filesystem_fallback {
            "development"
        } else {
            "production"
        };
        warn!(component = name, mode, "Component source not found");
        placeholder_source(name)
    }

    /// Run the filesystem strategies (registry path, import table, directory
    /// scan) regardless of `allow_filesystem_fallback`.
    pub fn resolve_from_filesystem(&self, name: &str) -> Option<String> {
        let registry = self.read_registry();

        if let Some(content) = registry.as_deref() {
            if let Some(source) = self.read_registry_path(content, name) {
                return Some(source);
            }
        }

        let symbol = registry
            .as_deref()
            .and_then(|content| component_symbol(content, name))
            .unwrap_or_else(|| strip_whitespace(name));

        let imports = registry
            .as_deref()
            .map(build_import_table)
            .unwrap_or_default();

        if let Some(file_path) = imports.get(&symbol) {
            match self.fs.read_to_string(Path::new(file_path)) {
                Ok(source) => {
                    debug!(component = name, symbol = %symbol, path = %file_path, "Found via registry import");
                    return Some(source);
                }
                Err(err) => {
                    warn!(path = %file_path, error = %err, "Failed to read imported component");
                }
            }
        }

        self.find_component_file(&symbol).map(|(path, source)| {
            debug!(component = name, path = %path.display(), "Found via directory scan");
            source
        })
    }

    /// Symbol -> file path table from the registry's imports.
    ///
    /// Rebuilt on every call. Empty when filesystem access is disabled or the
    /// registry cannot be read.
    pub fn import_table(&self) -> ImportTable {
        if !self.options.allow_filesystem_fallback {
            return ImportTable::new();
        }
        self.read_registry()
            .as_deref()
            .map(build_import_table)
            .unwrap_or_default()
    }

    /// Every entry of the registry file, or an empty list if it cannot be read.
    ///
    /// Like [`Self::resolve_from_filesystem`], this reads the registry
    /// regardless of `allow_filesystem_fallback`: it backs the `list`, `check`
    /// and `build-map` tooling, never [`Self::resolve`].
    pub fn registry_entries(&self) -> Vec<RegistryEntry> {
        let Some(content) = self.read_registry() else {
            return Vec::new();
        };
        registry::parse_entries(&content).unwrap_or_else(|err| {
            error!(error = ?err, "Failed to parse registry entries");
            Vec::new()
        })
    }

    /// Search the candidate directories for a file defining `symbol`.
    ///
    /// Returns the relative path of the first readable match and its text.
    pub fn find_component_file(&self, symbol: &str) -> Option<(PathBuf, String)> {
        let candidates = [
            format!("{}.tsx", symbol),
            format!("{}.ts", symbol),
            format!("{}/index.tsx", symbol),
            format!("{}/index.ts", symbol),
        ];

        for dir in &self.options.search_dirs {
            let listing = match self.fs.list_dir(Path::new(dir)) {
                Ok(listing) => listing,
                Err(err) => {
                    debug!(dir = %dir, error = %err, "Skipping search directory");
                    continue;
                }
            };

            for candidate in &candidates {
                let first_segment = candidate.split('/').next().unwrap_or(candidate);
                if !listing.iter().any(|entry| entry == first_segment) {
                    continue;
                }

                let file_path = Path::new(dir).join(candidate);
                match self.fs.read_to_string(&file_path) {
                    Ok(source) => return Some((file_path, source)),
                    Err(err) => {
                        debug!(path = %file_path.display(), error = %err, "Candidate not readable");
                    }
                }
            }
        }

        None
    }

    fn read_registry(&self) -> Option<String> {
        match self.fs.read_to_string(&self.options.registry_path) {
            Ok(content) => Some(content),
            Err(err) => {
                error!(
                    path = %self.options.registry_path.display(),
                    error = %err,
                    "Failed to read component registry"
                );
                None
            }
        }
    }

    fn read_registry_path(&self, content: &str, name: &str) -> Option<String> {
        let file_path = match registry::find_entry_path(content, name) {
            Ok(Some(path)) => path,
            Ok(None) => return None,
            Err(err) => {
                error!(error = ?err, "Failed to search registry for path");
                return None;
            }
        };

        match self.fs.read_to_string(Path::new(&file_path)) {
            Ok(source) => {
                debug!(component = name, path = %file_path, "Found via registry path");
                Some(source)
            }
            Err(err) => {
                warn!(path = %file_path, error = %err, "Failed to read registry path");
                None
            }
        }
    }
}

fn component_symbol(content: &str, name: &str) -> Option<String> {
    registry::find_component_symbol(content, name).unwrap_or_else(|err| {
        error!(error = ?err, "Failed to search registry for component");
        None
    })
}

fn build_import_table(content: &str) -> ImportTable {
    registry::parse_imports(content).unwrap_or_else(|err| {
        error!(error = ?err, "Failed to parse registry imports");
        ImportTable::new()
    })
}

/// Stand-in source shown when no real source can be located.
///
/// Deterministic: the same name always yields the same text.
pub fn placeholder_source(name: &str) -> String {
    let symbol = symbol_for_display_name(name);
    format!(
        r#"// Component source not found for "{name}"
import React from 'react';
export default function {symbol}() {{
  return (
    <div className="p-8 text-center border-2 border-dashed border-orange-300 bg-orange-50 rounded-lg">
      <h2 className="text-2xl font-bold mb-4 text-orange-600">{name}</h2>
      <p className="text-orange-500">Component source not available</p>
    </div>
  );
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::source_map::StaticSourceMap;
    use std::collections::HashMap;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// In-memory filesystem: a map of relative path -> contents
    #[derive(Default)]
    struct MemoryFs {
        files: HashMap<PathBuf, String>,
    }

    impl MemoryFs {
        fn with(mut self, path: &str, contents: &str) -> Self {
            self.files.insert(PathBuf::from(path), contents.to_string());
            self
        }
    }

    impl SourceFs for MemoryFs {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "not found"))
        }

        fn list_dir(&self, path: &Path) -> io::Result<Vec<String>> {
            let mut names: Vec<String> = self
                .files
                .keys()
                .filter_map(|file| file.strip_prefix(path).ok())
                .filter_map(|rest| rest.components().next())
                .filter_map(|c| c.as_os_str().to_str().map(str::to_string))
                .collect();
            if names.is_empty() {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no such directory"));
            }
            names.sort();
            names.dedup();
            Ok(names)
        }
    }

    /// Fails the test on any filesystem access
    struct PanickingFs;

    impl SourceFs for PanickingFs {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            panic!("unexpected read of {}", path.display());
        }

        fn list_dir(&self, path: &Path) -> io::Result<Vec<String>> {
            panic!("unexpected listing of {}", path.display());
        }
    }

    struct CountingProvider {
        loads: Arc<AtomicUsize>,
        map: SourceMap,
    }

    impl SourceMapProvider for CountingProvider {
        fn load(&self) -> anyhow::Result<SourceMap> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(self.map.clone())
        }
    }

    struct FailingProvider;

    impl SourceMapProvider for FailingProvider {
        fn load(&self) -> anyhow::Result<SourceMap> {
            anyhow::bail!("source map module missing")
        }
    }

    fn source_map(entries: &[(&str, &str)]) -> StaticSourceMap {
        StaticSourceMap(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    const REGISTRY: &str = r#"import { SkeletonShowcase } from "@/components/vui/Skeleton";
import SpaceShowcase from "@/components/vui/backgrounds/Space";

export const componentMap = {
  Components: [
    {
      name: "Card",
      component: CardShowcase,
      path: "components/vui/Card.tsx",
    },
    {
      name: "Skeleton",
      component: SkeletonShowcase,
      path: undefined,
    },
    {
      name: "Space",
      component: SpaceShowcase,
      path: undefined,
    },
  ],
};
"#;

    #[test]
    fn test_resolve_source_map_hit_in_both_modes() {
        for options in [ResolverOptions::default(), ResolverOptions::production()] {
            let resolver = SourceResolver::new(
                MemoryFs::default(),
                source_map(&[("Skeleton", "skeleton source")]),
                options,
            );
            assert_eq!(resolver.resolve("Skeleton"), "skeleton source");
        }
    }

    #[test]
    fn test_resolve_production_never_touches_filesystem() {
        let resolver = SourceResolver::new(
            PanickingFs,
            source_map(&[("Card", "card source")]),
            ResolverOptions::production(),
        );

        assert_eq!(resolver.resolve("Card"), "card source");

        let missing = resolver.resolve("Tunnel");
        assert!(missing.contains("Tunnel"));
        assert!(missing.contains("Component source not available"));
        assert!(resolver.import_table().is_empty());
    }

    #[test]
    fn test_resolve_via_registry_path() {
        let fs = MemoryFs::default()
            .with("data/ComponentMapping.ts", REGISTRY)
            .with("components/vui/Card.tsx", "card from path");
        let resolver = SourceResolver::new(fs, StaticSourceMap::default(), ResolverOptions::default());

        assert_eq!(resolver.resolve("Card"), "card from path");
    }

    #[test]
    fn test_resolve_via_import_table() {
        let fs = MemoryFs::default()
            .with("data/ComponentMapping.ts", REGISTRY)
            .with("components/vui/backgrounds/Space.tsx", "space source");
        let resolver = SourceResolver::new(fs, StaticSourceMap::default(), ResolverOptions::default());

        assert_eq!(resolver.resolve("Space"), "space source");
    }

    #[test]
    fn test_resolve_via_directory_scan() {
        // Symbol "Skeleton" has no import record; only the directory scan finds it.
        let registry = r#"export const componentMap = { Components: [ { name: "Skeleton", path: undefined } ] };"#;
        let fs = MemoryFs::default()
            .with("data/ComponentMapping.ts", registry)
            .with("components/vui/Skeleton.tsx", "skeleton source");
        let resolver = SourceResolver::new(fs, StaticSourceMap::default(), ResolverOptions::default());

        assert_eq!(resolver.resolve("Skeleton"), "skeleton source");
    }

    #[test]
    fn test_resolve_directory_scan_without_registry() {
        let fs = MemoryFs::default().with("components/ui/Story/index.tsx", "story source");
        let resolver = SourceResolver::new(fs, StaticSourceMap::default(), ResolverOptions::default());

        assert_eq!(resolver.resolve("Story"), "story source");
    }

    #[test]
    fn test_resolve_strips_whitespace_for_symbol() {
        let fs = MemoryFs::default().with("components/vui/text/BlurText.tsx", "blur source");
        let resolver = SourceResolver::new(fs, StaticSourceMap::default(), ResolverOptions::default());

        assert_eq!(resolver.resolve("Blur Text"), "blur source");
    }

    #[test]
    fn test_resolve_unreadable_import_falls_back_to_scan() {
        let registry = r#"import Skeleton from "@/components/legacy/Skeleton";"#;
        let fs = MemoryFs::default()
            .with("data/ComponentMapping.ts", registry)
            .with("components/vui/Skeleton.tsx", "scanned source");
        let resolver = SourceResolver::new(fs, StaticSourceMap::default(), ResolverOptions::default());

        assert_eq!(resolver.resolve("Skeleton"), "scanned source");
    }

    #[test]
    fn test_resolve_unknown_name_returns_placeholder() {
        let fs = MemoryFs::default().with("data/ComponentMapping.ts", REGISTRY);
        let resolver = SourceResolver::new(fs, StaticSourceMap::default(), ResolverOptions::default());

        let source = resolver.resolve("Wavy Tiles");
        assert_eq!(source, placeholder_source("Wavy Tiles"));
        assert!(source.contains("\"Wavy Tiles\""));
        assert!(source.contains("export default function WavyTiles()"));
    }

    #[test]
    fn test_source_map_loaded_once_until_reset() {
        let loads = Arc::new(AtomicUsize::new(0));
        let provider = CountingProvider {
            loads: Arc::clone(&loads),
            map: source_map(&[("Card", "card")]).0,
        };
        let mut resolver =
            SourceResolver::new(PanickingFs, provider, ResolverOptions::production());

        resolver.resolve("Card");
        resolver.resolve("Card");
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        resolver.reset();
        resolver.resolve("Card");
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failing_provider_yields_empty_map() {
        let resolver =
            SourceResolver::new(PanickingFs, FailingProvider, ResolverOptions::production());

        assert!(resolver.source_map().is_empty());
        assert!(resolver.resolve("Card").contains("Card"));
    }

    #[test]
    fn test_registry_entries() {
        let fs = MemoryFs::default().with("data/ComponentMapping.ts", REGISTRY);
        let resolver = SourceResolver::new(fs, StaticSourceMap::default(), ResolverOptions::default());

        let names: Vec<_> = resolver
            .registry_entries()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Card", "Skeleton", "Space"]);
    }

    #[test]
    fn test_registry_entries_ignore_mode_but_resolve_does_not() {
        let fs = MemoryFs::default()
            .with("data/ComponentMapping.ts", REGISTRY)
            .with("components/vui/Card.tsx", "card from path");
        let resolver = SourceResolver::new(fs, StaticSourceMap::default(), ResolverOptions::production());

        assert_eq!(resolver.registry_entries().len(), 3);
        assert_eq!(resolver.resolve("Card"), placeholder_source("Card"));
        assert_eq!(resolver.resolve_from_filesystem("Card").as_deref(), Some("card from path"));
    }

    #[test]
    fn test_placeholder_is_deterministic() {
        assert_eq!(placeholder_source("Card"), placeholder_source("Card"));
        assert!(placeholder_source("3D Globe").contains("function Component3DGlobe()"));
    }
}
