//! Source resolution against the bundled demo project

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use vui_source::source::source_map::{self, SourceMapFile};
use vui_source::source::{
    placeholder_source, DiskFs, JsonSourceMapFile, ResolverOptions, SourceResolver,
    StaticSourceMap,
};

fn site_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("example/vui-site")
}

fn dev_resolver() -> SourceResolver {
    SourceResolver::new(
        DiskFs::new(site_root()),
        StaticSourceMap::default(),
        ResolverOptions::default(),
    )
}

#[test]
fn test_resolve_via_registry_path() {
    let source = dev_resolver().resolve("Skeleton");
    assert!(source.contains("A versatile skeleton loading component"));
}

#[test]
fn test_resolve_via_mixed_import() {
    let source = dev_resolver().resolve("Card");
    assert!(source.contains("forwardRef<HTMLDivElement, CardProps>"));
}

#[test]
fn test_resolve_via_multiline_destructured_import() {
    let source = dev_resolver().resolve("Blur Text");
    assert!(source.contains("export const BlurText: React.FC<BlurTextProps>"));
}

#[test]
fn test_resolve_via_directory_scan() {
    let source = dev_resolver().resolve("Badge");
    assert!(source.contains("export function Badge"));
}

#[test]
fn test_unknown_component_gets_placeholder() {
    let resolver = dev_resolver();
    let source = resolver.resolve("Ghost Writer");
    assert_eq!(source, placeholder_source("Ghost Writer"));
    assert!(source.contains("Ghost Writer"));
    assert!(source.contains("export default function GhostWriter()"));
}

#[test]
fn test_production_without_map_uses_placeholder() {
    let resolver = SourceResolver::new(
        DiskFs::new(site_root()),
        StaticSourceMap::default(),
        ResolverOptions::production(),
    );
    assert_eq!(resolver.resolve("Skeleton"), placeholder_source("Skeleton"));
    assert!(resolver.import_table().is_empty());
}

#[test]
fn test_registry_entries_of_demo_site() {
    let entries = dev_resolver().registry_entries();
    let names: Vec<(&str, &str)> = entries
        .iter()
        .map(|e| (e.category.as_str(), e.name.as_str()))
        .collect();
    assert_eq!(
        names,
        vec![
            ("Get Started", "Introduction"),
            ("Components", "Skeleton"),
            ("Components", "Card"),
            ("Text Animations", "Blur Text"),
            ("Backgrounds", "Space"),
            ("AI Components", "Ghost Writer"),
        ]
    );
    assert_eq!(entries[1].path.as_deref(), Some("components/vui/Skeleton.tsx"));
    assert_eq!(entries[2].path, None);
    assert_eq!(entries[2].theme.as_deref(), Some("CardTheme"));
}

#[test]
fn test_import_table_of_demo_site() {
    let table = dev_resolver().import_table();
    assert_eq!(
        table.get("SkeletonShowcase").map(String::as_str),
        Some("components/vui/Skeleton.tsx")
    );
    assert_eq!(
        table.get("CardTheme").map(String::as_str),
        Some("components/vui/Card.tsx")
    );
    assert_eq!(
        table.get("BlurTextTheme").map(String::as_str),
        Some("components/vui/text/BlurText.tsx")
    );
    assert_eq!(
        table.get("Introduction").map(String::as_str),
        Some("components/Introduction.tsx")
    );
}

#[test]
fn test_generated_map_serves_production_lookups() {
    let resolver = dev_resolver();
    let entries = resolver.registry_entries();
    let file = source_map::generate(
        &resolver,
        &entries,
        &site_root(),
        &resolver.options().search_dirs,
    );

    let keys: Vec<&str> = file.components.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["Badge", "Blur Text", "BlurText", "Card", "Introduction", "Skeleton", "Space"]
    );

    let temp_dir = TempDir::new().unwrap();
    let map_path = temp_dir.path().join("data/componentSourceMap.json");
    file.save_to(&map_path).unwrap();
    let reloaded = SourceMapFile::load_from(&map_path).unwrap();
    assert_eq!(reloaded.components, file.components);

    // An empty root proves no filesystem strategy runs in production
    let production = SourceResolver::new(
        DiskFs::new(temp_dir.path().join("missing")),
        JsonSourceMapFile::new(&map_path),
        ResolverOptions::production(),
    );
    assert!(production.resolve("Skeleton").contains("A versatile skeleton loading component"));
    assert!(production.resolve("Badge").contains("export function Badge"));
    assert_eq!(
        production.resolve("Ghost Writer"),
        placeholder_source("Ghost Writer")
    );
}
