//! # Registry Miner
//!
//! The registry file (`data/ComponentMapping.ts`) is the single declarative
//! catalog of the showcase site. It is read as plain text and mined with
//! regular expressions rather than parsed structurally.
//!
//! ## Format
//!
//! ```ts
//! import { SkeletonShowcase, SkeletonTheme } from "@/components/vui/Skeleton";
//! import SpaceShowcase from "@/components/vui/backgrounds/Space";
//!
//! export const componentMap: ComponentCategoryMap = {
//!   Components: [
//!     {
//!       name: "Skeleton",
//!       component: SkeletonShowcase,
//!       theme: SkeletonTheme,
//!       route: "/components/skeleton",
//!       path: "components/vui/Skeleton.tsx",
//!       description: "Loading placeholders",
//!     },
//!   ],
//! };
//! ```
//!
//! ## Key Functions
//!
//! - [`find_entry_path`] - `path:` of the entry with a given `name:`
//! - [`find_component_symbol`] - `component:` identifier of that entry
//! - [`parse_imports`] - symbol → file path side-table from import statements
//! - [`parse_entries`] - every entry block with its category

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Symbol → relative source path, derived from the registry's imports.
pub type ImportTable = HashMap<String, String>;

/// Default location of the registry file, relative to the project root.
pub const DEFAULT_REGISTRY_PATH: &str = "data/ComponentMapping.ts";

/// One `{ name: ..., component: ..., ... }` block of the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub category: String,
    pub name: String,
    pub component: Option<String>,
    pub theme: Option<String>,
    pub route: Option<String>,
    pub path: Option<String>,
    pub description: Option<String>,
}

/// Find the `path:` declared next to `name: "<name>"`.
///
/// Both fields must live in the same `{ ... }` block and `name` must come
/// first. Entries with `path: undefined` yield `None`.
pub fn find_entry_path(content: &str, name: &str) -> Result<Option<String>> {
    let pattern = format!(
        r#"name:\s*["']{}["'][^}}]*path:\s*["']([^"']+)["']"#,
        regex::escape(name)
    );
    let path_re = Regex::new(&pattern).context("Failed to compile registry path regex")?;

    Ok(path_re
        .captures(content)
        .map(|cap| cap[1].to_string()))
}

/// Find the identifier bound to `component:` for the entry named `name`.
///
/// The name comparison is case-insensitive.
pub fn find_component_symbol(content: &str, name: &str) -> Result<Option<String>> {
    let pattern = format!(
        r#"name:\s*["']{}["'][^}}]*component:\s*(\w+)"#,
        regex::escape(name)
    );
    let component_re = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .context("Failed to compile registry component regex")?;

    Ok(component_re
        .captures(content)
        .map(|cap| cap[1].to_string()))
}

/// Build the import side-table from the registry's `@/` imports.
///
/// Handles three forms:
/// - `import Foo from "@/a/b"` maps `Foo -> a/b.tsx`
/// - `import { Bar, Baz as Qux } from "@/c/d"` maps `Bar` and `Qux -> c/d.tsx`
/// - `import Foo, { Bar } from "@/e"` maps both `Foo` and `Bar -> e.tsx`
///
/// Later statements win when a symbol is imported twice.
pub fn parse_imports(content: &str) -> Result<ImportTable> {
    let default_re = Regex::new(r#"import\s+(\w+)\s+from\s+["'](@/[^"']+)["']"#)
        .context("Failed to compile default import regex")?;
    let mixed_re =
        Regex::new(r#"import\s+(\w+)\s*,\s*\{\s*([^}]+)\s*\}\s*from\s+["'](@/[^"']+)["']"#)
            .context("Failed to compile mixed import regex")?;
    let destructured_re = Regex::new(r#"import\s+\{\s*([^}]+)\s*\}\s*from\s+["'](@/[^"']+)["']"#)
        .context("Failed to compile destructured import regex")?;

    let mut imports = ImportTable::new();

    for cap in default_re.captures_iter(content) {
        imports.insert(cap[1].to_string(), import_to_file_path(&cap[2]));
    }

    for cap in mixed_re.captures_iter(content) {
        let file_path = import_to_file_path(&cap[3]);
        imports.insert(cap[1].to_string(), file_path.clone());
        for binding in import_bindings(&cap[2]) {
            imports.insert(binding, file_path.clone());
        }
    }

    for cap in destructured_re.captures_iter(content) {
        let file_path = import_to_file_path(&cap[2]);
        for binding in import_bindings(&cap[1]) {
            imports.insert(binding, file_path.clone());
        }
    }

    Ok(imports)
}

/// Parse every entry block of the registry, in file order.
///
/// The category of an entry is the nearest preceding `"Category": [` key.
/// Blocks without a quoted `name:` field (type declarations, for example)
/// are skipped.
pub fn parse_entries(content: &str) -> Result<Vec<RegistryEntry>> {
    let category_re = Regex::new(r#"(?m)^\s*(?:"([^"]+)"|'([^']+)'|(\w+))\s*:\s*\["#)
        .context("Failed to compile category regex")?;
    let block_re = Regex::new(r"\{([^{}]*)\}").context("Failed to compile entry block regex")?;
    let name_re = Regex::new(r#"\bname:\s*["']([^"']+)["']"#)
        .context("Failed to compile entry name regex")?;
    let component_re =
        Regex::new(r"\bcomponent:\s*(\w+)").context("Failed to compile component regex")?;
    let theme_re = Regex::new(r"\btheme:\s*(\w+)").context("Failed to compile theme regex")?;
    let route_re = Regex::new(r#"\broute:\s*["']([^"']+)["']"#)
        .context("Failed to compile route regex")?;
    let path_re =
        Regex::new(r#"\bpath:\s*["']([^"']+)["']"#).context("Failed to compile path regex")?;
    let desc_re = Regex::new(r#"\bdescription:\s*(?:"((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)')"#)
        .context("Failed to compile description regex")?;

    let categories: Vec<(usize, String)> = category_re
        .captures_iter(content)
        .filter_map(|cap| {
            let start = cap.get(0)?.start();
            let name = cap.get(1).or_else(|| cap.get(2)).or_else(|| cap.get(3))?;
            Some((start, name.as_str().to_string()))
        })
        .collect();

    let mut entries = Vec::new();

    for cap in block_re.captures_iter(content) {
        let Some(block) = cap.get(1) else {
            continue;
        };
        let body = block.as_str();

        let Some(name_cap) = name_re.captures(body) else {
            continue;
        };

        let category = categories
            .iter()
            .take_while(|(offset, _)| *offset < block.start())
            .last()
            .map(|(_, name)| name.clone())
            .unwrap_or_default();

        let capture = |re: &Regex| re.captures(body).map(|c| c[1].to_string());

        let description = desc_re.captures(body).and_then(|c| {
            c.get(1)
                .or_else(|| c.get(2))
                .map(|m| m.as_str().to_string())
        });

        entries.push(RegistryEntry {
            category,
            name: name_cap[1].to_string(),
            component: capture(&component_re),
            theme: capture(&theme_re),
            route: capture(&route_re),
            path: capture(&path_re),
            description,
        });
    }

    Ok(entries)
}

/// `@/components/vui/Skeleton` -> `components/vui/Skeleton.tsx`
fn import_to_file_path(import_path: &str) -> String {
    let relative = import_path.strip_prefix("@/").unwrap_or(import_path);
    format!("{}.tsx", relative)
}

/// Local binding names of a `{ A, type B, C as D }` import clause.
fn import_bindings(clause: &str) -> Vec<String> {
    clause
        .split(',')
        .map(str::trim)
        .filter(|binding| !binding.is_empty())
        .map(|binding| binding.strip_prefix("type ").unwrap_or(binding).trim())
        .map(|binding| match binding.split_once(" as ") {
            Some((_, alias)) => alias.trim().to_string(),
            None => binding.to_string(),
        })
        .collect()
}
