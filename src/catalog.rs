//! # Component Catalog
//!
//! The showcase-facing API: everything the site needs about a component,
//! looked up by display name.
//!
//! | Method | Returns |
//! |--------|---------|
//! | [`Catalog::source`] | Source text or placeholder |
//! | [`Catalog::props_info`] | Extracted props, trying several symbol guesses |
//! | [`Catalog::default_props`] | Literal defaults of the main component |
//! | [`Catalog::usage_example`] | Usage snippet built from those defaults |

use std::sync::Arc;
use tracing::debug;

use crate::props::{extract_defaults, extract_props, ComponentPropsInfo, Defaults, ExtractOptions};
use crate::source::usage::{usage_example, DEFAULT_IMPORT_PREFIX};
use crate::source::utils::strip_whitespace;
use crate::source::SourceResolver;

/// Shared handle over a [`SourceResolver`] plus extraction settings.
#[derive(Debug, Clone)]
pub struct Catalog {
    resolver: Arc<SourceResolver>,
    extract_options: ExtractOptions,
    import_prefix: String,
}

impl Catalog {
    pub fn new(resolver: Arc<SourceResolver>) -> Self {
        Self {
            resolver,
            extract_options: ExtractOptions::default(),
            import_prefix: DEFAULT_IMPORT_PREFIX.to_string(),
        }
    }

    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract_options = options;
        self
    }

    pub fn with_import_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.import_prefix = prefix.into();
        self
    }

    pub fn resolver(&self) -> &Arc<SourceResolver> {
        &self.resolver
    }

    pub fn source(&self, name: &str) -> String {
        self.resolver.resolve(name)
    }

    /// Props of the component named `name`.
    ///
    /// Tries the symbol hints from [`symbol_hints`] in order and returns the
    /// first result that has at least one property.
    pub fn props_info(&self, name: &str) -> Option<ComponentPropsInfo> {
        let source = self.source(name);

        symbol_hints(name).into_iter().find_map(|hint| {
            let info = extract_props(&source, hint.as_deref(), &self.extract_options)?;
            if info.props.is_empty() {
                debug!(component = name, hint = ?hint, "Hint matched a component without props");
                return None;
            }
            Some(info)
        })
    }

    pub fn default_props(&self, name: &str) -> Defaults {
        extract_defaults(&self.source(name))
    }

    pub fn usage_example(&self, name: &str) -> String {
        usage_example(name, &self.default_props(name), &self.import_prefix)
    }
}

/// Symbol guesses for a display name: the name itself, the name without
/// whitespace, that plus `Component`, and finally no hint at all.
pub fn symbol_hints(name: &str) -> Vec<Option<String>> {
    let stripped = strip_whitespace(name);
    vec![
        Some(name.to_string()),
        Some(stripped.clone()),
        Some(format!("{}Component", stripped)),
        None,
    ]
}
