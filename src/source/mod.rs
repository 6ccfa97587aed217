//! # Source Module
//!
//! This module locates the source text of showcase components by display
//! name and renders usage snippets for them.
//!
//! ## Strategies
//!
//! | Order | Strategy | Implementation |
//! |-------|----------|----------------|
//! | 1 | Precompiled source map | [`source_map::SourceMapProvider`] |
//! | 2 | Registry `path:` field | [`registry::find_entry_path`] |
//! | 3 | Registry import table | [`registry::parse_imports`] |
//! | 4 | Directory scan | [`resolver::SourceResolver::find_component_file`] |
//! | 5 | Placeholder stub | [`resolver::placeholder_source`] |
//!

pub mod fs;
pub mod registry;
pub mod resolver;
pub mod source_map;
pub mod usage;
pub mod utils;

pub use fs::{DiskFs, SourceFs};
pub use registry::{ImportTable, RegistryEntry};
pub use resolver::{placeholder_source, ResolverOptions, SourceResolver};
pub use source_map::{JsonSourceMapFile, SourceMap, SourceMapProvider, StaticSourceMap};
pub use usage::usage_example;
