//! vui-source - Component source resolution and prop extraction for the VUI showcase
//!
//! This library locates the source text of showcase components by display
//! name and statically extracts their props (names, types, defaults,
//! examples) without executing anything.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod props;
pub mod source;

pub use catalog::Catalog;
pub use config::{Config, ExecutionMode};
