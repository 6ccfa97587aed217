//! # Props Module
//!
//! Static extraction of component properties from TSX source text. Nothing is
//! executed or type-checked; the source is tokenized and the top-level
//! declarations are read structurally.
//!
//! ## Pipeline
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Tokenize | [`lexer`] | `Vec<Token>`, JSDoc attached to tokens |
//! | Declarations | [`parser`] | [`parser::Module`] with interfaces, aliases, components |
//! | Literals | [`literal`] | `serde_json::Value` for default expressions |
//! | Descriptors | [`extract`] | [`ComponentPropsInfo`], [`Defaults`] |
//!
//! ## Key Types
//!
//! - [`ExtractOptions`]: private-prop filtering, examples, union expansion, depth
//! - [`PropertyDescriptor`]: one property with type text, optionality and values
//! - [`Defaults`]: ordered map of literal defaults used by the usage synthesizer

pub mod extract;
pub mod lexer;
pub mod literal;
pub mod parser;

pub use extract::{
    extract_defaults, extract_props, ComponentPropsInfo, Defaults, ExtractOptions,
    PropertyDescriptor,
};
