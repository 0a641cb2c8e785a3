#![forbid(unsafe_code)]
//! OPAF: a declarative, parametric markup for knitting patterns.
//!
//! [`Parser`] resolves a source pattern and its includes into a
//! [`PatternDocument`], [`Packager`] writes the self-contained packaged form,
//! and [`Compiler`] expands a packaged document with caller overrides into
//! the flat instruction tree a knitter follows.

pub mod compile;
pub mod document;
pub mod expression;
pub mod foundation;
pub mod markup;
pub mod package;
pub mod parser;

pub use compile::{CompileInput, Compiler};
pub use document::{ImageCodec, PatternDocument, ThumbnailCodec};
pub use foundation::{OpafError, OpafResult, Scope, Value};
pub use markup::{Element, Node, read_document, write_document};
pub use package::Packager;
pub use parser::{Parser, ParserOptions};

/// Split a comma separated `key=value` list into a map.
///
/// Keys and values are trimmed; entries without `=` are ignored.
pub fn parse_override_list(list: &str) -> std::collections::BTreeMap<String, String> {
    list.split(',')
        .filter_map(|item| item.split_once('='))
        .map(|(k, v)| (k.trim().to_owned(), v.trim().to_owned()))
        .filter(|(k, _)| !k.is_empty())
        .collect()
}
