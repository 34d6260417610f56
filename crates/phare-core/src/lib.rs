//! phare resolves fully-qualified PHP class names to the files that
//! define them, and builds classmap indexes by scanning source trees.
//!
//! Offline, [`ClassMapGenerator`] scans a sequence of candidate files
//! and persists a flat class → path map. Online, an application
//! registers one or more [`ClassLoader`] instances (populated from a
//! persisted map, from namespace rules, or both) and the host runtime
//! queries the process-wide [`registry`] whenever a referenced class is
//! not yet available.

pub mod classmap;
pub mod config;
pub mod error;
pub mod extract;
pub mod loader;
pub mod registry;
pub mod syntax;

pub use classmap::{ClassMap, ClassMapGenerator, DuplicateClass, ScanOutcome};
pub use config::{Config, DirSet};
pub use error::Error;
pub use loader::ClassLoader;
pub use registry::{LoadHook, LoaderRegistry};
pub use syntax::token::{Token, TokenKind};

/// File extension recognised as PHP source.
pub const SOURCE_EXTENSION: &str = "php";

/// Tokenizes source text and returns the fully-qualified names of the
/// classes, interfaces and traits it declares, in declaration order.
pub fn classes_in(source: &str) -> Vec<String> {
    let tokens = syntax::lexer::Lexer::new(source).tokenize();
    extract::declared_classes(tokens)
}
