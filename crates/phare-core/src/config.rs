use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Error;

/// Loader configuration as consumed by `ClassLoader::add_config`.
/// All sections are optional; an empty or absent section is a no-op.
/// Entry order is preserved: it is the order prefixes are tried in.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Namespace prefix (backslash-separated) to base directory or
    /// directories.
    pub namespaces: IndexMap<String, DirSet>,
    /// Legacy underscore prefix to base directory or directories. The
    /// empty prefix designates fallback directories.
    pub prefixes: IndexMap<String, DirSet>,
    /// Exact class name to file path.
    pub class_map: IndexMap<String, String>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)
            .map_err(|source| Error::Read { path: path.to_path_buf(), source })?;
        serde_json::from_str(&text)
            .map_err(|source| Error::Config { path: path.to_path_buf(), source })
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty() && self.prefixes.is_empty() && self.class_map.is_empty()
    }
}

/// One base directory or several, in declaration order.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DirSet {
    One(String),
    Many(Vec<String>),
}

impl DirSet {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(dir) => std::slice::from_ref(dir),
            Self::Many(dirs) => dirs,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.as_slice().iter().map(String::as_str)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn single_directory() {
        let config: Config =
            serde_json::from_str(r#"{"namespaces": {"App\\": "src/app"}}"#).unwrap();
        let dirs: Vec<_> = config.namespaces["App\\"].iter().collect();
        assert_eq!(dirs, vec!["src/app"]);
    }

    #[test]
    fn directory_list() {
        let config: Config =
            serde_json::from_str(r#"{"prefixes": {"Legacy_": ["a", "b"]}}"#).unwrap();
        let dirs: Vec<_> = config.prefixes["Legacy_"].iter().collect();
        assert_eq!(dirs, vec!["a", "b"]);
    }

    #[test]
    fn class_map_key_is_camel_case() {
        let config: Config =
            serde_json::from_str(r#"{"classMap": {"App\\Special": "src/special.php"}}"#).unwrap();
        assert_eq!(config.class_map["App\\Special"], "src/special.php");
    }

    #[test]
    fn entry_order_preserved() {
        let config: Config =
            serde_json::from_str(r#"{"namespaces": {"B\\": "b", "A\\": "a", "C\\": "c"}}"#)
                .unwrap();
        let keys: Vec<_> = config.namespaces.keys().collect();
        assert_eq!(keys, vec!["B\\", "A\\", "C\\"]);
    }
}
