//! A resolver instance: four lookup tables that turn fully-qualified
//! class names into file paths.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use crate::classmap::ClassMap;
use crate::config::Config;
use crate::error::Error;

/// Owns four tables consulted in fixed precedence:
///
/// 1. `class_map`: exact class name to file path;
/// 2. `namespaces`: namespace prefix to base directory, remainder
///    mapped `\` to `/` plus the source extension;
/// 3. `prefixes`: legacy underscore prefix to base directory,
///    remainder mapped `_` to `/`;
/// 4. `fallback_dirs`: tried with the entire class name.
///
/// Prefix entries are tried in the order they were added; a lexical
/// match whose derived file does not exist falls through to the next
/// candidate rather than ending the search.
#[derive(Debug, Default)]
pub struct ClassLoader {
    class_map: HashMap<String, PathBuf>,
    namespaces: Vec<(String, PathBuf)>,
    prefixes: Vec<(String, PathBuf)>,
    fallback_dirs: Vec<PathBuf>,
}

impl ClassLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        let mut loader = Self::new();
        loader.add_config(config);
        loader
    }

    pub fn from_config_file(path: &Path) -> Result<Self, Error> {
        let mut loader = Self::new();
        loader.include_config_file(path)?;
        Ok(loader)
    }

    // ─── Table population ────────────────────────────────────────────────────

    /// Adds a base directory for a namespace prefix. The prefix is
    /// stored with exactly one trailing separator.
    pub fn add_namespace(&mut self, namespace: &str, base_dir: impl Into<PathBuf>) {
        let mut prefix = namespace.trim_matches('\\').to_owned();
        prefix.push('\\');
        self.namespaces.push((prefix, normalize_dir(base_dir.into())));
    }

    /// Adds an exact class name to file path override.
    pub fn add_class_map_entry(&mut self, class: &str, path: impl Into<PathBuf>) {
        self.class_map.insert(class.trim_start_matches('\\').to_owned(), path.into());
    }

    /// Adds every entry of a generated class map.
    pub fn add_class_map(&mut self, map: &ClassMap) {
        for (class, path) in map.iter() {
            self.add_class_map_entry(class, path);
        }
    }

    /// Adds a base directory for a legacy underscore prefix. The empty
    /// prefix designates a fallback directory.
    pub fn add_prefix(&mut self, prefix: &str, base_dir: impl Into<PathBuf>) {
        let prefix = prefix.trim_start_matches('\\');
        let dir = normalize_dir(base_dir.into());
        if prefix.is_empty() {
            self.fallback_dirs.push(dir);
        } else {
            self.prefixes.push((prefix.to_owned(), dir));
        }
    }

    pub fn add_config(&mut self, config: &Config) {
        for (namespace, dirs) in &config.namespaces {
            for dir in dirs.iter() {
                self.add_namespace(namespace, dir);
            }
        }
        for (prefix, dirs) in &config.prefixes {
            for dir in dirs.iter() {
                self.add_prefix(prefix, dir);
            }
        }
        for (class, path) in &config.class_map {
            self.add_class_map_entry(class, path);
        }
    }

    /// A missing file is a no-op, not an error.
    pub fn include_config_file(&mut self, path: &Path) -> Result<(), Error> {
        if !path.is_file() {
            return Ok(());
        }
        let config = Config::from_file(path)?;
        self.add_config(&config);
        Ok(())
    }

    pub fn include_config_files<'a>(
        &mut self,
        paths: impl IntoIterator<Item = &'a Path>,
    ) -> Result<(), Error> {
        for path in paths {
            self.include_config_file(path)?;
        }
        Ok(())
    }

    // ─── Resolution ──────────────────────────────────────────────────────────

    /// Resolves a class name against this loader's tables. Returns the
    /// first derived path that exists on the filesystem.
    pub fn find_file(&self, class: &str) -> Option<PathBuf> {
        let class = class.trim_start_matches('\\');

        if let Some(path) = self.class_map.get(class) {
            if path.is_file() {
                return Some(path.clone());
            }
        }

        for (namespace, base_dir) in &self.namespaces {
            if let Some(rest) = class.strip_prefix(namespace.as_str()) {
                let file = base_dir.join(relative_file(rest, '\\'));
                if file.is_file() {
                    return Some(file);
                }
            }
        }

        for (prefix, base_dir) in &self.prefixes {
            if let Some(rest) = class.strip_prefix(prefix.as_str()) {
                let file = base_dir.join(relative_file(rest, '_'));
                if file.is_file() {
                    return Some(file);
                }
            }
        }

        for base_dir in &self.fallback_dirs {
            let file = base_dir.join(relative_file(class, '_'));
            if file.is_file() {
                return Some(file);
            }
        }

        None
    }
}

/// Maps a class name remainder to a relative file path by replacing the
/// given separator with the path separator and appending the source
/// extension.
fn relative_file(class: &str, separator: char) -> String {
    let mut relative = class.replace(separator, "/");
    relative.push('.');
    relative.push_str(crate::SOURCE_EXTENSION);
    relative
}

/// Trims trailing separators from a configured base directory.
fn normalize_dir(dir: PathBuf) -> PathBuf {
    let text = dir.to_string_lossy();
    let trimmed = text.trim_end_matches('/');
    if trimmed.is_empty() || trimmed.len() == text.len() {
        dir
    } else {
        PathBuf::from(trimmed)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_file_namespace_separator() {
        assert_eq!(relative_file("Models\\User", '\\'), "Models/User.php");
    }

    #[test]
    fn relative_file_underscore_separator() {
        assert_eq!(relative_file("Foo_Bar", '_'), "Foo/Bar.php");
    }

    #[test]
    fn normalize_dir_trims_trailing_slashes() {
        assert_eq!(normalize_dir(PathBuf::from("/src/app//")), PathBuf::from("/src/app"));
        assert_eq!(normalize_dir(PathBuf::from("/src/app")), PathBuf::from("/src/app"));
        assert_eq!(normalize_dir(PathBuf::from("/")), PathBuf::from("/"));
    }

    #[test]
    fn empty_prefix_becomes_fallback() {
        let mut loader = ClassLoader::new();
        loader.add_prefix("", "/somewhere");
        assert!(loader.prefixes.is_empty());
        assert_eq!(loader.fallback_dirs, vec![PathBuf::from("/somewhere")]);
    }

    #[test]
    fn namespace_prefix_normalized() {
        let mut loader = ClassLoader::new();
        loader.add_namespace("\\App\\Models\\", "/src");
        assert_eq!(loader.namespaces[0].0, "App\\Models\\");
    }

    #[test]
    fn class_map_entry_trims_leading_separator() {
        let mut loader = ClassLoader::new();
        loader.add_class_map_entry("\\App\\Special", "/src/special.php");
        assert!(loader.class_map.contains_key("App\\Special"));
    }
}
