//! Builds a class → file index by scanning a sequence of candidate
//! files, and persists it as a flat JSON object.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::Error;

/// Flat mapping from fully-qualified class name to file path, in
/// file-visitation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassMap {
    entries: IndexMap<String, String>,
}

impl ClassMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reloads a map written by `ClassMapGenerator::dump`.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)
            .map_err(|source| Error::Read { path: path.to_path_buf(), source })?;
        serde_json::from_str(&text)
            .map_err(|source| Error::ClassMap { path: path.to_path_buf(), source })
    }

    pub fn get(&self, class: &str) -> Option<&str> {
        self.entries.get(class).map(String::as_str)
    }

    /// Returns the previously recorded path when `class` was already
    /// present; the new path replaces it.
    pub fn insert(&mut self, class: String, path: String) -> Option<String> {
        self.entries.insert(class, path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(class, path)| (class.as_str(), path.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for ClassMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

// ─── Duplicates ──────────────────────────────────────────────────────────────

/// Two files declared the same class. Non-fatal: the later occurrence
/// is the one kept in the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateClass {
    pub class: String,
    /// Path that now holds the mapping.
    pub path: String,
    /// Path recorded before it.
    pub previous: String,
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub class_map: ClassMap,
    pub duplicates: Vec<DuplicateClass>,
}

// ─── Generator ───────────────────────────────────────────────────────────────

/// Walks a sequence of candidate files and accumulates the classes each
/// one declares. Best-effort: a file that cannot be read is skipped,
/// never aborting the scan.
#[derive(Debug, Default)]
pub struct ClassMapGenerator {
    base_dir: Option<PathBuf>,
}

impl ClassMapGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded paths have `base_dir` (and the following separator)
    /// stripped, so the map stays valid when the tree is relocated.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: Some(base_dir.into()) }
    }

    pub fn scan(&self, files: impl IntoIterator<Item = PathBuf>) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();

        for path in files {
            if path.extension().and_then(|ext| ext.to_str()) != Some(crate::SOURCE_EXTENSION) {
                continue;
            }

            let source = match fs::read_to_string(&path) {
                Ok(source) => source,
                Err(err) => {
                    warn!(path = %path.display(), %err, "skipping unreadable file");
                    continue;
                }
            };

            let classes = crate::classes_in(&source);
            if classes.is_empty() {
                continue;
            }

            let stored = self.stored_path(&path);
            for class in classes {
                if let Some(previous) = outcome.class_map.insert(class.clone(), stored.clone()) {
                    warn!(class = %class, path = %stored, previous = %previous, "class defined twice");
                    outcome.duplicates.push(DuplicateClass {
                        class,
                        path: stored.clone(),
                        previous,
                    });
                }
            }
        }

        outcome
    }

    /// Scan plus a JSON dump of the finished map: a single serialized
    /// object reloadable with `ClassMap::load`.
    pub fn dump(
        &self,
        files: impl IntoIterator<Item = PathBuf>,
        dest: &Path,
    ) -> Result<ScanOutcome, Error> {
        let outcome = self.scan(files);
        let json = serde_json::to_string_pretty(&outcome.class_map)
            .map_err(|source| Error::ClassMap { path: dest.to_path_buf(), source })?;
        fs::write(dest, json)
            .map_err(|source| Error::Write { path: dest.to_path_buf(), source })?;
        Ok(outcome)
    }

    fn stored_path(&self, path: &Path) -> String {
        let relative = match &self.base_dir {
            Some(base) => path.strip_prefix(base).unwrap_or(path),
            None => path,
        };
        relative.to_string_lossy().into_owned()
    }
}
