//! Language classification from file paths.

use std::path::Path;

use crate::catalog::Catalog;

/// Label for paths whose extension is not in the catalogue.
pub const OTHER_LANGUAGE: &str = "Other";

/// Label for commits that changed no files.
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Maps file paths to language labels using a catalogue's extension table.
#[derive(Debug, Clone, Copy)]
pub struct LanguageClassifier<'a> {
    catalog: &'a Catalog,
}

impl<'a> LanguageClassifier<'a> {
    /// Creates a classifier over `catalog`.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Lower-cased lookup key for a path: its extension, or the whole file
    /// name when it has none (so `Dockerfile` can be mapped).
    pub fn lookup_key(path: &str) -> Option<String> {
        let path = Path::new(path);
        path.extension()
            .or_else(|| path.file_name())
            .map(|key| key.to_string_lossy().to_lowercase())
    }

    /// Language for a single path, [`OTHER_LANGUAGE`] when unmapped.
    pub fn language_of(&self, path: &str) -> &'a str {
        Self::lookup_key(path)
            .and_then(|key| self.catalog.language(&key))
            .unwrap_or(OTHER_LANGUAGE)
    }

    /// Dominant language of a commit's file list.
    ///
    /// The lookup key seen most often wins; ties go to the key encountered
    /// first. An empty list yields [`UNKNOWN_LANGUAGE`].
    pub fn dominant_language(&self, files: &[String]) -> String {
        let mut counts: Vec<(Option<String>, usize)> = Vec::new();
        for file in files {
            let key = Self::lookup_key(file);
            match counts.iter_mut().find(|(seen, _)| *seen == key) {
                Some((_, count)) => *count += 1,
                None => counts.push((key, 1)),
            }
        }

        let mut best: Option<(&Option<String>, usize)> = None;
        for (key, count) in &counts {
            if best.map_or(true, |(_, best_count)| *count > best_count) {
                best = Some((key, *count));
            }
        }

        match best {
            Some((Some(key), _)) => self
                .catalog
                .language(key)
                .unwrap_or(OTHER_LANGUAGE)
                .to_string(),
            Some((None, _)) => OTHER_LANGUAGE.to_string(),
            None => UNKNOWN_LANGUAGE.to_string(),
        }
    }
}
