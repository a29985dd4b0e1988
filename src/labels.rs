//! Label vocabulary loading
//!
//! The classifier's output channels are mapped to symbolic labels through a
//! vocabulary loaded once at startup. The on-disk format is a JSON record
//! with a `classes` field holding the ordered label strings. A missing or
//! malformed file falls back to the classifier's default training taxonomy:
//! the digits 1-9 followed by the 26 uppercase Latin letters. That exact
//! sequence must be reproduced for compatibility with models trained
//! against it.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default on-disk location of the vocabulary file
pub const DEFAULT_LABELS_PATH: &str = "labels.json";

static DEFAULT_VOCABULARY: Lazy<Vec<String>> = Lazy::new(|| {
    let mut labels: Vec<String> = (1..=9).map(|d| d.to_string()).collect();
    labels.extend(('A'..='Z').map(|c| c.to_string()));
    labels
});

#[derive(Debug, Deserialize)]
struct LabelFile {
    #[serde(default)]
    classes: Option<Vec<String>>,
}

/// Ordered, index-addressable label vocabulary, immutable after load
#[derive(Debug, Clone, PartialEq)]
pub struct LabelVocabulary {
    labels: Vec<String>,
}

impl LabelVocabulary {
    /// Load the vocabulary from a JSON file.
    ///
    /// Falls back to the default taxonomy when the file is missing, is not
    /// valid JSON, lacks a `classes` list, or the list is empty. The
    /// fallback is an accepted degraded mode, not an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<LabelFile>(&contents) {
                Ok(file) => match file.classes {
                    Some(classes) if !classes.is_empty() => {
                        log::debug!(
                            "[Labels] Loaded {} labels from {:?}",
                            classes.len(),
                            path.as_ref()
                        );
                        Self { labels: classes }
                    }
                    _ => {
                        log::debug!(
                            "[Labels] {:?} has no usable classes list, using default taxonomy",
                            path.as_ref()
                        );
                        Self::default_taxonomy()
                    }
                },
                Err(_) => {
                    log::debug!(
                        "[Labels] {:?} is not valid JSON, using default taxonomy",
                        path.as_ref()
                    );
                    Self::default_taxonomy()
                }
            },
            Err(_) => {
                log::debug!(
                    "[Labels] {:?} not readable, using default taxonomy",
                    path.as_ref()
                );
                Self::default_taxonomy()
            }
        }
    }

    /// Build a vocabulary from explicit labels
    pub fn from_labels(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// The default taxonomy: "1".."9" then "A".."Z" (35 entries)
    pub fn default_taxonomy() -> Self {
        Self {
            labels: DEFAULT_VOCABULARY.clone(),
        }
    }

    /// Label at the given classifier output index, if in bounds
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn expected_default() -> Vec<String> {
        let mut labels: Vec<String> = (1..=9).map(|d| d.to_string()).collect();
        for c in 'A'..='Z' {
            labels.push(c.to_string());
        }
        labels
    }

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_default_taxonomy_has_35_entries_in_order() {
        let vocab = LabelVocabulary::default_taxonomy();

        assert_eq!(vocab.len(), 35);
        assert_eq!(vocab.get(0), Some("1"));
        assert_eq!(vocab.get(8), Some("9"));
        assert_eq!(vocab.get(9), Some("A"));
        assert_eq!(vocab.get(34), Some("Z"));
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let vocab = LabelVocabulary::load("/nonexistent/labels.json");
        assert_eq!(vocab, LabelVocabulary::from_labels(expected_default()));
    }

    #[test]
    fn test_malformed_json_falls_back_to_default() {
        let path = write_temp("signspeak_labels_malformed.json", "{not json");
        let vocab = LabelVocabulary::load(&path);
        assert_eq!(vocab, LabelVocabulary::from_labels(expected_default()));
    }

    #[test]
    fn test_empty_classes_falls_back_to_default() {
        let path = write_temp("signspeak_labels_empty.json", r#"{"classes": []}"#);
        let vocab = LabelVocabulary::load(&path);
        assert_eq!(vocab, LabelVocabulary::from_labels(expected_default()));
    }

    #[test]
    fn test_missing_classes_field_falls_back_to_default() {
        let path = write_temp("signspeak_labels_nofield.json", r#"{"names": ["A"]}"#);
        let vocab = LabelVocabulary::load(&path);
        assert_eq!(vocab, LabelVocabulary::from_labels(expected_default()));
    }

    #[test]
    fn test_valid_file_preserves_order() {
        let path = write_temp(
            "signspeak_labels_valid.json",
            r#"{"classes": ["HELLO", "YES", "NO"]}"#,
        );
        let vocab = LabelVocabulary::load(&path);

        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.get(0), Some("HELLO"));
        assert_eq!(vocab.get(1), Some("YES"));
        assert_eq!(vocab.get(2), Some("NO"));
    }

    #[test]
    fn test_out_of_bounds_index_is_none() {
        let vocab = LabelVocabulary::from_labels(vec!["A".to_string()]);
        assert_eq!(vocab.get(1), None);
    }
}
