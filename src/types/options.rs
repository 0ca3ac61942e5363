use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::BlockvisError;

/// A taxonomy the host offers, with its selectable terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyOption {
    pub slug: String,
    /// Terms an editor UI lists for selection. Passed through untouched:
    /// new taxonomy rules start with no terms selected, and stored terms are
    /// never filtered against this list.
    #[serde(default)]
    pub terms: Vec<String>,
}

/// Enumerable choice lists supplied by the host.
///
/// Only used to pre-populate new rules; evaluation never consults it.
/// Every list defaults to empty.
pub trait OptionsProvider {
    fn post_types(&self) -> Vec<String> {
        Vec::new()
    }

    fn taxonomies(&self) -> Vec<TaxonomyOption> {
        Vec::new()
    }

    fn templates(&self) -> Vec<String> {
        Vec::new()
    }

    fn role_groups(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Provider with no choices; new rules fall back to fixed defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOptions;

impl OptionsProvider for NoOptions {}

/// Choice lists held in memory, typically loaded from a JSON document:
///
/// ```json
/// {
///   "post_types": ["page", "post"],
///   "taxonomies": [{ "slug": "category", "terms": ["news"] }],
///   "templates": ["default", "full-width"],
///   "role_groups": ["administrator", "editor"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticOptions {
    pub post_types: Vec<String>,
    pub taxonomies: Vec<TaxonomyOption>,
    pub templates: Vec<String>,
    pub role_groups: Vec<String>,
}

impl StaticOptions {
    /// Parse options from a JSON string. Missing lists are empty.
    ///
    /// # Errors
    ///
    /// Returns [`BlockvisError::Json`] if the input is not a valid options document.
    pub fn from_json_str(input: &str) -> Result<Self, BlockvisError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Read options from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`BlockvisError`] on I/O or parse failure.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BlockvisError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json_str(&input)
    }
}

impl OptionsProvider for StaticOptions {
    fn post_types(&self) -> Vec<String> {
        self.post_types.clone()
    }

    fn taxonomies(&self) -> Vec<TaxonomyOption> {
        self.taxonomies.clone()
    }

    fn templates(&self) -> Vec<String> {
        self.templates.clone()
    }

    fn role_groups(&self) -> Vec<String> {
        self.role_groups.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_options_is_empty() {
        assert!(NoOptions.post_types().is_empty());
        assert!(NoOptions.taxonomies().is_empty());
        assert!(NoOptions.templates().is_empty());
        assert!(NoOptions.role_groups().is_empty());
    }

    #[test]
    fn parse_partial_document() {
        let opts = StaticOptions::from_json_str(
            r#"{"post_types": ["page"], "taxonomies": [{"slug": "genre"}]}"#,
        )
        .unwrap();
        assert_eq!(opts.post_types(), vec!["page".to_owned()]);
        assert_eq!(
            opts.taxonomies(),
            vec![TaxonomyOption {
                slug: "genre".into(),
                terms: vec![],
            }]
        );
        assert!(opts.templates().is_empty());
    }

    #[test]
    fn parse_error_is_json_variant() {
        let err = StaticOptions::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, BlockvisError::Json(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = StaticOptions::from_file("/nonexistent/blockvis/options.json").unwrap_err();
        assert!(matches!(err, BlockvisError::Io(_)));
    }
}
