//! Parser configuration.
//!
//! Every field has a default, so `{}` is a valid options document and a
//! driver only spells out what it changes.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_RECURSION_DEPTH: u32 = 256;
pub const DEFAULT_SPECULATION_TOKEN_BUDGET: u32 = 512;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseOptions {
    /// Nesting depth past which `RecursionLimitExceeded` is reported.
    pub max_recursion_depth: u32,
    /// Tokens one speculative sub-parse may consume before it gives up.
    pub speculation_token_budget: u32,
    /// Stamped into every diagnostic of the file.
    pub file_name: Option<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
            speculation_token_budget: DEFAULT_SPECULATION_TOKEN_BUDGET,
            file_name: None,
        }
    }
}

impl ParseOptions {
    /// Parse options from a JSON document.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let options = ParseOptions::from_json("{}").unwrap();
        assert_eq!(options, ParseOptions::default());
        assert_eq!(options.max_recursion_depth, 256);
        assert_eq!(options.speculation_token_budget, 512);
    }

    #[test]
    fn camel_case_fields() {
        let options =
            ParseOptions::from_json(r#"{"maxRecursionDepth": 32, "fileName": "main.cj"}"#).unwrap();
        assert_eq!(options.max_recursion_depth, 32);
        assert_eq!(options.speculation_token_budget, DEFAULT_SPECULATION_TOKEN_BUDGET);
        assert_eq!(options.file_name.as_deref(), Some("main.cj"));
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(ParseOptions::from_json(r#"{"maxRecursionDepth": "deep"}"#).is_err());
    }
}
