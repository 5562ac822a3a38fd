//! Round-trip validation for envlist sources
//!
//! Checks that `render(parse(source)) == source` byte for byte, and reports
//! where the two diverge when they don't.
//!
//! # Example
//!
//! ```rust,ignore
//! use envlist_core::cst::RoundTripValidator;
//!
//! let validator = RoundTripValidator::new();
//! let result = validator.validate_round_trip("py{37,38}, lint  # style");
//! assert!(result.is_valid());
//! ```

use tracing::debug;

use super::parse;

/// Result of round-trip validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether the rendered text equals the original
    pub is_valid: bool,
    /// Original source code
    pub original: String,
    /// Text rendered from the parsed tree (empty on parse failure)
    pub rendered: String,
    /// First byte offset where original and rendered differ
    pub mismatch_offset: Option<usize>,
    /// Parse error, if the source did not parse
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Get all validation issues
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if let Some(error) = &self.error {
            issues.push(format!("Parsing failed: {error}"));
        }

        if let Some(offset) = self.mismatch_offset {
            issues.push(format!("Rendered text differs at byte {offset}"));
        }

        issues
    }
}

/// Round-trip validator for envlist sources
#[derive(Debug, Default, Clone, Copy)]
pub struct RoundTripValidator;

impl RoundTripValidator {
    pub fn new() -> Self {
        Self
    }

    /// Parse `source` and compare the rendered tree with it
    pub fn validate_round_trip(&self, source: &str) -> ValidationResult {
        let rendered = match parse(source) {
            Ok(list) => list.text(),
            Err(err) => {
                debug!(%err, "round-trip parse failed");
                return ValidationResult {
                    is_valid: false,
                    original: source.to_string(),
                    rendered: String::new(),
                    mismatch_offset: None,
                    error: Some(err.to_string()),
                };
            }
        };

        let mismatch_offset = first_difference(source, &rendered);
        if let Some(offset) = mismatch_offset {
            debug!(offset, "round-trip mismatch");
        }

        ValidationResult {
            is_valid: mismatch_offset.is_none(),
            original: source.to_string(),
            rendered,
            mismatch_offset,
            error: None,
        }
    }
}

fn first_difference(a: &str, b: &str) -> Option<usize> {
    let common = a
        .bytes()
        .zip(b.bytes())
        .position(|(x, y)| x != y)
        .unwrap_or_else(|| a.len().min(b.len()));
    (common < a.len() || common < b.len()).then_some(common)
}
