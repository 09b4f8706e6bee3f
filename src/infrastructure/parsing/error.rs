//! Parsing error types for HTML extraction
//!
//! Page-level failures only: individual detail fields are extracted
//! fail-soft and never surface as errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid CSS selector: {selector}")]
    InvalidSelector { selector: String },

    #[error("invalid text pattern: {pattern}")]
    InvalidPattern { pattern: String },

    #[error("total result count not found on results page")]
    TotalCountMissing,

    #[error("could not parse total result count from '{text}'")]
    TotalCountInvalid { text: String },

    #[error("could not resolve detail link '{href}' against '{base_url}'")]
    UrlResolutionFailed { href: String, base_url: String },
}

impl ParseError {
    pub fn invalid_selector(selector: &str) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
        }
    }

    pub fn invalid_pattern(pattern: &str) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
