//! Fatal scaffold errors
//!
//! Everything here aborts the run before the filesystem is touched.
//! Per-operation failures (a write that fails, a registry without an anchor)
//! are not errors in this sense; they are recorded in the [`RunReport`].
//!
//! [`RunReport`]: crate::report::RunReport

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScaffoldError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid fields: {}", .0.join("; "))]
    InvalidFields(Vec<String>),

    #[error("Malformed page spec (expected group:pageId:title): {0}")]
    MalformedPage(String),

    #[error("Tool option --{0} must come before the guide flags")]
    MisplacedOption(String),

    #[error("Duplicate page id: {0}")]
    DuplicatePage(String),

    #[error("Guide already scaffolded: {} exists", .0.display())]
    AlreadyScaffolded(PathBuf),

    #[error("Invalid layout config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl ScaffoldError {
    /// Short stage label used when printing a fatal error
    pub fn stage(&self) -> &'static str {
        match self {
            Self::MissingFields(_) | Self::InvalidFields(_) => "validate",
            Self::MalformedPage(_) | Self::DuplicatePage(_) | Self::MisplacedOption(_) => "parse",
            Self::AlreadyScaffolded(_) => "preflight",
            Self::Config { .. } => "config",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_lists_all() {
        let err = ScaffoldError::MissingFields(vec!["id".into(), "title".into()]);
        assert_eq!(err.to_string(), "Missing required fields: id, title");
        assert_eq!(err.stage(), "validate");
    }

    #[test]
    fn test_preflight_message() {
        let err = ScaffoldError::AlreadyScaffolded(PathBuf::from("src/guides/x/xData.ts"));
        assert!(err.to_string().contains("src/guides/x/xData.ts"));
        assert_eq!(err.stage(), "preflight");
    }
}
