// error.rs - Error taxonomy shared by readers, core and CLI

use std::path::PathBuf;

/// Everything that can stop a rate computation.
///
/// All variants except [`TigerError::UnsupportedPlatformForParallelism`] are fatal:
/// they propagate to `main`, which prints them and exits with status 1.
#[derive(Debug, thiserror::Error)]
pub enum TigerError {
    #[error("Input '{}' does not exist", .path.display())]
    InputNotFound { path: PathBuf },

    #[error("Unsupported {format} layout: {reason}")]
    UnsupportedFormatLayout { format: &'static str, reason: String },

    #[error("Malformed row in {source_name} (line {line}): {reason}")]
    MalformedRow {
        source_name: String,
        line: usize,
        reason: String,
    },

    #[error("Excluded taxon '{0}' is not present in the matrix")]
    UnknownExcludedTaxon(String),

    #[error("Character matrix is empty: {0}")]
    EmptyMatrix(&'static str),

    #[error("At least 2 characters are required to compute rates, found {found}")]
    TooFewCharacters { found: usize },

    #[error("Character {} has no usable states after filtering ignored labels", display_site(.site, .name))]
    EmptySiteAfterFiltering { site: usize, name: Option<String> },

    /// Non-fatal: the dispatcher logs it and falls back to sequential execution.
    #[error("Parallel execution with {requested} workers is not available: {reason}")]
    UnsupportedPlatformForParallelism { requested: usize, reason: String },

    #[error("Rate computation failed: {0}")]
    WorkerFailed(String),

    #[error("Unknown format '{name}'. Available formats: {available}")]
    UnknownFormat { name: String, available: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TigerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TigerError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(source_name: impl Into<String>, line: usize, reason: impl Into<String>) -> Self {
        TigerError::MalformedRow {
            source_name: source_name.into(),
            line,
            reason: reason.into(),
        }
    }
}

fn display_site(site: &usize, name: &Option<String>) -> String {
    match name {
        Some(name) => format!("#{} ('{}')", site + 1, name),
        None => format!("#{}", site + 1),
    }
}

pub type Result<T> = std::result::Result<T, TigerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_site_message_names_site() {
        let err = TigerError::EmptySiteAfterFiltering {
            site: 2,
            name: Some("hand".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Character #3 ('hand') has no usable states after filtering ignored labels"
        );

        let unnamed = TigerError::EmptySiteAfterFiltering { site: 0, name: None };
        assert!(unnamed.to_string().starts_with("Character #1 has"));
    }

    #[test]
    fn test_malformed_row_context() {
        let err = TigerError::malformed("forms.csv", 7, "unknown Language_ID 'x'");
        assert_eq!(
            err.to_string(),
            "Malformed row in forms.csv (line 7): unknown Language_ID 'x'"
        );
    }
}
