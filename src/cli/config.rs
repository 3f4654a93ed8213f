// config.rs - Configuration file support

use crate::error::{Result, TigerError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    // Input/Output
    pub input: Option<String>,
    pub format: Option<String>,
    pub output: Option<String>,

    // Filtering
    pub ignored_chars: Option<Vec<String>>,
    pub excluded_taxa: Option<Vec<String>>,
    pub exclude_pattern: Option<String>,

    // Synonyms
    pub synonyms: Option<String>,
    pub seed: Option<u64>,

    // Performance
    pub processes: Option<usize>,

    // Flags
    pub names: Option<bool>,
    pub quiet: Option<bool>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| TigerError::Config(format!("invalid TOML: {}", e)))
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            TigerError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| {
            TigerError::Config(format!("Failed to parse config file '{}': {}", path.display(), e))
        })
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# tiger-rates.toml - Configuration file for tiger-rates
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# Input file (fasta, harvest) or dataset directory (cldf)
input = "/path/to/dataset"

# Input format: fasta, harvest, cldf
format = "cldf"

# Write rates to a file instead of standard output
# output = "rates.txt"

# =============================================================================
# FILTERING
# =============================================================================

# State labels treated as missing at every character
ignored_chars = ["?", "-"]

# Taxa removed before analysis (each must exist in the input)
# excluded_taxa = ["Latin", "Gothic"]

# Remove every taxon whose name matches this regex pattern
# exclude_pattern = "^Proto"

# =============================================================================
# SYNONYMS (only used by formats with polymorphic states, e.g. cldf)
# =============================================================================

# Strategy: random, minimum, maximum
synonyms = "minimum"

# Seed for the random strategy (omit for a fresh draw on every run)
# seed = 42

# =============================================================================
# PERFORMANCE
# =============================================================================

# Number of worker threads (omit for auto-detection, 1 runs sequentially)
# processes = 8

# =============================================================================
# FLAGS
# =============================================================================

# Print each character's name before its rate
names = false

# Only log warnings and hide the progress bar
quiet = false
"#
        .to_string()
    }
}
