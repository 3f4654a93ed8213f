// validation.rs - Input validation utilities

use crate::cli::args::Args;
use crate::core::{AnalysisSettings, SynonymStrategy};
use crate::data::ReaderRegistry;
use crate::error::{Result, TigerError};
use regex::Regex;
use std::collections::BTreeSet;
use std::str::FromStr;

pub struct ValidationResult {
    pub input: String,
    pub format: String,
    pub settings: AnalysisSettings,
}

/// Split a comma-separated list, dropping blank entries
pub fn parse_list(list: &str) -> BTreeSet<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validate all command line arguments
pub fn validate_args(args: &Args, registry: &ReaderRegistry) -> Result<ValidationResult> {
    let input = args
        .input
        .clone()
        .ok_or_else(|| TigerError::InvalidArgument("an input path is required".to_string()))?;

    // Validate format
    let format = args.format.clone().ok_or_else(|| {
        TigerError::InvalidArgument(format!(
            "--format is required. Available formats: {}",
            registry.formats_as_string()
        ))
    })?;
    registry.require(&format)?;

    let synonym_strategy = match &args.synonyms {
        Some(name) => SynonymStrategy::from_str(name)?,
        None => SynonymStrategy::Minimum,
    };

    // Compile regex pattern
    let exclude_pattern = match &args.exclude_pattern {
        Some(pattern) => Some(
            Regex::new(pattern)
                .map_err(|e| TigerError::InvalidArgument(format!("Invalid exclude_pattern regex: {}", e)))?,
        ),
        None => None,
    };

    let workers = args.processes.unwrap_or_else(rayon::current_num_threads);

    Ok(ValidationResult {
        input,
        format,
        settings: AnalysisSettings {
            ignored_labels: parse_list(&args.ignored_chars),
            excluded_taxa: parse_list(&args.excluded_taxa),
            exclude_pattern,
            synonym_strategy,
            seed: args.seed,
            workers,
            show_progress: !args.quiet,
        },
    })
}
