// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};
use crate::error::Result;

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Input/Output
        if self.input.is_none() {
            self.input = config.input;
        }
        if self.format.is_none() {
            self.format = config.format;
        }
        if self.output.is_none() {
            self.output = config.output;
        }

        // Filtering (only override empty defaults)
        if self.ignored_chars.is_empty() {
            if let Some(labels) = config.ignored_chars {
                self.ignored_chars = labels.join(",");
            }
        }
        if self.excluded_taxa.is_empty() {
            if let Some(taxa) = config.excluded_taxa {
                self.excluded_taxa = taxa.join(",");
            }
        }
        if self.exclude_pattern.is_none() {
            self.exclude_pattern = config.exclude_pattern;
        }

        // Synonyms
        if self.synonyms.is_none() {
            self.synonyms = config.synonyms;
        }
        if self.seed.is_none() {
            self.seed = config.seed;
        }

        // Performance
        if self.processes.is_none() {
            self.processes = config.processes;
        }

        // Flags (CLI flags take precedence, config only sets if not explicitly set)
        if !self.names && config.names.unwrap_or(false) {
            self.names = true;
        }
        if !self.quiet && config.quiet.unwrap_or(false) {
            self.quiet = true;
        }

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argh::FromArgs;

    fn parse(args: &[&str]) -> Args {
        Args::from_args(&["tiger-rates"], args).unwrap()
    }

    #[test]
    fn test_config_fills_unset_values() {
        let args = parse(&["data.fasta"]);
        let config = Config {
            format: Some("fasta".to_string()),
            ignored_chars: Some(vec!["?".to_string(), "-".to_string()]),
            synonyms: Some("maximum".to_string()),
            processes: Some(3),
            names: Some(true),
            ..Config::new()
        };

        let merged = args.merge_with_config(config);
        assert_eq!(merged.input.as_deref(), Some("data.fasta"));
        assert_eq!(merged.format.as_deref(), Some("fasta"));
        assert_eq!(merged.ignored_chars, "?,-");
        assert_eq!(merged.synonyms.as_deref(), Some("maximum"));
        assert_eq!(merged.processes, Some(3));
        assert!(merged.names);
    }

    #[test]
    fn test_cli_wins_over_config() {
        let args = parse(&["data.csv", "-f", "harvest", "-i", "0", "-n", "1", "--synonyms", "random"]);
        let config = Config {
            input: Some("other.csv".to_string()),
            format: Some("fasta".to_string()),
            ignored_chars: Some(vec!["?".to_string()]),
            synonyms: Some("maximum".to_string()),
            processes: Some(8),
            ..Config::new()
        };

        let merged = args.merge_with_config(config);
        assert_eq!(merged.input.as_deref(), Some("data.csv"));
        assert_eq!(merged.format.as_deref(), Some("harvest"));
        assert_eq!(merged.ignored_chars, "0");
        assert_eq!(merged.synonyms.as_deref(), Some("random"));
        assert_eq!(merged.processes, Some(1));
    }

    #[test]
    fn test_explicit_default_strategy_beats_config() {
        let args = parse(&["d", "-f", "cldf", "--synonyms", "minimum"]);
        let config = Config {
            synonyms: Some("maximum".to_string()),
            ..Config::new()
        };

        let merged = args.merge_with_config(config);
        assert_eq!(merged.synonyms.as_deref(), Some("minimum"));
    }

    #[test]
    fn test_unset_strategy_stays_unset() {
        let merged = parse(&["d", "-f", "cldf"]).merge_with_config(Config::new());
        assert_eq!(merged.synonyms, None);
    }
}
