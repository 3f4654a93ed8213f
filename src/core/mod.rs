// mod.rs - Core logic module

pub mod agreement;
pub mod dispatch;
pub mod partition;
pub mod synonyms;

// Re-export main types for convenience
pub use agreement::{partition_agreement, tiger_rate};
pub use dispatch::{
    chunk_ranges, select_executor, ParallelExecutor, RateDispatcher, RateExecutor, SequentialExecutor,
};
pub use partition::{build_partitions, Partition};
pub use synonyms::{SynonymResolver, SynonymStrategy};

use crate::data::RawMatrix;
use crate::error::Result;
use regex::Regex;
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{debug, info};

/// Validated settings for one rate computation
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub ignored_labels: BTreeSet<String>,
    pub excluded_taxa: BTreeSet<String>,
    pub exclude_pattern: Option<Regex>,
    pub synonym_strategy: SynonymStrategy,
    pub seed: Option<u64>,
    pub workers: usize,
    pub show_progress: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            ignored_labels: BTreeSet::new(),
            excluded_taxa: BTreeSet::new(),
            exclude_pattern: None,
            synonym_strategy: SynonymStrategy::Minimum,
            seed: None,
            workers: rayon::current_num_threads(),
            show_progress: false,
        }
    }
}

/// One rate per character, in character order
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    pub site_names: Option<Vec<String>>,
    pub rates: Vec<f64>,
}

impl RateTable {
    /// Display name of a character, falling back to its 1-based number
    pub fn label(&self, site: usize) -> String {
        self.site_names
            .as_ref()
            .and_then(|names| names.get(site))
            .cloned()
            .unwrap_or_else(|| (site + 1).to_string())
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Full pipeline: exclude taxa, resolve synonyms, build partitions, dispatch.
pub fn compute_rates(mut matrix: RawMatrix, settings: &AnalysisSettings) -> Result<RateTable> {
    let start = Instant::now();
    info!(
        "📊 Matrix: {} taxa × {} characters",
        matrix.n_taxa(),
        matrix.n_sites()
    );

    let removed = matrix.exclude_taxa(&settings.excluded_taxa, settings.exclude_pattern.as_ref())?;
    if removed > 0 {
        info!("✂️  Excluded {} taxa, {} remain", removed, matrix.n_taxa());
    }

    let resolver = SynonymResolver::new(settings.synonym_strategy).with_seed(settings.seed);
    if matrix.has_polymorphism() {
        info!(
            "🔀 Resolving synonyms with '{}' strategy ({})",
            resolver.strategy(),
            resolver.strategy().description()
        );
    }
    let resolved = resolver.resolve(matrix);

    let partitions = build_partitions(&resolved, &settings.ignored_labels)?;
    debug!(
        blocks = partitions.iter().map(Partition::n_blocks).sum::<usize>(),
        "partitions built"
    );

    let rates = RateDispatcher::new(settings.workers)
        .show_progress(settings.show_progress)
        .compute(&partitions)?;

    info!("⏱️  Total computation time: {:.2}s", start.elapsed().as_secs_f64());
    Ok(RateTable {
        site_names: resolved.site_names().map(<[String]>::to_vec),
        rates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StateValue;
    use crate::error::TigerError;

    fn raw(taxa: &[&str], rows: &[&str]) -> RawMatrix {
        RawMatrix::from_rows(
            taxa.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|row| row.chars().map(|c| StateValue::Definite(c.to_string())).collect())
                .collect(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_three_taxa_rates() {
        let matrix = raw(&["A", "B", "C"], &["00", "01", "11"]);
        let table = compute_rates(matrix, &AnalysisSettings::default()).unwrap();

        assert_eq!(table.rates, vec![0.5, 0.5]);
        assert_eq!(table.label(1), "2");
    }

    #[test]
    fn test_exclusion_matches_pre_removal() {
        let taxa = ["A", "B", "C", "D", "E"];
        let rows = ["0120", "0101", "1?21", "1010", "0222"];

        let settings = AnalysisSettings {
            excluded_taxa: ["C".to_string()].into_iter().collect(),
            workers: 1,
            ..AnalysisSettings::default()
        };
        let excluded = compute_rates(raw(&taxa, &rows), &settings).unwrap();

        let pre_removed = compute_rates(
            raw(&["A", "B", "D", "E"], &["0120", "0101", "1010", "0222"]),
            &AnalysisSettings {
                workers: 1,
                ..AnalysisSettings::default()
            },
        )
        .unwrap();

        assert_eq!(excluded.rates, pre_removed.rates);
    }

    #[test]
    fn test_ignoring_sole_label_fails() {
        let matrix = raw(&["A", "B", "C"], &["0-", "1-", "1-"]);
        let settings = AnalysisSettings {
            ignored_labels: ["-".to_string()].into_iter().collect(),
            ..AnalysisSettings::default()
        };

        assert!(matches!(
            compute_rates(matrix, &settings),
            Err(TigerError::EmptySiteAfterFiltering { site: 1, .. })
        ));
    }

    #[test]
    fn test_single_character_fails() {
        let matrix = raw(&["A", "B"], &["0", "1"]);
        assert!(matches!(
            compute_rates(matrix, &AnalysisSettings::default()),
            Err(TigerError::TooFewCharacters { found: 1 })
        ));
    }
}
