// lib.rs - tiger-rates library root

//! # tiger-rates - TIGER rate calculator for aligned character matrices
//!
//! Computes, for every character of an aligned matrix, the TIGER rate: how well the
//! partition of taxa induced by that character agrees with the partitions induced by
//! all other characters. Low rates flag characters that conflict with the rest of the
//! data and are therefore likely to evolve fast.
//!
//! ## Features
//!
//! - **Several inputs**: FASTA alignments, Harvest-style CSV tables, CLDF wordlist datasets
//! - **Synonym handling**: random, minimum or maximum resolution of polymorphic cells
//! - **Filtering**: ignored state labels, excluded taxa by name or regex
//! - **Parallel evaluation**: characters split across a dedicated worker pool
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use tiger_rates::prelude::*;
//!
//! let matrix = FastaReader.read(std::path::Path::new("alignment.fasta"))?;
//! let settings = AnalysisSettings {
//!     ignored_labels: ["?".to_string(), "-".to_string()].into_iter().collect(),
//!     ..AnalysisSettings::default()
//! };
//! let table = compute_rates(matrix, &settings)?;
//! write_rates_to(None, &table, false)?;
//! # Ok::<(), tiger_rates::TigerError>(())
//! ```

pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod output;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, Config, ValidationResult};
    pub use crate::core::{compute_rates, AnalysisSettings, RateTable};
    pub use crate::core::{partition_agreement, tiger_rate, Partition, SynonymStrategy};
    pub use crate::data::{CldfReader, FastaReader, HarvestReader, MatrixReader, ReaderRegistry};
    pub use crate::data::{RawMatrix, ResolvedMatrix, State, StateValue};
    pub use crate::error::{Result, TigerError};
    pub use crate::output::{write_rates, write_rates_to};
}

// Re-export main types at the root level for convenience
pub use core::{compute_rates, AnalysisSettings, RateTable};
pub use data::{MatrixReader, ReaderRegistry};
pub use error::{Result, TigerError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!("tiger-rates v{} - TIGER rate calculator", VERSION)
}
