// mod.rs - Input format readers and their registry

pub mod cldf;
pub mod fasta;
pub mod harvest;

pub use cldf::CldfReader;
pub use fasta::FastaReader;
pub use harvest::HarvestReader;

use crate::data::matrix::RawMatrix;
use crate::error::{Result, TigerError};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::Path;

/// A pluggable parser turning one input format into a raw character matrix.
pub trait MatrixReader: Send + Sync + Debug {
    /// Name used to select this reader (`--format`)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Parse the input at `path`
    fn read(&self, path: &Path) -> Result<RawMatrix>;

    /// Whether this format can carry several candidate states per cell
    fn supports_polymorphism(&self) -> bool {
        false
    }
}

pub(crate) fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(TigerError::InputNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Registry of available readers, keyed by format name
pub struct ReaderRegistry {
    readers: BTreeMap<String, Box<dyn MatrixReader>>,
}

impl ReaderRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            readers: BTreeMap::new(),
        };

        registry.register_reader(Box::new(FastaReader));
        registry.register_reader(Box::new(HarvestReader));
        registry.register_reader(Box::new(CldfReader));

        registry
    }

    /// Register a reader under its own name
    pub fn register_reader(&mut self, reader: Box<dyn MatrixReader>) {
        self.readers.insert(reader.name().to_string(), reader);
    }

    pub fn get_reader(&self, name: &str) -> Option<&dyn MatrixReader> {
        self.readers.get(name).map(|r| r.as_ref())
    }

    pub fn has_reader(&self, name: &str) -> bool {
        self.readers.contains_key(name)
    }

    /// Look a reader up, failing with the list of known formats
    pub fn require(&self, name: &str) -> Result<&dyn MatrixReader> {
        self.get_reader(name).ok_or_else(|| TigerError::UnknownFormat {
            name: name.to_string(),
            available: self.formats_as_string(),
        })
    }

    /// List all available readers as (name, description)
    pub fn list_readers(&self) -> Vec<(&str, &str)> {
        self.readers
            .values()
            .map(|r| (r.name(), r.description()))
            .collect()
    }

    pub fn get_reader_names(&self) -> Vec<&str> {
        self.readers.keys().map(|s| s.as_str()).collect()
    }

    pub fn formats_as_string(&self) -> String {
        self.get_reader_names().join(", ")
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
