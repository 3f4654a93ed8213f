// matrix.rs - Character matrix and cell value types

use crate::error::{Result, TigerError};
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::fmt::{self, Display};

/// A raw observation as produced by a reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateValue {
    /// A single observed state label
    Definite(String),
    /// No observation
    Missing,
    /// Candidate labels for a polymorphic or synonymous observation (may be empty)
    Ambiguous(BTreeSet<String>),
}

impl StateValue {
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, StateValue::Ambiguous(set) if set.len() > 1)
    }

    /// Candidate labels of this cell, without the missing marker.
    pub fn candidates(&self) -> Vec<&str> {
        match self {
            StateValue::Definite(label) => vec![label.as_str()],
            StateValue::Missing => Vec::new(),
            StateValue::Ambiguous(set) => set.iter().map(|s| s.as_str()).collect(),
        }
    }
}

/// A resolved observation: what partitions are built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum State {
    Label(String),
    Missing,
}

impl State {
    pub fn as_label(&self) -> Option<&str> {
        match self {
            State::Label(label) => Some(label),
            State::Missing => None,
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Label(label) => write!(f, "{}", label),
            State::Missing => write!(f, "?"),
        }
    }
}

/// Aligned taxa × characters matrix, stored column-wise (one column per site).
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterMatrix<C> {
    taxa: Vec<String>,
    sites: Vec<Vec<C>>,
    site_names: Option<Vec<String>>,
}

/// Matrix straight out of a reader
pub type RawMatrix = CharacterMatrix<StateValue>;
/// Matrix after synonym resolution
pub type ResolvedMatrix = CharacterMatrix<State>;

impl<C> CharacterMatrix<C> {
    /// Build a matrix from site columns, each holding one cell per taxon.
    pub fn from_sites(
        taxa: Vec<String>,
        sites: Vec<Vec<C>>,
        site_names: Option<Vec<String>>,
    ) -> Result<Self> {
        if taxa.is_empty() {
            return Err(TigerError::EmptyMatrix("no taxa"));
        }
        if sites.is_empty() {
            return Err(TigerError::EmptyMatrix("no characters"));
        }

        let mut seen = HashSet::with_capacity(taxa.len());
        for (index, taxon) in taxa.iter().enumerate() {
            if !seen.insert(taxon.as_str()) {
                return Err(TigerError::malformed(
                    "taxa list",
                    index + 1,
                    format!("duplicate taxon name '{}'", taxon),
                ));
            }
        }

        for (index, column) in sites.iter().enumerate() {
            if column.len() != taxa.len() {
                return Err(TigerError::malformed(
                    "character matrix",
                    index + 1,
                    format!(
                        "character {} has {} states, expected {}",
                        index + 1,
                        column.len(),
                        taxa.len()
                    ),
                ));
            }
        }

        if let Some(names) = &site_names {
            if names.len() != sites.len() {
                return Err(TigerError::InvalidArgument(format!(
                    "{} character names given for {} characters",
                    names.len(),
                    sites.len()
                )));
            }
        }

        Ok(Self {
            taxa,
            sites,
            site_names,
        })
    }

    /// Build a matrix from taxon rows (one aligned row per taxon).
    pub fn from_rows(
        taxa: Vec<String>,
        rows: Vec<Vec<C>>,
        site_names: Option<Vec<String>>,
    ) -> Result<Self> {
        if rows.len() != taxa.len() {
            return Err(TigerError::malformed(
                "character matrix",
                0,
                format!("{} rows for {} taxa", rows.len(), taxa.len()),
            ));
        }
        let n_sites = rows.first().map(|r| r.len()).unwrap_or(0);
        for (taxon, row) in taxa.iter().zip(&rows) {
            if row.len() != n_sites {
                return Err(TigerError::malformed(
                    "character matrix",
                    0,
                    format!(
                        "taxon '{}' has {} characters, expected {}",
                        taxon,
                        row.len(),
                        n_sites
                    ),
                ));
            }
        }

        let mut sites: Vec<Vec<C>> = (0..n_sites).map(|_| Vec::with_capacity(rows.len())).collect();
        for row in rows {
            for (column, cell) in sites.iter_mut().zip(row) {
                column.push(cell);
            }
        }

        Self::from_sites(taxa, sites, site_names)
    }

    pub fn taxa(&self) -> &[String] {
        &self.taxa
    }

    pub fn n_taxa(&self) -> usize {
        self.taxa.len()
    }

    pub fn n_sites(&self) -> usize {
        self.sites.len()
    }

    pub fn site(&self, index: usize) -> &[C] {
        &self.sites[index]
    }

    pub fn sites(&self) -> impl Iterator<Item = &[C]> {
        self.sites.iter().map(|s| s.as_slice())
    }

    pub fn site_names(&self) -> Option<&[String]> {
        self.site_names.as_deref()
    }

    pub fn site_name(&self, index: usize) -> Option<&str> {
        self.site_names
            .as_ref()
            .and_then(|names| names.get(index))
            .map(|s| s.as_str())
    }

    /// Replace every cell while keeping taxa and names.
    pub fn map_sites<D>(self, f: impl FnOnce(&[String], Vec<Vec<C>>) -> Vec<Vec<D>>) -> CharacterMatrix<D> {
        let sites = f(&self.taxa, self.sites);
        CharacterMatrix {
            taxa: self.taxa,
            sites,
            site_names: self.site_names,
        }
    }

    /// Remove taxa before any partitioning.
    ///
    /// Every name in `excluded` must exist; taxa matching `pattern` are removed too.
    /// Returns the number of removed taxa.
    pub fn exclude_taxa(&mut self, excluded: &BTreeSet<String>, pattern: Option<&Regex>) -> Result<usize> {
        for name in excluded {
            if !self.taxa.iter().any(|t| t == name) {
                return Err(TigerError::UnknownExcludedTaxon(name.clone()));
            }
        }

        let keep: Vec<bool> = self
            .taxa
            .iter()
            .map(|taxon| {
                !excluded.contains(taxon) && !pattern.is_some_and(|re| re.is_match(taxon))
            })
            .collect();

        let removed = keep.iter().filter(|k| !**k).count();
        if removed == 0 {
            return Ok(0);
        }

        let mut flags = keep.iter();
        self.taxa.retain(|_| *flags.next().unwrap_or(&true));
        for column in &mut self.sites {
            let mut flags = keep.iter();
            column.retain(|_| *flags.next().unwrap_or(&true));
        }

        if self.taxa.is_empty() {
            return Err(TigerError::EmptyMatrix("all taxa were excluded"));
        }
        Ok(removed)
    }
}

impl RawMatrix {
    /// True if any cell carries two or more candidate labels.
    pub fn has_polymorphism(&self) -> bool {
        self.sites.iter().flatten().any(|cell| cell.is_ambiguous())
    }
}
