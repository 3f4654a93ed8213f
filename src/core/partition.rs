// partition.rs - Set partitions of taxa per character

use crate::data::matrix::{ResolvedMatrix, State};
use crate::error::{Result, TigerError};
use std::collections::{BTreeMap, BTreeSet};

/// Taxa of one character grouped by state label.
///
/// Taxa are referred to by their index in the matrix taxa list. Blocks are
/// ordered by label and hold ascending taxon indices; missing and ignored taxa
/// belong to no block.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    blocks: Vec<Vec<usize>>,
    assignment: Vec<Option<usize>>,
}

impl Partition {
    /// Group one column of resolved states, dropping ignored labels.
    pub fn from_states(states: &[State], ignored: &BTreeSet<String>) -> Self {
        let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (taxon, state) in states.iter().enumerate() {
            if let Some(label) = state.as_label() {
                if !ignored.contains(label) {
                    groups.entry(label).or_default().push(taxon);
                }
            }
        }

        let mut assignment = vec![None; states.len()];
        let mut blocks = Vec::with_capacity(groups.len());
        for (block, taxa) in groups.into_values().enumerate() {
            for &taxon in &taxa {
                assignment[taxon] = Some(block);
            }
            blocks.push(taxa);
        }

        Self { blocks, assignment }
    }

    pub fn n_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Vec<usize>] {
        &self.blocks
    }

    /// Index of the block holding `taxon`, `None` if the taxon has no usable state
    pub fn block_of(&self, taxon: usize) -> Option<usize> {
        self.assignment.get(taxon).copied().flatten()
    }
}

/// Build one partition per character.
///
/// Fails with `EmptySiteAfterFiltering` on the first character left without
/// any block.
pub fn build_partitions(matrix: &ResolvedMatrix, ignored: &BTreeSet<String>) -> Result<Vec<Partition>> {
    matrix
        .sites()
        .enumerate()
        .map(|(site, states)| {
            let partition = Partition::from_states(states, ignored);
            if partition.is_empty() {
                Err(TigerError::EmptySiteAfterFiltering {
                    site,
                    name: matrix.site_name(site).map(str::to_string),
                })
            } else {
                Ok(partition)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states(values: &[&str]) -> Vec<State> {
        values
            .iter()
            .map(|v| match *v {
                "?" => State::Missing,
                label => State::Label(label.to_string()),
            })
            .collect()
    }

    #[test]
    fn test_groups_by_label() {
        let partition = Partition::from_states(&states(&["0", "0", "1", "?", "1"]), &BTreeSet::new());

        assert_eq!(partition.n_blocks(), 2);
        assert_eq!(partition.blocks(), &[vec![0usize, 1], vec![2, 4]][..]);
        assert_eq!(partition.block_of(3), None);
        assert_eq!(partition.block_of(4), Some(1));
    }

    #[test]
    fn test_ignored_labels_become_missing() {
        let ignored: BTreeSet<String> = ["-".to_string()].into_iter().collect();
        let partition = Partition::from_states(&states(&["A", "-", "C", "-"]), &ignored);

        assert_eq!(partition.blocks(), &[vec![0usize], vec![2]][..]);
        assert_eq!(partition.block_of(1), None);
        assert_eq!(partition.block_of(3), None);
    }

    #[test]
    fn test_blocks_are_disjoint() {
        let partition = Partition::from_states(&states(&["a", "b", "a", "c", "b", "a"]), &BTreeSet::new());
        let mut seen = BTreeSet::new();
        for block in partition.blocks() {
            for &taxon in block {
                assert!(seen.insert(taxon));
            }
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_sole_ignored_label_is_fatal() {
        let matrix = ResolvedMatrix::from_sites(
            vec!["A".to_string(), "B".to_string()],
            vec![states(&["0", "1"]), states(&["-", "-"])],
            Some(vec!["first".to_string(), "second".to_string()]),
        )
        .unwrap();
        let ignored: BTreeSet<String> = ["-".to_string()].into_iter().collect();

        match build_partitions(&matrix, &ignored) {
            Err(TigerError::EmptySiteAfterFiltering { site, name }) => {
                assert_eq!(site, 1);
                assert_eq!(name.as_deref(), Some("second"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_all_missing_site_is_fatal() {
        let matrix = ResolvedMatrix::from_sites(
            vec!["A".to_string(), "B".to_string()],
            vec![states(&["?", "?"])],
            None,
        )
        .unwrap();
        assert!(build_partitions(&matrix, &BTreeSet::new()).is_err());
    }
}
