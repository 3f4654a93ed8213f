// agreement.rs - Partition agreement and TIGER rates

use crate::core::partition::Partition;

/// Does `block` (a block of some other character) fit inside one block of `x`?
///
/// Only taxa valid at `x` are considered, so the test is
/// `block ∩ valid_taxa(x) ⊆ X_k` for some block `X_k`. Because blocks of `x`
/// are disjoint this holds exactly when all valid members share one block.
fn block_matches(x: &Partition, block: &[usize]) -> bool {
    if x.is_empty() {
        return false;
    }

    let mut target = None;
    for &taxon in block {
        if let Some(b) = x.block_of(taxon) {
            match target {
                None => target = Some(b),
                Some(t) if t != b => return false,
                Some(_) => {}
            }
        }
    }
    true
}

/// Partition agreement `pa(x, y)`: share of the blocks of `y` that match `x`.
///
/// Asymmetric; a character without blocks on the `y` side scores 0.
pub fn partition_agreement(x: &Partition, y: &Partition) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    let matches = y.blocks().iter().filter(|block| block_matches(x, block)).count();
    matches as f64 / y.n_blocks() as f64
}

/// TIGER rate of character `site`: mean agreement against every other character.
///
/// Callers guarantee at least two partitions.
pub fn tiger_rate(site: usize, partitions: &[Partition]) -> f64 {
    debug_assert!(partitions.len() >= 2, "TIGER rates need at least two characters");

    let x = &partitions[site];
    let total: f64 = partitions
        .iter()
        .enumerate()
        .filter(|(other, _)| *other != site)
        .map(|(_, y)| partition_agreement(x, y))
        .sum();

    total / (partitions.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::matrix::State;
    use std::collections::BTreeSet;

    fn partition(values: &[&str]) -> Partition {
        let states: Vec<State> = values
            .iter()
            .map(|v| match *v {
                "?" => State::Missing,
                label => State::Label(label.to_string()),
            })
            .collect();
        Partition::from_states(&states, &BTreeSet::new())
    }

    #[test]
    fn test_three_taxa_example() {
        // taxa A, B, C
        let site1 = partition(&["0", "0", "1"]);
        let site2 = partition(&["0", "1", "1"]);

        assert_eq!(partition_agreement(&site1, &site2), 0.5);
        assert_eq!(partition_agreement(&site2, &site1), 0.5);

        let partitions = vec![site1, site2];
        assert_eq!(tiger_rate(0, &partitions), 0.5);
        assert_eq!(tiger_rate(1, &partitions), 0.5);
    }

    #[test]
    fn test_identical_partitions_agree() {
        let x = partition(&["a", "a", "b", "c"]);
        let y = partition(&["q", "q", "r", "s"]);
        assert_eq!(partition_agreement(&x, &y), 1.0);
        assert_eq!(partition_agreement(&y, &x), 1.0);
    }

    #[test]
    fn test_agreement_is_asymmetric() {
        // x is coarser than y: every block of y sits inside a block of x
        let x = partition(&["0", "0", "0", "1"]);
        let y = partition(&["0", "0", "1", "2"]);

        assert_eq!(partition_agreement(&x, &y), 1.0);
        // {A, B, C} of x is split by y, {D} is not
        assert_eq!(partition_agreement(&y, &x), 0.5);
    }

    #[test]
    fn test_missing_taxa_are_not_compared() {
        // C is missing at x, so y's block {B, C} only needs B to fit
        let x = partition(&["0", "0", "?", "1"]);
        let y = partition(&["0", "1", "1", "2"]);
        assert_eq!(partition_agreement(&x, &y), 1.0);

        // A block made only of taxa missing at x trivially fits
        let z = partition(&["5", "5", "6", "5"]);
        let w = partition(&["?", "?", "0", "?"]);
        assert_eq!(partition_agreement(&w, &z), 1.0);
    }

    #[test]
    fn test_rates_stay_in_unit_interval() {
        let partitions = vec![
            partition(&["0", "1", "0", "1", "?"]),
            partition(&["0", "0", "1", "1", "1"]),
            partition(&["2", "2", "2", "1", "0"]),
            partition(&["0", "1", "2", "3", "4"]),
        ];

        for site in 0..partitions.len() {
            let rate = tiger_rate(site, &partitions);
            assert!((0.0..=1.0).contains(&rate), "rate {} out of range", rate);
        }
    }
}
