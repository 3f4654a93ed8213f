// synonyms.rs - Resolution of ambiguous (polymorphic/synonymous) cells

use crate::data::matrix::{RawMatrix, ResolvedMatrix, State, StateValue};
use crate::error::TigerError;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display};
use std::str::FromStr;

/// How a cell with several candidate labels is reduced to one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynonymStrategy {
    /// Uniformly random candidate per cell
    Random,
    /// Greedily merge into already attested classes
    Minimum,
    /// Greedily prefer classes not yet attested
    Maximum,
}

impl FromStr for SynonymStrategy {
    type Err = TigerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(SynonymStrategy::Random),
            "minimum" | "min" => Ok(SynonymStrategy::Minimum),
            "maximum" | "max" => Ok(SynonymStrategy::Maximum),
            _ => Err(TigerError::InvalidArgument(format!(
                "Invalid synonym strategy: {}. Use: random, minimum, maximum",
                s
            ))),
        }
    }
}

impl Display for SynonymStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SynonymStrategy::Random => "random",
            SynonymStrategy::Minimum => "minimum",
            SynonymStrategy::Maximum => "maximum",
        };
        write!(f, "{}", name)
    }
}

impl SynonymStrategy {
    pub fn description(&self) -> &str {
        match self {
            SynonymStrategy::Random => "random candidate per cell",
            SynonymStrategy::Minimum => "minimise the number of states per character",
            SynonymStrategy::Maximum => "maximise the number of states per character",
        }
    }
}

/// Turns a raw matrix into a resolved one, once for the whole run.
#[derive(Debug, Clone)]
pub struct SynonymResolver {
    strategy: SynonymStrategy,
    seed: Option<u64>,
}

impl SynonymResolver {
    pub fn new(strategy: SynonymStrategy) -> Self {
        Self { strategy, seed: None }
    }

    /// Fix the random generator so `random` resolution is reproducible
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn strategy(&self) -> SynonymStrategy {
        self.strategy
    }

    pub fn resolve(&self, matrix: RawMatrix) -> ResolvedMatrix {
        match self.strategy {
            SynonymStrategy::Random => {
                let mut rng = match self.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_os_rng(),
                };
                matrix.map_sites(|_, sites| {
                    sites
                        .into_iter()
                        .map(|column| column.into_iter().map(|cell| resolve_random(cell, &mut rng)).collect())
                        .collect()
                })
            }
            SynonymStrategy::Minimum | SynonymStrategy::Maximum => {
                let minimise = self.strategy == SynonymStrategy::Minimum;
                matrix.map_sites(|_, sites| {
                    sites
                        .into_iter()
                        .map(|column| resolve_site_greedy(column, minimise))
                        .collect()
                })
            }
        }
    }
}

/// Cells with at most one candidate resolve without a strategy.
fn resolve_easy(cell: &StateValue) -> Option<State> {
    match cell {
        StateValue::Definite(label) => Some(State::Label(label.clone())),
        StateValue::Missing => Some(State::Missing),
        StateValue::Ambiguous(set) => match set.len() {
            0 => Some(State::Missing),
            1 => set.iter().next().map(|label| State::Label(label.clone())),
            _ => None,
        },
    }
}

fn resolve_random(cell: StateValue, rng: &mut StdRng) -> State {
    if let Some(state) = resolve_easy(&cell) {
        return state;
    }
    let candidates = cell.candidates();
    candidates
        .choose(rng)
        .map(|label| State::Label(label.to_string()))
        .unwrap_or(State::Missing)
}

/// Greedy consolidation of one character.
///
/// Unambiguous taxa are settled first and seed the attested set. Each ambiguous
/// taxon then scans its candidates ordered by (frequency, label), descending when
/// minimising and ascending when maximising, and takes the first one whose
/// attested status matches the goal, falling back to the head of that order.
/// The missing marker is never a candidate, so it never counts as attested.
fn resolve_site_greedy(column: Vec<StateValue>, minimise: bool) -> Vec<State> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for cell in &column {
        for label in cell.candidates() {
            *counts.entry(label).or_insert(0) += 1;
        }
    }

    let mut resolved: Vec<Option<State>> = column.iter().map(resolve_easy).collect();
    let mut attested: HashSet<String> = resolved
        .iter()
        .flatten()
        .filter_map(|state| state.as_label().map(str::to_string))
        .collect();

    for (cell, slot) in column.iter().zip(resolved.iter_mut()) {
        if slot.is_some() {
            continue;
        }

        let mut options: Vec<(usize, &str)> = cell
            .candidates()
            .into_iter()
            .map(|label| (counts.get(label).copied().unwrap_or(0), label))
            .collect();
        options.sort_unstable();
        if minimise {
            options.reverse();
        }

        let chosen = options
            .iter()
            .find(|(_, label)| attested.contains(*label) == minimise)
            .or_else(|| options.first())
            .map(|(_, label)| label.to_string());

        *slot = Some(match chosen {
            Some(label) => {
                attested.insert(label.clone());
                State::Label(label)
            }
            None => State::Missing,
        });
    }

    resolved
        .into_iter()
        .map(|state| state.unwrap_or(State::Missing))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn cell(labels: &[&str]) -> StateValue {
        StateValue::Ambiguous(labels.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>())
    }

    fn single_site(cells: Vec<StateValue>) -> RawMatrix {
        let taxa = (0..cells.len()).map(|i| format!("T{}", i)).collect();
        RawMatrix::from_sites(taxa, vec![cells], None).unwrap()
    }

    fn label(s: &str) -> State {
        State::Label(s.to_string())
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("random".parse::<SynonymStrategy>().unwrap(), SynonymStrategy::Random);
        assert_eq!("MINIMUM".parse::<SynonymStrategy>().unwrap(), SynonymStrategy::Minimum);
        assert_eq!("max".parse::<SynonymStrategy>().unwrap(), SynonymStrategy::Maximum);
        assert!("median".parse::<SynonymStrategy>().is_err());
        assert_eq!(SynonymStrategy::Maximum.to_string(), "maximum");
    }

    #[test]
    fn test_easy_cells() {
        let matrix = single_site(vec![
            cell(&[]),
            cell(&["a"]),
            StateValue::Definite("b".to_string()),
            StateValue::Missing,
        ]);

        for strategy in [SynonymStrategy::Random, SynonymStrategy::Minimum, SynonymStrategy::Maximum] {
            let resolved = SynonymResolver::new(strategy).resolve(matrix.clone());
            assert_eq!(
                resolved.site(0),
                &[State::Missing, label("a"), label("b"), State::Missing]
            );
        }
    }

    #[test]
    fn test_minimum_tie_is_stable() {
        // A={x}, B={x,y}, C={y}: both candidates attested with equal counts
        let matrix = single_site(vec![cell(&["x"]), cell(&["x", "y"]), cell(&["y"])]);
        let resolver = SynonymResolver::new(SynonymStrategy::Minimum);

        let first = resolver.resolve(matrix.clone());
        assert_eq!(first.site(0), &[label("x"), label("y"), label("y")]);
        for _ in 0..5 {
            assert_eq!(resolver.resolve(matrix.clone()), first);
        }
    }

    #[test]
    fn test_minimum_prefers_attested() {
        // "z" is more frequent but only "x" is attested by an easy taxon
        let matrix = single_site(vec![
            cell(&["x"]),
            cell(&["x", "z"]),
            cell(&["z", "w"]),
            cell(&["z", "v"]),
        ]);
        let resolved = SynonymResolver::new(SynonymStrategy::Minimum).resolve(matrix);

        // T1 joins "x"; T2 finds nothing attested and falls back to the most frequent "z";
        // T3 then joins the now attested "z"
        assert_eq!(resolved.site(0), &[label("x"), label("x"), label("z"), label("z")]);
    }

    #[test]
    fn test_maximum_prefers_unattested() {
        let matrix = single_site(vec![cell(&["x"]), cell(&["x", "y"]), cell(&["x", "y"])]);
        let resolved = SynonymResolver::new(SynonymStrategy::Maximum).resolve(matrix);

        // T1 picks the unattested "y"; T2 has nothing new left and falls back to the
        // least frequent candidate, "y" (count 2) before "x" (count 3)
        assert_eq!(resolved.site(0), &[label("x"), label("y"), label("y")]);
    }

    #[test]
    fn test_maximum_fallback_on_tie() {
        let matrix = single_site(vec![cell(&["x"]), cell(&["x", "y"]), cell(&["y"])]);
        let resolved = SynonymResolver::new(SynonymStrategy::Maximum).resolve(matrix);
        assert_eq!(resolved.site(0), &[label("x"), label("x"), label("y")]);
    }

    #[test]
    fn test_random_picks_a_candidate() {
        let matrix = single_site(vec![cell(&["a", "b", "c"]); 20]);
        let resolved = SynonymResolver::new(SynonymStrategy::Random)
            .with_seed(Some(7))
            .resolve(matrix.clone());

        for state in resolved.site(0) {
            assert!(matches!(state.as_label(), Some("a" | "b" | "c")));
        }

        let again = SynonymResolver::new(SynonymStrategy::Random)
            .with_seed(Some(7))
            .resolve(matrix);
        assert_eq!(resolved, again);
    }
}
