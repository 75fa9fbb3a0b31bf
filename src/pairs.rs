use crate::error::{MdError, Result};
use itertools::Itertools;

/// The fixed set of unordered atom pairs `(i, j)` with `i < j`.
///
/// Built once per simulation. The order is lexicographic and never changes,
/// so per-pair quantities can be matched back to their pair by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairList {
    n_atoms: usize,
    pairs: Vec<(usize, usize)>,
}

impl PairList {
    pub fn new(n_atoms: usize) -> Result<Self> {
        if n_atoms < 2 {
            return Err(MdError::Config(format!(
                "at least 2 atoms are required to form pairs, got {}",
                n_atoms
            )));
        }
        let pairs: Vec<(usize, usize)> = (0..n_atoms).tuple_combinations().collect();
        debug_assert_eq!(pairs.len(), n_atoms * (n_atoms - 1) / 2);
        Ok(PairList { n_atoms, pairs })
    }

    pub fn n_atoms(&self) -> usize {
        self.n_atoms
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(usize, usize)> {
        self.pairs.iter()
    }

    pub fn as_slice(&self) -> &[(usize, usize)] {
        &self.pairs
    }
}
