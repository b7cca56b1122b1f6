//! Density and uniqueness checks over a sibling set.

use std::collections::BTreeMap;

use crate::types::{Ordinal, Sibling};

/// What is wrong with a sibling set, if anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Audit {
    /// Ordinals held by more than one sibling.
    pub duplicates: Vec<Ordinal>,
    /// Ordinals in `0..N` that no sibling holds.
    pub gaps: Vec<Ordinal>,
}

impl Audit {
    pub fn is_dense(&self) -> bool {
        self.duplicates.is_empty() && self.gaps.is_empty()
    }
}

pub fn audit<I>(ordinals: I) -> Audit
where
    I: IntoIterator<Item = Ordinal>,
{
    let mut seen: BTreeMap<Ordinal, usize> = BTreeMap::new();
    let mut total = 0usize;
    for ordinal in ordinals {
        *seen.entry(ordinal).or_default() += 1;
        total += 1;
    }

    let duplicates = seen
        .iter()
        .filter(|(_, n)| **n > 1)
        .map(|(o, _)| *o)
        .collect();
    let gaps = (0..total)
        .map(Ordinal::from_index)
        .filter(|o| !seen.contains_key(o))
        .collect();

    Audit { duplicates, gaps }
}

pub fn audit_siblings(siblings: &[Sibling]) -> Audit {
    audit(siblings.iter().map(|s| s.ordinal))
}
