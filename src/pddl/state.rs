use std::collections::{HashMap, HashSet};
use std::fmt;

use super::error::{Error, Result};
use super::fluent::FluentState;
use super::predicate::Proposition;

/// Fluent vocabulary: ordered propositions with a stable index each.
/// The index of a proposition is its position in every [`State`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FluentMap {
    fluents: Vec<Proposition>,
    mapping: HashMap<Proposition, usize>,
}

impl FluentMap {
    pub fn new(fluents: Vec<Proposition>) -> Result<Self> {
        let mut mapping = HashMap::with_capacity(fluents.len());
        for (idx, fluent) in fluents.iter().enumerate() {
            if mapping.insert(fluent.clone(), idx).is_some() {
                return Err(Error::DuplicateProposition { proposition: fluent.clone() });
            }
        }
        Ok(Self { fluents, mapping })
    }

    /// Initial positives followed by initial negatives.
    pub fn from_fluent_state(initial: &FluentState) -> Result<Self> {
        Self::new(initial.propositions().cloned().collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fluents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fluents.is_empty()
    }

    pub fn index_of(&self, proposition: &Proposition) -> Result<usize> {
        self.mapping
            .get(proposition)
            .copied()
            .ok_or_else(|| Error::UnknownProposition { proposition: proposition.clone() })
    }

    pub fn indices_of(&self, propositions: &[Proposition]) -> Result<Vec<usize>> {
        propositions.iter().map(|p| self.index_of(p)).collect()
    }

    pub fn contains(&self, proposition: &Proposition) -> bool {
        self.mapping.contains_key(proposition)
    }

    pub fn get(&self, idx: usize) -> Option<&Proposition> {
        self.fluents.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Proposition> {
        self.fluents.iter()
    }
}

impl std::ops::Index<usize> for FluentMap {
    type Output = Proposition;

    fn index(&self, index: usize) -> &Self::Output {
        &self.fluents[index]
    }
}

/// Boolean fluent vector. Position `i` is true iff fluent `i` of the
/// owning [`FluentMap`] holds. States are never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State {
    data: Vec<bool>,
}

impl std::ops::Index<usize> for State {
    type Output = bool;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl From<Vec<bool>> for State {
    fn from(data: Vec<bool>) -> Self {
        Self { data }
    }
}

impl State {
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn holds(&self, idx: usize) -> bool {
        self.data.get(idx).copied().unwrap_or(false)
    }

    pub fn all(&self, indices: &[usize]) -> bool {
        indices.iter().all(|idx| self.holds(*idx))
    }

    pub fn none(&self, indices: &[usize]) -> bool {
        indices.iter().all(|idx| !self.holds(*idx))
    }

    pub fn bits(&self) -> &[bool] {
        &self.data
    }

    pub fn check_size(&self, map: &FluentMap) -> Result<()> {
        if self.len() == map.len() {
            Ok(())
        } else {
            Err(Error::StateSizeMismatch { expected: map.len(), found: self.len() })
        }
    }

    /// Copy of this state with `deleted` forced false, then `added` forced true.
    pub fn successor(&self, deleted: &[usize], added: &[usize]) -> State {
        let mut data = self.data.clone();
        for idx in deleted {
            data[*idx] = false;
        }
        for idx in added {
            data[*idx] = true;
        }
        State { data }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for b in &self.data {
            write!(f, "{}", if *b { 'T' } else { 'F' })?;
        }
        Ok(())
    }
}

/// Encodes a fluent state as a boolean vector over `map`.
pub fn encode(fs: &FluentState, map: &FluentMap) -> Result<State> {
    for proposition in fs.propositions() {
        map.index_of(proposition)?;
    }
    let positive: HashSet<&Proposition> = fs.pos.iter().collect();
    if let Some(both) = fs.neg.iter().find(|p| positive.contains(p)) {
        return Err(Error::DuplicateProposition { proposition: both.clone() });
    }
    Ok(State {
        data: map.iter().map(|fluent| positive.contains(fluent)).collect(),
    })
}

/// Partitions the fluents of `map` by their value in `state`.
pub fn decode(state: &State, map: &FluentMap) -> Result<FluentState> {
    state.check_size(map)?;
    let (pos, neg): (Vec<_>, Vec<_>) = map.iter().zip(state.data.iter()).partition(|(_, b)| **b);
    Ok(FluentState::new(
        pos.into_iter().map(|(p, _)| p.clone()).collect(),
        neg.into_iter().map(|(p, _)| p.clone()).collect(),
    ))
}
