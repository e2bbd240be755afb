use std::borrow::Cow;
use std::fmt;

use moka::sync::Cache;

use super::action::{Action, Operator};
use super::domain::AirCargoDomain;
use super::error::{Error, Result};
use super::fluent::FluentState;
use super::heuristic::{self, Heuristic};
use super::planning_graph::PlanningGraph;
use super::predicate::Proposition;
use super::state::{self, FluentMap, State};
use super::utils::join;

pub const DEFAULT_CACHE_CAPACITY: u64 = 8192;

/// Air cargo problem instance. Built once, then shared read-only by the search.
pub struct Problem {
    domain: AirCargoDomain,
    fluents: FluentMap,
    operators: Vec<Operator>,
    initial: State,
    goal: Vec<Proposition>,
    goal_indices: Vec<usize>,
    cache: Cache<(Heuristic, State), usize>,
}

pub struct ProblemBuilder {
    domain: AirCargoDomain,
    initial: FluentState,
    goal: Vec<Proposition>,
    extra_actions: Vec<Action>,
    cache_capacity: u64,
}

impl ProblemBuilder {
    pub fn cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Concrete action added after the grounded schemas, with the next free
    /// operator id. Used for actions outside Load/Unload/Fly, such as a
    /// transfer that moves several cargos at once; its propositions must
    /// already be part of the initial state's vocabulary.
    pub fn extra_action(mut self, action: Action) -> Self {
        self.extra_actions.push(action);
        self
    }

    pub fn build(self) -> Result<Problem> {
        let fluents = FluentMap::from_fluent_state(&self.initial)?;
        let initial = state::encode(&self.initial, &fluents)?;
        let goal_indices = fluents.indices_of(&self.goal)?;
        let operators = self
            .domain
            .ground()?
            .into_iter()
            .chain(self.extra_actions.into_iter())
            .enumerate()
            .map(|(id, action)| Operator::bind(id, action, &fluents))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(
            "Problem has {} fluents, {} operators and {} goals",
            fluents.len(), operators.len(), goal_indices.len()
        );
        Ok(Problem {
            domain: self.domain,
            fluents,
            operators,
            initial,
            goal: self.goal,
            goal_indices,
            cache: Cache::new(self.cache_capacity),
        })
    }
}

impl Problem {
    pub fn new(domain: AirCargoDomain, initial: FluentState, goal: Vec<Proposition>) -> Result<Self> {
        Self::builder(domain, initial, goal).build()
    }

    pub fn builder(domain: AirCargoDomain, initial: FluentState, goal: Vec<Proposition>) -> ProblemBuilder {
        ProblemBuilder {
            domain,
            initial,
            goal,
            extra_actions: Vec::new(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }

    pub fn domain(&self) -> &AirCargoDomain {
        &self.domain
    }

    pub fn fluents(&self) -> &FluentMap {
        &self.fluents
    }

    /// Every grounded action, indexed by [`Operator::id`].
    pub fn actions(&self) -> &[Operator] {
        &self.operators
    }

    pub fn initial_state(&self) -> &State {
        &self.initial
    }

    pub fn goal(&self) -> &[Proposition] {
        &self.goal
    }

    pub fn goal_indices(&self) -> &[usize] {
        &self.goal_indices
    }

    pub fn encode(&self, fs: &FluentState) -> Result<State> {
        state::encode(fs, &self.fluents)
    }

    pub fn decode(&self, state: &State) -> Result<FluentState> {
        state::decode(state, &self.fluents)
    }

    /// Actions whose positive preconditions all hold and negative ones all fail.
    pub fn applicable_actions(&self, state: &State) -> Result<Vec<&Operator>> {
        state.check_size(&self.fluents)?;
        Ok(self.operators.iter().filter(|op| op.is_applicable(state)).collect())
    }

    /// Successor of `state` under `action`. Operators of another problem are
    /// rebound to this problem's fluents first.
    pub fn apply(&self, state: &State, action: &Operator) -> Result<State> {
        state.check_size(&self.fluents)?;
        let op = match self.operators.get(action.id) {
            Some(own) if std::ptr::eq(own, action) || own == action => Cow::Borrowed(own),
            _ => Cow::Owned(Operator::bind(action.id, action.action().clone(), &self.fluents)?),
        };
        if !op.is_applicable(state) {
            return Err(Error::InapplicableAction { action: action.to_string() });
        }
        Ok(op.successor(state))
    }

    pub fn is_goal(&self, state: &State) -> Result<bool> {
        state.check_size(&self.fluents)?;
        Ok(state.all(&self.goal_indices))
    }

    /// Heuristic estimate for `state`, memoized for the cached estimators.
    pub fn heuristic(&self, h: Heuristic, state: &State) -> usize {
        if !h.is_cached() {
            return self.estimate(h, state);
        }
        self.cache.get_with((h, state.clone()), || self.estimate(h, state))
    }

    pub fn cached_estimate(&self, h: Heuristic, state: &State) -> Option<usize> {
        self.cache.get(&(h, state.clone()))
    }

    pub fn clear_heuristic_cache(&self) {
        self.cache.invalidate_all();
    }

    fn estimate(&self, h: Heuristic, state: &State) -> usize {
        match h {
            Heuristic::Constant => heuristic::constant(state),
            Heuristic::LevelSum => PlanningGraph::new(self, state)
                .level_sum()
                .unwrap_or(heuristic::UNREACHABLE),
            Heuristic::IgnorePreconditions => heuristic::ignore_preconditions(self, state),
        }
    }
}

impl fmt::Debug for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Problem({:?}):", self.domain)?;
        writeln!(f, "Fluents: {}", join(&self.fluents.iter().collect::<Vec<_>>(), ", "))?;
        writeln!(f, "Initial state: {}", self.initial)?;
        writeln!(f, "Goal: {}", join(&self.goal, " & "))?;
        writeln!(f, "Operators: {}", self.operators.len())
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let objects = self.domain.objects().fold(String::new(), |acc, item| acc + " " + item);
        let init = self.fluents.iter().enumerate()
            .filter(|(idx, _)| self.initial[*idx])
            .fold(String::new(), |acc, (_, p)| acc + " " + &p.to_pddl());
        let goal = self.goal.iter().fold(String::new(), |acc, p| acc + " " + &p.to_pddl());
        write!(f, "(define (problem air-cargo)\n (:domain air-cargo)\n (:objects{})\n (:init{})\n (:goal (and{}))\n)",
            objects, init, goal)
    }
}
