use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;

use super::problem::Problem;
use super::state::State;

/// Estimate returned when some goal proposition can never be reached.
pub const UNREACHABLE: usize = usize::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// Always 1. Not a real heuristic, a baseline for uninformed search.
    Constant,
    /// Sum of the first planning graph level of every goal proposition.
    LevelSum,
    /// Actions needed to cover the unsatisfied goals when no action has preconditions.
    IgnorePreconditions,
}

impl Default for Heuristic {
    fn default() -> Self {
        Heuristic::LevelSum
    }
}

impl Heuristic {
    /// Estimators worth memoizing per state.
    pub fn is_cached(&self) -> bool {
        !matches!(self, Heuristic::Constant)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Heuristic::Constant => "h_1",
            Heuristic::LevelSum => "h_pg_levelsum",
            Heuristic::IgnorePreconditions => "h_ignore_preconditions",
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub fn constant(_: &State) -> usize {
    1
}

/// Greedy cover of the unsatisfied goals by add lists. One action is counted
/// once however many goals it establishes. Ties go to the lowest operator id.
pub fn ignore_preconditions(problem: &Problem, state: &State) -> usize {
    let mut remaining: BTreeSet<usize> = problem
        .goal_indices()
        .iter()
        .copied()
        .filter(|idx| !state.holds(*idx))
        .collect();
    let mut count = 0;
    while !remaining.is_empty() {
        let best = problem
            .actions()
            .iter()
            .map(|op| (op.add.iter().filter(|idx| remaining.contains(*idx)).count(), op))
            .filter(|(covered, _)| *covered > 0)
            .max_by(|(l, lop), (r, rop)| l.cmp(r).then(rop.id.cmp(&lop.id)));
        match best {
            Some((_, op)) => {
                for idx in &op.add {
                    remaining.remove(idx);
                }
                count += 1;
            }
            None => return UNREACHABLE,
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pddl::{instances, Action, AirCargoDomain, FluentState, Problem};
    use crate::prop;

    #[test]
    fn test_constant() {
        let p = instances::air_cargo_p1().unwrap();
        assert_eq!(p.heuristic(Heuristic::Constant, p.initial_state()), 1);
    }

    #[test]
    fn test_ignore_preconditions_counts_open_goals() {
        let p = instances::air_cargo_p1().unwrap();
        assert_eq!(ignore_preconditions(&p, p.initial_state()), 2);
        let p3 = instances::air_cargo_p3().unwrap();
        assert_eq!(ignore_preconditions(&p3, p3.initial_state()), 4);
    }

    #[test]
    fn test_ignore_preconditions_zero_at_goal() {
        let p = instances::air_cargo_p1().unwrap();
        let goal = p.encode(&FluentState::new(
            vec![prop!(At, C1, JFK), prop!(At, C2, SFO), prop!(At, P1, SFO), prop!(At, P2, JFK)],
            vec![],
        )).unwrap();
        assert!(p.is_goal(&goal).unwrap());
        assert_eq!(ignore_preconditions(&p, &goal), 0);
    }

    #[test]
    fn test_ignore_preconditions_shared_achiever() {
        // One extra action establishes both goals at once.
        let domain = AirCargoDomain::new(&["C1", "C2"], &["P1"], &["JFK", "SFO"]).unwrap();
        let initial = FluentState::new(
            vec![prop!(At, C1, SFO), prop!(At, C2, SFO), prop!(At, P1, SFO)],
            domain.propositions().into_iter()
                .filter(|p| ![prop!(At, C1, SFO), prop!(At, C2, SFO), prop!(At, P1, SFO)].contains(p))
                .collect(),
        );
        let both = Action::new("Teleport", &["C1", "C2", "JFK"])
            .adds(prop!(At, C1, JFK))
            .adds(prop!(At, C2, JFK));
        let p = Problem::builder(domain, initial, vec![prop!(At, C1, JFK), prop!(At, C2, JFK)])
            .extra_action(both)
            .build()
            .unwrap();
        assert_eq!(ignore_preconditions(&p, p.initial_state()), 1);
    }

    #[test]
    fn test_unreachable_goal() {
        let domain = AirCargoDomain::new(&["C1"], &["P1"], &["JFK"]).unwrap();
        let initial = FluentState::new(vec![prop!(At, C1, JFK), prop!(At, P1, JFK)], vec![prop!(In, C1, P1)]);
        let p = Problem::new(domain, initial, vec![prop!(At, C1, JFK)]).unwrap();
        assert_eq!(ignore_preconditions(&p, p.initial_state()), 0);
        // Nothing adds At(P1, JFK) once it is gone, there is a single airport.
        let p = Problem::new(
            AirCargoDomain::new(&["C1"], &["P1"], &["JFK"]).unwrap(),
            FluentState::new(vec![prop!(At, C1, JFK)], vec![prop!(At, P1, JFK), prop!(In, C1, P1)]),
            vec![prop!(At, P1, JFK)],
        ).unwrap();
        assert_eq!(ignore_preconditions(&p, p.initial_state()), UNREACHABLE);
    }
}
