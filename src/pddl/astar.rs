use std::{cmp::Reverse, collections::HashMap, fmt};

use priority_queue::PriorityQueue;
use serde::Deserialize;

use super::action::Operator;
use super::error::{Error, Result};
use super::heuristic::{Heuristic, UNREACHABLE};
use super::problem::Problem;
use super::state::State;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Orders the frontier by g + h.
    Astar,
    /// Orders the frontier by h alone.
    GreedyBestFirst,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Astar
    }
}

pub struct Solution<'a> {
    pub plan: Vec<&'a Operator>,
    pub expansions: usize,
    pub generated: usize,
    pub goal_tests: usize,
}

impl Solution<'_> {
    pub fn cost(&self) -> usize {
        self.plan.len()
    }
}

impl fmt::Display for Solution<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Expansions: {} Goal tests: {} New nodes: {}", self.expansions, self.goal_tests, self.generated)?;
        writeln!(f, "Plan length: {}", self.cost())?;
        for action in &self.plan {
            writeln!(f, "\t{}", action)?;
        }
        Ok(())
    }
}

fn reconstruct_path<'a>(problem: &'a Problem, came_from: &HashMap<State, (State, usize)>, current: &State) -> Vec<&'a Operator> {
    let mut total_path = Vec::new();
    let mut current = current;
    while let Some((previous, action)) = came_from.get(current) {
        total_path.push(&problem.actions()[*action]);
        current = previous;
    }
    total_path.reverse();
    total_path
}

pub fn astar<'a>(problem: &'a Problem, heuristic: Heuristic, limit: Option<usize>) -> Result<Option<Solution<'a>>> {
    search(problem, Strategy::Astar, heuristic, limit)
}

pub fn greedy_best_first<'a>(problem: &'a Problem, heuristic: Heuristic, limit: Option<usize>) -> Result<Option<Solution<'a>>> {
    search(problem, Strategy::GreedyBestFirst, heuristic, limit)
}

/// Best-first search from the initial state. Unit action cost; states whose
/// estimate is [`UNREACHABLE`] are never queued. `Ok(None)` when the reachable
/// space holds no goal.
pub fn search<'a>(problem: &'a Problem, strategy: Strategy, heuristic: Heuristic, limit: Option<usize>) -> Result<Option<Solution<'a>>> {
    let priority = |g: usize, h: usize| match strategy {
        Strategy::Astar => Reverse((g.saturating_add(h), h)),
        Strategy::GreedyBestFirst => Reverse((h, g)),
    };
    let start = problem.initial_state().clone();
    let mut open_set = PriorityQueue::new();
    let mut came_from: HashMap<State, (State, usize)> = HashMap::new();
    let mut g_score: HashMap<State, usize> = HashMap::new();
    let (mut expansions, mut generated, mut goal_tests) = (0, 0, 0);

    let start_cost = problem.heuristic(heuristic, &start);
    if start_cost == UNREACHABLE {
        return Ok(None);
    }
    open_set.push(start.clone(), priority(0, start_cost));
    g_score.insert(start, 0);

    while let Some((current, _)) = open_set.pop() {
        goal_tests += 1;
        if problem.is_goal(&current)? {
            let plan = reconstruct_path(problem, &came_from, &current);
            tracing::debug!("{:?} with {} found a plan of length {} after {} expansions", strategy, heuristic, plan.len(), expansions);
            return Ok(Some(Solution { plan, expansions, generated, goal_tests }));
        }
        expansions += 1;
        if let Some(limit) = limit {
            if expansions > limit {
                return Err(Error::ExpansionLimit { limit });
            }
        }
        let g = g_score[&current];
        for action in problem.applicable_actions(&current)? {
            let next = problem.apply(&current, action)?;
            generated += 1;
            let tentative_g_score = g + 1;
            if g_score.get(&next).map_or(true, |known| tentative_g_score < *known) {
                let estimate = problem.heuristic(heuristic, &next);
                if estimate == UNREACHABLE {
                    tracing::trace!("Dead end after {}", action);
                    continue;
                }
                came_from.insert(next.clone(), (current.clone(), action.id));
                g_score.insert(next.clone(), tentative_g_score);
                open_set.push(next, priority(tentative_g_score, estimate));
            }
        }
    }
    tracing::debug!("{:?} with {} exhausted the search space after {} expansions", strategy, heuristic, expansions);
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pddl::instances;

    fn replay(problem: &Problem, solution: &Solution) -> State {
        solution.plan.iter().fold(problem.initial_state().clone(), |state, action| {
            problem.apply(&state, action).unwrap()
        })
    }

    #[test]
    fn test_astar_constant_p1() {
        let p = instances::air_cargo_p1().unwrap();
        let solution = astar(&p, Heuristic::Constant, None).unwrap().unwrap();
        assert_eq!(solution.cost(), 6);
        assert!(p.is_goal(&replay(&p, &solution)).unwrap());
    }

    #[test]
    fn test_astar_ignore_preconditions_p1() {
        let p = instances::air_cargo_p1().unwrap();
        let solution = astar(&p, Heuristic::IgnorePreconditions, None).unwrap().unwrap();
        assert_eq!(solution.cost(), 6);
        assert!(p.is_goal(&replay(&p, &solution)).unwrap());
    }

    #[test]
    fn test_astar_level_sum_p1() {
        let p = instances::air_cargo_p1().unwrap();
        let solution = astar(&p, Heuristic::LevelSum, None).unwrap().unwrap();
        assert!(p.is_goal(&replay(&p, &solution)).unwrap());
        assert_eq!(solution.cost(), 6);
    }

    #[test]
    fn test_greedy_p1() {
        let p = instances::air_cargo_p1().unwrap();
        let solution = greedy_best_first(&p, Heuristic::IgnorePreconditions, None).unwrap().unwrap();
        assert!(p.is_goal(&replay(&p, &solution)).unwrap());
        assert!(solution.goal_tests >= solution.expansions);
    }

    #[test]
    fn test_expansion_limit() {
        let p = instances::air_cargo_p1().unwrap();
        assert!(matches!(
            astar(&p, Heuristic::Constant, Some(1)),
            Err(Error::ExpansionLimit { limit: 1 })
        ));
    }

    #[test]
    fn test_display() {
        let p = instances::air_cargo_p1().unwrap();
        let text = astar(&p, Heuristic::Constant, None).unwrap().unwrap().to_string();
        assert!(text.contains("Plan length: 6"));
        assert!(text.starts_with("Expansions: "));
        assert_eq!(text.lines().filter(|l| l.starts_with('\t')).count(), 6);
    }
}
