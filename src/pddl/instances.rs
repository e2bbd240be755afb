//! The three air cargo problems, from two cargos up to four.

use super::domain::AirCargoDomain;
use super::error::Result;
use super::fluent::FluentState;
use super::predicate::Proposition;
use super::problem::{Problem, ProblemBuilder};
use crate::prop;

pub fn air_cargo_p1() -> Result<Problem> {
    p1()?.build()
}

pub fn air_cargo_p2() -> Result<Problem> {
    p2()?.build()
}

pub fn air_cargo_p3() -> Result<Problem> {
    p3()?.build()
}

fn p1() -> Result<ProblemBuilder> {
    let domain = AirCargoDomain::new(&["C1", "C2"], &["P1", "P2"], &["JFK", "SFO"])?;
    let pos = vec![
        prop!(At, C1, SFO),
        prop!(At, C2, JFK),
        prop!(At, P1, SFO),
        prop!(At, P2, JFK),
    ];
    let neg = vec![
        prop!(At, C2, SFO),
        prop!(In, C2, P1),
        prop!(In, C2, P2),
        prop!(At, C1, JFK),
        prop!(In, C1, P1),
        prop!(In, C1, P2),
        prop!(At, P1, JFK),
        prop!(At, P2, SFO),
    ];
    let goal = vec![prop!(At, C1, JFK), prop!(At, C2, SFO)];
    Ok(Problem::builder(domain, FluentState::new(pos, neg), goal))
}

fn p2() -> Result<ProblemBuilder> {
    let domain = AirCargoDomain::new(&["C1", "C2", "C3"], &["P1", "P2", "P3"], &["JFK", "SFO", "ATL"])?;
    let at = [("C1", "SFO"), ("C2", "JFK"), ("C3", "ATL"), ("P1", "SFO"), ("P2", "JFK"), ("P3", "ATL")];
    let goal = [("C1", "JFK"), ("C2", "SFO"), ("C3", "SFO")];
    Ok(problem(domain, &at, &[], &goal))
}

fn p3() -> Result<ProblemBuilder> {
    let domain = AirCargoDomain::new(&["C1", "C2", "C3", "C4"], &["P1", "P2"], &["JFK", "SFO", "ATL", "ORD"])?;
    let at = [("C1", "SFO"), ("C2", "JFK"), ("C3", "ATL"), ("C4", "ORD"), ("P1", "SFO"), ("P2", "JFK")];
    let goal = [("C1", "JFK"), ("C2", "SFO"), ("C3", "JFK"), ("C4", "SFO")];
    Ok(problem(domain, &at, &[], &goal))
}

/// Problem whose negatives are every other proposition the objects can form.
pub fn problem(
    domain: AirCargoDomain,
    positive_at: &[(&str, &str)],
    positive_in: &[(&str, &str)],
    goal_at: &[(&str, &str)],
) -> ProblemBuilder {
    let pos = expressions(positive_at, positive_in);
    let neg = domain.propositions().into_iter().filter(|p| !pos.contains(p)).collect();
    let goal = expressions(goal_at, &[]);
    Problem::builder(domain, FluentState::new(pos, neg), goal)
}

fn expressions(at: &[(&str, &str)], inside: &[(&str, &str)]) -> Vec<Proposition> {
    at.iter()
        .map(|(o, a)| Proposition::at(o, a))
        .chain(inside.iter().map(|(c, p)| Proposition::inside(c, p)))
        .collect()
}

/// Fixture by name: `p1`, `p2` or `p3`.
pub fn by_name(name: &str, cache_capacity: u64) -> Option<Result<Problem>> {
    let builder = match name {
        "p1" => p1(),
        "p2" => p2(),
        "p3" => p3(),
        _ => return None,
    };
    Some(builder.and_then(|b| b.cache_capacity(cache_capacity).build()))
}
