pub mod action;
pub mod astar;
pub mod domain;
pub mod error;
pub mod fluent;
pub mod heuristic;
pub mod instances;
pub mod planning_graph;
pub mod predicate;
pub mod problem;
pub mod state;

mod utils;

pub use action::{Action, Operator};
pub use domain::{AirCargoDomain, Schema};
pub use error::{Error, Result};
pub use fluent::FluentState;
pub use heuristic::{Heuristic, UNREACHABLE};
pub use predicate::{Predicate, Proposition};
pub use problem::{Problem, ProblemBuilder};
pub use state::{FluentMap, State};
