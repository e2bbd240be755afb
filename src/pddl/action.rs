use std::fmt;

use super::error::Result;
use super::predicate::Proposition;
use super::state::{FluentMap, State};
use super::utils::join;

/// Concrete action: no variables left, every condition is a ground proposition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Action {
    pub name: String,
    pub args: Vec<String>,
    pub precond_pos: Vec<Proposition>,
    pub precond_neg: Vec<Proposition>,
    pub effect_add: Vec<Proposition>,
    pub effect_rem: Vec<Proposition>,
}

impl Action {
    pub fn new(name: &str, args: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            precond_pos: Vec::new(),
            precond_neg: Vec::new(),
            effect_add: Vec::new(),
            effect_rem: Vec::new(),
        }
    }

    pub fn requires(mut self, proposition: Proposition) -> Self {
        self.precond_pos.push(proposition);
        self
    }

    pub fn forbids(mut self, proposition: Proposition) -> Self {
        self.precond_neg.push(proposition);
        self
    }

    pub fn adds(mut self, proposition: Proposition) -> Self {
        self.effect_add.push(proposition);
        self
    }

    pub fn removes(mut self, proposition: Proposition) -> Self {
        self.effect_rem.push(proposition);
        self
    }

    pub fn to_pddl(&self) -> String {
        let precondition = self.precond_pos.iter().map(Proposition::to_pddl)
            .chain(self.precond_neg.iter().map(|p| format!("(not {})", p.to_pddl())))
            .collect::<Vec<_>>();
        let effect = self.effect_add.iter().map(Proposition::to_pddl)
            .chain(self.effect_rem.iter().map(|p| format!("(not {})", p.to_pddl())))
            .collect::<Vec<_>>();
        format!("(:action {} :parameters ({}) :precondition (and {}) :effect (and {}))",
            self.name, join(&self.args, " "), join(&precondition, " "), join(&effect, " "))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({})", self.name, join(&self.args, ", "))
    }
}

/// An [`Action`] bound to the fluent indices of one problem instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    pub id: usize,
    action: Action,
    pub pre_pos: Vec<usize>,
    pub pre_neg: Vec<usize>,
    pub add: Vec<usize>,
    pub del: Vec<usize>,
}

impl std::ops::Deref for Operator {
    type Target = Action;

    fn deref(&self) -> &Self::Target {
        &self.action
    }
}

impl Operator {
    pub fn bind(id: usize, action: Action, map: &FluentMap) -> Result<Self> {
        Ok(Self {
            id,
            pre_pos: map.indices_of(&action.precond_pos)?,
            pre_neg: map.indices_of(&action.precond_neg)?,
            add: map.indices_of(&action.effect_add)?,
            del: map.indices_of(&action.effect_rem)?,
            action,
        })
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    #[inline]
    pub fn is_applicable(&self, state: &State) -> bool {
        state.all(&self.pre_pos) && state.none(&self.pre_neg)
    }

    /// Frame assumption: only the delete and add lists change.
    #[inline]
    pub fn successor(&self, state: &State) -> State {
        state.successor(&self.del, &self.add)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.action.fmt(f)
    }
}
