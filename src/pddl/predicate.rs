use std::fmt;
use super::utils::{build_var_string, join};

/// Predicate symbol of the air cargo domain, e.g. `(At ?x ?y)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Predicate {
    pub name: String,
    pub variable_count: usize,
}

impl Predicate {
    pub fn new(name: &str, variable_count: usize) -> Predicate {
        Predicate {
            name: name.to_string(),
            variable_count,
        }
    }

    /// Grounds the predicate with concrete objects.
    pub fn ground(&self, args: &[&str]) -> Proposition {
        debug_assert_eq!(args.len(), self.variable_count);
        Proposition::new(&self.name, args)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({} {})", self.name, build_var_string(self.variable_count))
    }
}

/// Ground atomic fact. Equality and hashing are structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Proposition {
    pub predicate: String,
    pub args: Vec<String>,
}

impl Proposition {
    pub fn new(predicate: &str, args: &[&str]) -> Self {
        Self {
            predicate: predicate.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// `At(object, airport)`
    pub fn at(object: &str, airport: &str) -> Self {
        Self::new("At", &[object, airport])
    }

    /// `In(cargo, plane)`
    pub fn inside(cargo: &str, plane: &str) -> Self {
        Self::new("In", &[cargo, plane])
    }

    /// PDDL form: `(At C1 SFO)`
    pub fn to_pddl(&self) -> String {
        format!("({} {})", self.predicate, join(&self.args, " "))
    }
}

impl fmt::Display for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({})", self.predicate, join(&self.args, ", "))
    }
}

/// Builds a [`Proposition`] from bare identifiers: `prop!(At, C1, SFO)`.
#[macro_export]
macro_rules! prop {
    ( $p: ident, $($arg: ident), + ) => {
        $crate::pddl::Proposition::new(stringify!($p), &[ $( stringify!($arg) ), + ])
    };
}
