use derive_more::derive::{Display, Error};

use super::predicate::Proposition;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum Error {
    #[display("Unknown proposition {proposition}: not part of the fluent map")]
    UnknownProposition { proposition: Proposition },

    #[display("Action {action} is not applicable in the given state")]
    InapplicableAction { action: String },

    #[display("Malformed schema arguments: {reason}")]
    MalformedSchemaArguments { reason: String },

    #[display("Proposition {proposition} is listed more than once")]
    DuplicateProposition { proposition: Proposition },

    #[display("State has {found} fluents, expected {expected}")]
    StateSizeMismatch { expected: usize, found: usize },

    #[display("Search gave up after {limit} expansions")]
    ExpansionLimit { limit: usize },
}

impl Error {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedSchemaArguments { reason: reason.into() }
    }
}
