use std::fmt;
use super::predicate::Proposition;
use super::utils::join;

/// Positive and negative literal fluents describing a state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FluentState {
    pub pos: Vec<Proposition>,
    pub neg: Vec<Proposition>,
}

impl FluentState {
    pub fn new(pos: Vec<Proposition>, neg: Vec<Proposition>) -> Self {
        Self { pos, neg }
    }

    /// All propositions, positives first.
    pub fn propositions(&self) -> impl Iterator<Item = &Proposition> {
        self.pos.iter().chain(self.neg.iter())
    }

    /// Conjunction of the positive literals only.
    pub fn pos_sentence(&self) -> String {
        join(&self.pos, " & ")
    }
}

impl fmt::Display for FluentState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let neg: Vec<String> = self.neg.iter().map(|p| format!("~{}", p)).collect();
        match (self.pos.is_empty(), neg.is_empty()) {
            (true, true) => Ok(()),
            (false, true) => write!(f, "{}", self.pos_sentence()),
            (true, false) => write!(f, "{}", join(&neg, " & ")),
            (false, false) => write!(f, "{} & {}", self.pos_sentence(), join(&neg, " & ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence() {
        let fs = FluentState::new(
            vec![Proposition::at("C1", "SFO"), Proposition::at("P1", "SFO")],
            vec![Proposition::inside("C1", "P1")],
        );
        assert_eq!(fs.pos_sentence(), "At(C1, SFO) & At(P1, SFO)");
        assert_eq!(fs.to_string(), "At(C1, SFO) & At(P1, SFO) & ~In(C1, P1)");
        assert_eq!(fs.propositions().count(), 3);
        assert_eq!(FluentState::default().to_string(), "");
    }
}
