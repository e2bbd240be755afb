use std::collections::HashSet;
use std::fmt;

use super::action::Action;
use super::error::{Error, Result};
use super::predicate::{Predicate, Proposition};

/// Object universes of an air cargo problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirCargoDomain {
    pub cargos: Vec<String>,
    pub planes: Vec<String>,
    pub airports: Vec<String>,
}

/// Action schemas of the domain. Every schema takes three objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schema {
    /// Load(cargo, plane, airport)
    Load,
    /// Unload(cargo, plane, airport)
    Unload,
    /// Fly(plane, from, to)
    Fly,
}

impl Schema {
    pub const ALL: [Schema; 3] = [Schema::Load, Schema::Unload, Schema::Fly];

    pub fn name(&self) -> &'static str {
        match self {
            Schema::Load => "Load",
            Schema::Unload => "Unload",
            Schema::Fly => "Fly",
        }
    }

    /// Concrete action for one argument tuple. Variables are fine too,
    /// `instantiate(["?c", "?p", "?a"])` yields the schema itself.
    pub fn instantiate(&self, args: [&str; 3]) -> Action {
        let action = Action::new(self.name(), &args);
        match self {
            Schema::Load => {
                let [cargo, plane, airport] = args;
                action
                    .requires(Proposition::at(cargo, airport))
                    .requires(Proposition::at(plane, airport))
                    .adds(Proposition::inside(cargo, plane))
                    .removes(Proposition::at(cargo, airport))
            }
            Schema::Unload => {
                let [cargo, plane, airport] = args;
                action
                    .requires(Proposition::inside(cargo, plane))
                    .requires(Proposition::at(plane, airport))
                    .adds(Proposition::at(cargo, airport))
                    .removes(Proposition::inside(cargo, plane))
            }
            Schema::Fly => {
                let [plane, from, to] = args;
                action
                    .requires(Proposition::at(plane, from))
                    .adds(Proposition::at(plane, to))
                    .removes(Proposition::at(plane, from))
            }
        }
    }

    pub fn ground(&self, domain: &AirCargoDomain) -> Vec<Action> {
        let mut actions = Vec::with_capacity(self.cardinality(domain));
        match self {
            Schema::Load | Schema::Unload => {
                for cargo in &domain.cargos {
                    for plane in &domain.planes {
                        for airport in &domain.airports {
                            actions.push(self.instantiate([cargo.as_str(), plane.as_str(), airport.as_str()]));
                        }
                    }
                }
            }
            Schema::Fly => {
                for from in &domain.airports {
                    for to in domain.airports.iter().filter(|to| *to != from) {
                        for plane in &domain.planes {
                            actions.push(self.instantiate([plane.as_str(), from.as_str(), to.as_str()]));
                        }
                    }
                }
            }
        }
        actions
    }

    pub fn cardinality(&self, domain: &AirCargoDomain) -> usize {
        let (c, p, a) = (domain.cargos.len(), domain.planes.len(), domain.airports.len());
        match self {
            Schema::Load | Schema::Unload => c * p * a,
            Schema::Fly => p * a * a.saturating_sub(1),
        }
    }

    fn variables(&self) -> [&'static str; 3] {
        match self {
            Schema::Load | Schema::Unload => ["?c", "?p", "?a"],
            Schema::Fly => ["?p", "?from", "?to"],
        }
    }
}

impl AirCargoDomain {
    pub fn new(cargos: &[&str], planes: &[&str], airports: &[&str]) -> Result<Self> {
        let domain = Self {
            cargos: cargos.iter().map(|s| s.to_string()).collect(),
            planes: planes.iter().map(|s| s.to_string()).collect(),
            airports: airports.iter().map(|s| s.to_string()).collect(),
        };
        domain.validate()?;
        Ok(domain)
    }

    pub fn predicates() -> Vec<Predicate> {
        vec![Predicate::new("At", 2), Predicate::new("In", 2)]
    }

    /// Every universe must be non-empty and no identifier may appear twice.
    pub fn validate(&self) -> Result<()> {
        let universes = [("cargos", &self.cargos), ("planes", &self.planes), ("airports", &self.airports)];
        let mut seen = HashSet::new();
        for (kind, objects) in universes.iter() {
            if objects.is_empty() {
                return Err(Error::malformed(format!("no {} given", kind)));
            }
            for object in objects.iter() {
                if !seen.insert(object.as_str()) {
                    return Err(Error::malformed(format!("object {} is declared more than once", object)));
                }
            }
        }
        Ok(())
    }

    /// Grounds Load, Unload and Fly over the object universes, in that order.
    pub fn ground(&self) -> Result<Vec<Action>> {
        self.validate()?;
        let actions: Vec<Action> = Schema::ALL.iter().flat_map(|schema| schema.ground(self)).collect();
        tracing::debug!(
            "Grounded {} actions for {} cargos, {} planes, {} airports",
            actions.len(), self.cargos.len(), self.planes.len(), self.airports.len()
        );
        Ok(actions)
    }

    /// Every `At` and `In` proposition the objects can form: cargos at airports,
    /// planes at airports, then cargos in planes.
    pub fn propositions(&self) -> Vec<Proposition> {
        let mut result = Vec::new();
        for object in self.cargos.iter().chain(self.planes.iter()) {
            for airport in &self.airports {
                result.push(Proposition::at(object, airport));
            }
        }
        for cargo in &self.cargos {
            for plane in &self.planes {
                result.push(Proposition::inside(cargo, plane));
            }
        }
        result
    }

    pub fn objects(&self) -> impl Iterator<Item = &String> {
        self.cargos.iter().chain(self.planes.iter()).chain(self.airports.iter())
    }
}

impl fmt::Display for AirCargoDomain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let predicates = Self::predicates().iter().fold(String::new(), |acc, item| acc + " " + &item.to_string());
        writeln!(f, "(define (domain air-cargo)")?;
        writeln!(f, " (:predicates{})", predicates)?;
        for schema in Schema::ALL.iter() {
            writeln!(f, " {}", schema.instantiate(schema.variables()).to_pddl())?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prop;

    fn domain() -> AirCargoDomain {
        AirCargoDomain::new(&["C1", "C2"], &["P1", "P2"], &["JFK", "SFO"]).unwrap()
    }

    #[test]
    fn test_cardinality() {
        let d = domain();
        let actions = d.ground().unwrap();
        let count = |name: &str| actions.iter().filter(|a| a.name == name).count();
        assert_eq!(count("Load") + count("Unload"), 16);
        assert_eq!(count("Fly"), 4);
        assert_eq!(actions.len(), 20);
        assert_eq!(Schema::Fly.cardinality(&d), 4);
    }

    #[test]
    fn test_bigger_cardinality() {
        let d = AirCargoDomain::new(&["C1", "C2", "C3", "C4"], &["P1", "P2"], &["JFK", "SFO", "ATL", "ORD"]).unwrap();
        let actions = d.ground().unwrap();
        assert_eq!(actions.len(), 4 * 2 * 4 * 2 + 2 * 4 * 3);
    }

    #[test]
    fn test_load() {
        let load = Schema::Load.instantiate(["C1", "P1", "SFO"]);
        assert_eq!(load.precond_pos, vec![prop!(At, C1, SFO), prop!(At, P1, SFO)]);
        assert!(load.precond_neg.is_empty());
        assert_eq!(load.effect_add, vec![prop!(In, C1, P1)]);
        assert_eq!(load.effect_rem, vec![prop!(At, C1, SFO)]);
    }

    #[test]
    fn test_unload() {
        let unload = Schema::Unload.instantiate(["C1", "P1", "JFK"]);
        assert_eq!(unload.precond_pos, vec![prop!(In, C1, P1), prop!(At, P1, JFK)]);
        assert_eq!(unload.effect_add, vec![prop!(At, C1, JFK)]);
        assert_eq!(unload.effect_rem, vec![prop!(In, C1, P1)]);
    }

    #[test]
    fn test_fly_never_loops() {
        let actions = Schema::Fly.ground(&domain());
        assert!(actions.iter().all(|a| a.args[1] != a.args[2]));
        assert!(actions.contains(&Schema::Fly.instantiate(["P1", "SFO", "JFK"])));
        let fly = Schema::Fly.instantiate(["P1", "SFO", "JFK"]);
        assert_eq!(fly.precond_pos, vec![prop!(At, P1, SFO)]);
        assert_eq!(fly.effect_add, vec![prop!(At, P1, JFK)]);
        assert_eq!(fly.effect_rem, vec![prop!(At, P1, SFO)]);
    }

    #[test]
    fn test_single_airport_has_no_flights() {
        let d = AirCargoDomain::new(&["C1"], &["P1"], &["JFK"]).unwrap();
        assert!(Schema::Fly.ground(&d).is_empty());
        assert_eq!(d.ground().unwrap().len(), 2);
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            AirCargoDomain::new(&["C1"], &["P1"], &[]),
            Err(Error::MalformedSchemaArguments { .. })
        ));
        assert!(matches!(
            AirCargoDomain::new(&["C1", "C1"], &["P1"], &["JFK"]),
            Err(Error::MalformedSchemaArguments { .. })
        ));
        assert!(matches!(
            AirCargoDomain::new(&["C1"], &["SFO"], &["SFO"]),
            Err(Error::MalformedSchemaArguments { .. })
        ));
        let broken = AirCargoDomain { cargos: vec![], planes: vec!["P1".into()], airports: vec!["JFK".into()] };
        assert!(broken.ground().is_err());
    }

    #[test]
    fn test_propositions() {
        let props = domain().propositions();
        assert_eq!(props.len(), 2 * 2 + 2 * 2 + 2 * 2);
        assert_eq!(props[0], prop!(At, C1, JFK));
        assert_eq!(props[props.len() - 1], prop!(In, C2, P2));
    }

    #[test]
    fn test_display() {
        let text = domain().to_string();
        assert!(text.starts_with("(define (domain air-cargo)"));
        assert!(text.contains(" (:predicates (At ?x ?y) (In ?x ?y))"));
        assert!(text.contains("(:action Fly :parameters (?p ?from ?to) :precondition (and (At ?p ?from))"));
    }
}
