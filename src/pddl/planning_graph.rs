use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use super::problem::Problem;
use super::state::State;

/// Fluent index with a polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub fluent: usize,
    pub positive: bool,
}

impl Literal {
    pub fn pos(fluent: usize) -> Self {
        Self { fluent, positive: true }
    }

    pub fn neg(fluent: usize) -> Self {
        Self { fluent, positive: false }
    }

    #[inline]
    pub fn negate(self) -> Self {
        Self { fluent: self.fluent, positive: !self.positive }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", if self.positive { "" } else { "~" }, self.fluent)
    }
}

/// Graph action: a problem operator, or a persistence action for one literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphAction {
    pub operator: Option<usize>,
    pub precond: Vec<Literal>,
    pub effect: Vec<Literal>,
}

impl GraphAction {
    pub fn is_persistence(&self) -> bool {
        self.operator.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiteralLevel {
    pub literals: BTreeSet<Literal>,
    pub mutex: HashSet<(Literal, Literal)>,
}

impl LiteralLevel {
    pub fn is_mutex(&self, a: Literal, b: Literal) -> bool {
        self.mutex.contains(&ordered(a, b))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActionLevel {
    /// Indices into [`PlanningGraph::graph_actions`].
    pub actions: Vec<usize>,
    pub mutex: HashSet<(usize, usize)>,
}

impl ActionLevel {
    pub fn is_mutex(&self, a: usize, b: usize) -> bool {
        a != b && self.mutex.contains(&ordered(a, b))
    }
}

#[inline]
fn ordered<T: Ord>(a: T, b: T) -> (T, T) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Planning graph rooted at one state: literal levels S0..Sn alternating with
/// action levels A0..An-1, with mutex relations on both.
pub struct PlanningGraph<'a> {
    problem: &'a Problem,
    graph_actions: Vec<GraphAction>,
    s_levels: Vec<LiteralLevel>,
    a_levels: Vec<ActionLevel>,
    leveled: bool,
}

impl<'a> PlanningGraph<'a> {
    /// Expands until every goal literal showed up or the graph levels off.
    pub fn new(problem: &'a Problem, state: &State) -> Self {
        let mut graph_actions: Vec<GraphAction> = problem
            .actions()
            .iter()
            .map(|op| GraphAction {
                operator: Some(op.id),
                precond: op.pre_pos.iter().map(|i| Literal::pos(*i))
                    .chain(op.pre_neg.iter().map(|i| Literal::neg(*i)))
                    .collect(),
                effect: op.add.iter().map(|i| Literal::pos(*i))
                    .chain(op.del.iter().map(|i| Literal::neg(*i)))
                    .collect(),
            })
            .collect();
        for fluent in 0..problem.fluents().len() {
            for literal in [Literal::pos(fluent), Literal::neg(fluent)].iter() {
                graph_actions.push(GraphAction { operator: None, precond: vec![*literal], effect: vec![*literal] });
            }
        }
        let s0 = LiteralLevel {
            literals: (0..problem.fluents().len())
                .map(|i| if state.holds(i) { Literal::pos(i) } else { Literal::neg(i) })
                .collect(),
            mutex: HashSet::new(),
        };
        let mut graph = Self {
            problem,
            graph_actions,
            s_levels: vec![s0],
            a_levels: Vec::new(),
            leveled: false,
        };
        while !graph.goals_reached() {
            if !graph.expand() {
                graph.leveled = true;
                tracing::trace!("Planning graph levelled off at level {}", graph.s_levels.len() - 1);
                break;
            }
        }
        graph
    }

    pub fn graph_actions(&self) -> &[GraphAction] {
        &self.graph_actions
    }

    pub fn s_levels(&self) -> &[LiteralLevel] {
        &self.s_levels
    }

    pub fn a_levels(&self) -> &[ActionLevel] {
        &self.a_levels
    }

    pub fn is_leveled(&self) -> bool {
        self.leveled
    }

    fn goals_reached(&self) -> bool {
        let last = &self.s_levels[self.s_levels.len() - 1];
        self.problem.goal_indices().iter().all(|g| last.literals.contains(&Literal::pos(*g)))
    }

    /// Adds A(n) and S(n+1). False once S(n+1) equals S(n), mutexes included.
    fn expand(&mut self) -> bool {
        let current = &self.s_levels[self.s_levels.len() - 1];

        let actions: Vec<usize> = (0..self.graph_actions.len())
            .filter(|a| self.is_enabled(&self.graph_actions[*a], current))
            .collect();
        let mut a_mutex = HashSet::new();
        for (i, a) in actions.iter().enumerate() {
            for b in actions.iter().skip(i + 1) {
                if self.actions_mutex(&self.graph_actions[*a], &self.graph_actions[*b], current) {
                    a_mutex.insert(ordered(*a, *b));
                }
            }
        }
        let a_level = ActionLevel { actions, mutex: a_mutex };

        let mut achievers: BTreeMap<Literal, Vec<usize>> = BTreeMap::new();
        for a in &a_level.actions {
            for effect in &self.graph_actions[*a].effect {
                achievers.entry(*effect).or_insert_with(Vec::new).push(*a);
            }
        }
        let literals: Vec<Literal> = achievers.keys().copied().collect();
        let mut s_mutex = HashSet::new();
        for (i, p) in literals.iter().enumerate() {
            for q in literals.iter().skip(i + 1) {
                if *q == p.negate() || Self::inconsistent_support(&achievers[p], &achievers[q], &a_level) {
                    s_mutex.insert(ordered(*p, *q));
                }
            }
        }
        let next = LiteralLevel { literals: literals.into_iter().collect(), mutex: s_mutex };

        let changed = next != *current;
        self.a_levels.push(a_level);
        self.s_levels.push(next);
        changed
    }

    /// Preconditions present and pairwise non-mutex.
    fn is_enabled(&self, action: &GraphAction, level: &LiteralLevel) -> bool {
        action.precond.iter().all(|p| level.literals.contains(p))
            && action.precond.iter().enumerate().all(|(i, p)| {
                action.precond.iter().skip(i + 1).all(|q| !level.is_mutex(*p, *q))
            })
    }

    fn actions_mutex(&self, a: &GraphAction, b: &GraphAction, level: &LiteralLevel) -> bool {
        Self::inconsistent_effects(a, b) || Self::interference(a, b) || Self::competing_needs(a, b, level)
    }

    /// One action undoes an effect of the other.
    fn inconsistent_effects(a: &GraphAction, b: &GraphAction) -> bool {
        a.effect.iter().any(|e| b.effect.contains(&e.negate()))
    }

    /// One action deletes a precondition of the other.
    fn interference(a: &GraphAction, b: &GraphAction) -> bool {
        a.effect.iter().any(|e| b.precond.contains(&e.negate()))
            || b.effect.iter().any(|e| a.precond.contains(&e.negate()))
    }

    fn competing_needs(a: &GraphAction, b: &GraphAction, level: &LiteralLevel) -> bool {
        a.precond.iter().any(|p| b.precond.iter().any(|q| level.is_mutex(*p, *q)))
    }

    /// Every way of achieving both literals uses a mutex pair of actions.
    fn inconsistent_support(p: &[usize], q: &[usize], level: &ActionLevel) -> bool {
        p.iter().all(|a| q.iter().all(|b| level.is_mutex(*a, *b)))
    }

    /// First level whose literals contain `literal`.
    pub fn level_cost(&self, literal: Literal) -> Option<usize> {
        self.s_levels.iter().position(|level| level.literals.contains(&literal))
    }

    /// Sum of the level costs of the goal propositions, `None` if one never appears.
    pub fn level_sum(&self) -> Option<usize> {
        self.problem
            .goal_indices()
            .iter()
            .map(|g| self.level_cost(Literal::pos(*g)))
            .sum()
    }

    /// Largest level cost among the goal propositions. Admissible, unlike
    /// [`level_sum`](Self::level_sum); exposed for callers that need a lower
    /// bound rather than the faster guidance of the sum.
    pub fn max_level(&self) -> Option<usize> {
        self.problem
            .goal_indices()
            .iter()
            .map(|g| self.level_cost(Literal::pos(*g)))
            .collect::<Option<Vec<_>>>()
            .map(|levels| levels.into_iter().max().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pddl::{instances, FluentState, Schema};
    use crate::prop;

    fn p1() -> Problem {
        instances::air_cargo_p1().unwrap()
    }

    fn op_index(p: &Problem, schema: Schema, args: [&str; 3]) -> usize {
        let action = schema.instantiate(args);
        p.actions().iter().position(|op| op.action() == &action).unwrap()
    }

    fn lit(p: &Problem, proposition: crate::pddl::Proposition, positive: bool) -> Literal {
        Literal { fluent: p.fluents().index_of(&proposition).unwrap(), positive }
    }

    #[test]
    fn test_level_sum_p1() {
        let p = p1();
        let pg = PlanningGraph::new(&p, p.initial_state());
        // Load, Fly then Unload: each cargo shows up at its destination in S3.
        assert_eq!(pg.level_cost(lit(&p, prop!(At, C1, JFK), true)), Some(3));
        assert_eq!(pg.level_cost(lit(&p, prop!(At, C2, SFO), true)), Some(3));
        assert_eq!(pg.level_sum(), Some(6));
        assert_eq!(pg.max_level(), Some(3));
        assert!(!pg.is_leveled());
        assert_eq!(pg.s_levels().len(), 4);
        assert_eq!(pg.a_levels().len(), 3);
    }

    #[test]
    fn test_level_zero_at_goal() {
        let p = p1();
        let goal = p.encode(&FluentState::new(
            vec![prop!(At, C1, JFK), prop!(At, C2, SFO), prop!(At, P1, JFK), prop!(At, P2, SFO)],
            vec![],
        )).unwrap();
        let pg = PlanningGraph::new(&p, &goal);
        assert_eq!(pg.level_sum(), Some(0));
        assert_eq!(pg.s_levels().len(), 1);
    }

    #[test]
    fn test_s0_literals() {
        let p = p1();
        let pg = PlanningGraph::new(&p, p.initial_state());
        let s0 = &pg.s_levels()[0];
        assert_eq!(s0.literals.len(), p.fluents().len());
        assert!(s0.literals.contains(&lit(&p, prop!(At, C1, SFO), true)));
        assert!(s0.literals.contains(&lit(&p, prop!(In, C1, P1), false)));
        assert!(s0.mutex.is_empty());
        assert_eq!(Literal::neg(3).to_string(), "~3");
        assert_eq!(Literal::pos(3).negate(), Literal::neg(3));
    }

    #[test]
    fn test_action_mutexes() {
        let p = p1();
        let pg = PlanningGraph::new(&p, p.initial_state());
        let a0 = &pg.a_levels()[0];
        let load = op_index(&p, Schema::Load, ["C1", "P1", "SFO"]);
        let fly = op_index(&p, Schema::Fly, ["P1", "SFO", "JFK"]);
        let other_load = op_index(&p, Schema::Load, ["C2", "P2", "JFK"]);
        assert!(a0.actions.contains(&load));
        assert!(a0.actions.contains(&fly));
        // Fly deletes At(P1, SFO), which Load needs.
        assert!(a0.is_mutex(load, fly));
        assert!(!a0.is_mutex(load, other_load));
        let unload = op_index(&p, Schema::Unload, ["C1", "P1", "SFO"]);
        assert!(!a0.actions.contains(&unload));
        assert_eq!(pg.graph_actions()[load].operator, Some(load));
        assert!(pg.graph_actions()[p.actions().len()].is_persistence());
        assert_eq!(pg.graph_actions().len(), p.actions().len() + 2 * p.fluents().len());
    }

    #[test]
    fn test_literal_mutexes() {
        let p = p1();
        let pg = PlanningGraph::new(&p, p.initial_state());
        let s1 = &pg.s_levels()[1];
        let in_c1 = lit(&p, prop!(In, C1, P1), true);
        let p1_jfk = lit(&p, prop!(At, P1, JFK), true);
        // Load and Fly are mutex, nothing else achieves the pair.
        assert!(s1.is_mutex(in_c1, p1_jfk));
        assert!(s1.is_mutex(in_c1, in_c1.negate()));
        let c2_in = lit(&p, prop!(In, C2, P2), true);
        assert!(!s1.is_mutex(in_c1, c2_in));
    }

    #[test]
    fn test_levels_off_when_unreachable() {
        let domain = crate::pddl::AirCargoDomain::new(&["C1"], &["P1"], &["JFK"]).unwrap();
        let p = Problem::new(
            domain,
            FluentState::new(vec![prop!(At, C1, JFK)], vec![prop!(At, P1, JFK), prop!(In, C1, P1)]),
            vec![prop!(At, P1, JFK)],
        ).unwrap();
        let pg = PlanningGraph::new(&p, p.initial_state());
        assert!(pg.is_leveled());
        assert_eq!(pg.level_sum(), None);
        assert_eq!(p.heuristic(crate::pddl::Heuristic::LevelSum, p.initial_state()), crate::pddl::UNREACHABLE);
    }
}
