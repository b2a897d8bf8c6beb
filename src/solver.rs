use crate::formula::{Clause, Formula, Variable};
use crate::SatResult;
use log::trace;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::{self, Display, Formatter};

/// Which rule produced a search-tree edge. The discriminant is the digit the
/// edge contributes to its path id.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RuleTag {
    OneLiteral = 0,
    PureLiteral = 1,
    BranchTrue = 2,
    BranchFalse = 3,
}

/// Identifies a search-tree node by the rule tags applied from the root.
/// Renders as a digit string over {0,1,2,3}; the root is "0".
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PathId(Vec<u8>);

impl PathId {
    fn root() -> Self {
        PathId(vec![0])
    }

    fn child(&self, tag: RuleTag) -> Self {
        let mut tags = self.0.clone();
        tags.push(tag as u8);
        PathId(tags)
    }

    /// True when `self` lies on the chain from the root to `other`.
    pub fn is_prefix_of(&self, other: &PathId) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl Display for PathId {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        for tag in &self.0 {
            write!(f, "{}", tag)?;
        }
        Ok(())
    }
}

/// One entry of the decision trace: what was applied, the clause sequence
/// immediately afterwards, and where in the search tree it happened.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DecisionStep {
    description: String,
    path: PathId,
    clauses: Vec<Clause>,
    decision: Option<(Variable, bool)>,
}

impl DecisionStep {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn path(&self) -> &PathId {
        &self.path
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// The (variable, value) pair this step fixed, if any. The initial
    /// search-start step fixes nothing.
    pub fn decision(&self) -> Option<(&Variable, bool)> {
        self.decision.as_ref().map(|(variable, value)| (variable, *value))
    }
}

/// Variable-to-value mapping replayed from the winning decision chain.
/// Variables with no controlling step are don't-cares and stay absent.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Assignment(BTreeMap<Variable, bool>);

impl Assignment {
    pub fn value_of(&self, variable: &Variable) -> Option<bool> {
        self.0.get(variable).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, bool)> {
        self.0.iter().map(|(variable, value)| (variable, *value))
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.0.keys()
    }

    /// Whether every clause of `formula` contains a literal whose variable is
    /// assigned with matching polarity. Unassigned variables never satisfy a
    /// clause.
    pub fn satisfies(&self, formula: &Formula) -> bool {
        formula.clauses().all(|clause| {
            clause
                .literals()
                .any(|literal| self.value_of(literal.variable()) == Some(literal.is_positive()))
        })
    }

    pub(crate) fn set(&mut self, variable: Variable, value: bool) {
        let _ = self.0.insert(variable, value);
    }
}

/// Verdict plus the full decision trace of one solve run.
#[derive(Clone, PartialEq, Debug)]
pub struct Solution {
    result: SatResult,
    trace: Vec<DecisionStep>,
}

impl Solution {
    pub fn result(&self) -> &SatResult {
        &self.result
    }

    pub fn is_satisfiable(&self) -> bool {
        matches!(self.result, SatResult::Satisfiable(_))
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        match &self.result {
            SatResult::Satisfiable(assignment) => Some(assignment),
            SatResult::Unsatisfiable => None,
        }
    }

    pub fn trace(&self) -> &[DecisionStep] {
        &self.trace
    }
}

pub struct Solver {
    clauses: Vec<Clause>,
    fail_fast: bool,
    trace: Vec<DecisionStep>,
}

impl Solver {
    pub fn new(formula: Formula) -> Self {
        Self {
            clauses: formula.into_clauses(),
            fail_fast: false,
            trace: vec![],
        }
    }

    /// When enabled, a search level gives up as soon as a one-literal or
    /// pure-literal application leaves an empty clause, instead of going on
    /// to the remaining strategies at that level. The verdict is unchanged;
    /// the trace gets shorter.
    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    /// Runs the search to completion, consuming the solver. The trace is
    /// owned by this one invocation and handed back in the solution.
    pub fn solve(mut self) -> Solution {
        let root = PathId::root();
        self.trace.push(DecisionStep {
            description: "DPLL start".to_string(),
            path: root.clone(),
            clauses: self.clauses.clone(),
            decision: None,
        });

        let clauses = std::mem::take(&mut self.clauses);
        match self.search(&clauses, &root) {
            Some(leaf) => {
                let assignment = self.winning_assignment(&leaf);
                Solution {
                    result: SatResult::Satisfiable(assignment),
                    trace: self.trace,
                }
            }
            None => Solution {
                result: SatResult::Unsatisfiable,
                trace: self.trace,
            },
        }
    }

    /// One DPLL node. Returns the path id of the satisfiable leaf, if any.
    /// Rule order: conflict check, one-literal, pure-literal, termination,
    /// then branching on the lexicographically smallest remaining variable.
    /// Each rule application is logged before recursing, and the first
    /// success short-circuits upward.
    fn search(&mut self, clauses: &[Clause], path: &PathId) -> Option<PathId> {
        if has_empty_clause(clauses) {
            return None;
        }

        if let Some((variable, value)) = find_unit(clauses) {
            trace!("OLR forces {} = {} at {}", variable, value, path);
            let reduced = apply_assignment(clauses, &variable, value);
            let child = path.child(RuleTag::OneLiteral);
            let conflict = has_empty_clause(&reduced);
            self.log_step(
                format!("Applying OLR: {} = {}", variable, value),
                child.clone(),
                &reduced,
                (variable, value),
            );
            if let Some(leaf) = self.search(&reduced, &child) {
                return Some(leaf);
            }
            if self.fail_fast && conflict {
                trace!("fail-fast: OLR conflict at {}", path);
                return None;
            }
        }

        if let Some((variable, value)) = find_pure(clauses) {
            trace!("PLR fixes {} = {} at {}", variable, value, path);
            let reduced = apply_assignment(clauses, &variable, value);
            let child = path.child(RuleTag::PureLiteral);
            let conflict = has_empty_clause(&reduced);
            self.log_step(
                format!("Applying PLR: {} = {}", variable, value),
                child.clone(),
                &reduced,
                (variable, value),
            );
            if let Some(leaf) = self.search(&reduced, &child) {
                return Some(leaf);
            }
            if self.fail_fast && conflict {
                trace!("fail-fast: PLR conflict at {}", path);
                return None;
            }
        }

        // No empty clause was present, so no literals left means no clauses
        // left: everything has been satisfied away.
        let variable = match remaining_variables(clauses).into_iter().next() {
            Some(variable) => variable,
            None => return Some(path.clone()),
        };

        for &(value, tag) in &[(true, RuleTag::BranchTrue), (false, RuleTag::BranchFalse)] {
            trace!("branching {} = {} at {}", variable, value, path);
            let reduced = apply_assignment(clauses, &variable, value);
            let child = path.child(tag);
            self.log_step(
                format!("Setting Variable to {}: {} = {}", value, variable, value),
                child.clone(),
                &reduced,
                (variable.clone(), value),
            );
            if let Some(leaf) = self.search(&reduced, &child) {
                return Some(leaf);
            }
        }

        None
    }

    fn log_step(
        &mut self,
        description: String,
        path: PathId,
        clauses: &[Clause],
        decision: (Variable, bool),
    ) {
        self.trace.push(DecisionStep {
            description,
            path,
            clauses: clauses.to_vec(),
            decision: Some(decision),
        });
    }

    /// Replays the decision chain that led to `leaf`. Sibling subtrees that
    /// failed diverge from the chain at their first tag, so the prefix test
    /// keeps exactly the root-to-leaf steps.
    fn winning_assignment(&self, leaf: &PathId) -> Assignment {
        let mut assignment = Assignment::default();
        for step in &self.trace {
            if step.path.is_prefix_of(leaf) {
                if let Some((variable, value)) = &step.decision {
                    assignment.set(variable.clone(), *value);
                }
            }
        }
        assignment
    }
}

fn has_empty_clause(clauses: &[Clause]) -> bool {
    clauses.iter().any(Clause::is_empty)
}

// First unit clause in sequence order wins.
fn find_unit(clauses: &[Clause]) -> Option<(Variable, bool)> {
    clauses.iter().find_map(|clause| {
        clause
            .unit_literal()
            .map(|literal| (literal.variable().clone(), literal.is_positive()))
    })
}

// Tallies polarities per variable; the first variable (in first-occurrence
// order) seen with a single polarity is fixed to the satisfying value. The
// explicit order vector keeps repeated runs deterministic.
fn find_pure(clauses: &[Clause]) -> Option<(Variable, bool)> {
    let mut counts: HashMap<Variable, (usize, usize)> = HashMap::new();
    let mut order: Vec<Variable> = Vec::new();

    for clause in clauses {
        for literal in clause.literals() {
            let variable = literal.variable();
            let entry = counts.entry(variable.clone()).or_insert_with(|| {
                order.push(variable.clone());
                (0, 0)
            });
            if literal.is_positive() {
                entry.0 += 1;
            } else {
                entry.1 += 1;
            }
        }
    }

    order.into_iter().find_map(|variable| {
        let (positive, negative) = counts[&variable];
        if positive > 0 && negative == 0 {
            Some((variable, true))
        } else if negative > 0 && positive == 0 {
            Some((variable, false))
        } else {
            None
        }
    })
}

fn remaining_variables(clauses: &[Clause]) -> BTreeSet<Variable> {
    clauses
        .iter()
        .flat_map(|clause| clause.literals())
        .map(|literal| literal.variable().clone())
        .collect()
}

// Satisfied clauses disappear; unsatisfied clauses keep their remaining
// literals with the decided variable's literals removed.
fn apply_assignment(clauses: &[Clause], variable: &Variable, value: bool) -> Vec<Clause> {
    clauses
        .iter()
        .filter_map(|clause| clause.assign(variable, value))
        .collect()
}
