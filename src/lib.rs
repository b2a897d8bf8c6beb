pub mod formula;
pub mod gates;
pub mod solver;

#[cfg(test)]
mod brute_force;

/// Outcome of a satisfiability search. Unsatisfiable is a regular result,
/// not an error.
#[derive(PartialEq, Clone, Debug)]
pub enum SatResult {
    Satisfiable(Assignment),
    Unsatisfiable,
}

impl SatResult {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, SatResult::Satisfiable(_))
    }
}

pub use formula::{Clause, Formula, Literal, Variable};
pub use gates::{encode, Gate, GateKind};
pub use solver::{Assignment, DecisionStep, PathId, RuleTag, Solution, Solver};
