use crate::formula::{Clause, Formula, Literal, Variable};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GateKind {
    And,
    Or,
    Xor,
    Not,
    Nor,
    Xnor,
    Implication,
    Nand,
    True,
}

impl GateKind {
    /// Truth-table semantics over the gate's inputs. `Not` reads only the
    /// second input; `True` reads neither.
    pub fn eval(self, b: bool, c: bool) -> bool {
        match self {
            GateKind::And => b && c,
            GateKind::Or => b || c,
            GateKind::Xor => b != c,
            GateKind::Not => !c,
            GateKind::Nor => !(b || c),
            GateKind::Xnor => b == c,
            GateKind::Implication => !b || c,
            GateKind::Nand => !(b && c),
            GateKind::True => true,
        }
    }
}

/// One gate equivalence `output <-> kind(inputs)`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Gate {
    output: Variable,
    kind: GateKind,
    input_a: Option<Variable>,
    input_b: Option<Variable>,
}

impl Gate {
    pub fn binary(
        kind: GateKind,
        output: impl Into<Variable>,
        input_a: impl Into<Variable>,
        input_b: impl Into<Variable>,
    ) -> Self {
        Gate {
            output: output.into(),
            kind,
            input_a: Some(input_a.into()),
            input_b: Some(input_b.into()),
        }
    }

    // The unary input lives in the second input field.
    pub fn not(output: impl Into<Variable>, input: impl Into<Variable>) -> Self {
        Gate {
            output: output.into(),
            kind: GateKind::Not,
            input_a: None,
            input_b: Some(input.into()),
        }
    }

    pub fn always_true(output: impl Into<Variable>) -> Self {
        Gate {
            output: output.into(),
            kind: GateKind::True,
            input_a: None,
            input_b: None,
        }
    }

    pub fn output(&self) -> &Variable {
        &self.output
    }

    pub fn kind(&self) -> GateKind {
        self.kind
    }

    fn append_clauses(&self, clauses: &mut Vec<Clause>) {
        let a = &self.output;
        match self.kind {
            GateKind::True => {
                clauses.push(Clause::new(vec![pos(a)]));
            }
            GateKind::Not => {
                let c = self.input_b.as_ref().expect("NOT gate is missing its input");
                clauses.push(Clause::new(vec![pos(c), pos(a)]));
                clauses.push(Clause::new(vec![neg(c), neg(a)]));
            }
            kind => {
                let b = self
                    .input_a
                    .as_ref()
                    .expect("binary gate is missing its first input");
                let c = self
                    .input_b
                    .as_ref()
                    .expect("binary gate is missing its second input");
                match kind {
                    GateKind::And => {
                        clauses.push(Clause::new(vec![neg(b), neg(c), pos(a)]));
                        clauses.push(Clause::new(vec![pos(b), neg(a)]));
                        clauses.push(Clause::new(vec![pos(c), neg(a)]));
                    }
                    GateKind::Or => {
                        clauses.push(Clause::new(vec![pos(b), pos(c), neg(a)]));
                        clauses.push(Clause::new(vec![neg(b), pos(a)]));
                        clauses.push(Clause::new(vec![neg(c), pos(a)]));
                    }
                    GateKind::Xor => {
                        clauses.push(Clause::new(vec![neg(b), neg(c), neg(a)]));
                        clauses.push(Clause::new(vec![pos(b), pos(c), neg(a)]));
                        clauses.push(Clause::new(vec![neg(b), pos(c), pos(a)]));
                        clauses.push(Clause::new(vec![pos(b), neg(c), pos(a)]));
                    }
                    GateKind::Nor => {
                        clauses.push(Clause::new(vec![pos(b), pos(c), pos(a)]));
                        clauses.push(Clause::new(vec![neg(b), neg(a)]));
                        clauses.push(Clause::new(vec![neg(c), neg(a)]));
                    }
                    GateKind::Xnor => {
                        clauses.push(Clause::new(vec![pos(b), pos(c), pos(a)]));
                        clauses.push(Clause::new(vec![neg(b), neg(c), pos(a)]));
                        clauses.push(Clause::new(vec![pos(b), neg(c), neg(a)]));
                        clauses.push(Clause::new(vec![neg(b), pos(c), neg(a)]));
                    }
                    GateKind::Implication => {
                        clauses.push(Clause::new(vec![neg(a), neg(b), pos(c)]));
                        clauses.push(Clause::new(vec![pos(b), pos(a)]));
                        clauses.push(Clause::new(vec![neg(c), pos(a)]));
                    }
                    GateKind::Nand => {
                        clauses.push(Clause::new(vec![neg(a), neg(b), neg(c)]));
                        clauses.push(Clause::new(vec![pos(a), pos(b)]));
                        clauses.push(Clause::new(vec![pos(a), pos(c)]));
                    }
                    GateKind::Not | GateKind::True => unreachable!(),
                }
            }
        }
    }
}

fn pos(variable: &Variable) -> Literal {
    Literal::Positive(variable.clone())
}

fn neg(variable: &Variable) -> Literal {
    Literal::Negative(variable.clone())
}

/// Compiles an ordered gate list into an equisatisfiable CNF formula. Each
/// gate appends its fixed clause group in input order; no variables beyond
/// the gates' own outputs and inputs are introduced.
pub fn encode(gates: &[Gate]) -> Formula {
    let mut clauses = Vec::new();
    for gate in gates {
        gate.append_clauses(&mut clauses);
    }
    Formula::new(clauses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{n, p};

    const BINARY_KINDS: &[GateKind] = &[
        GateKind::And,
        GateKind::Or,
        GateKind::Xor,
        GateKind::Nor,
        GateKind::Xnor,
        GateKind::Implication,
        GateKind::Nand,
    ];

    fn satisfied(formula: &Formula, values: &[(&str, bool)]) -> bool {
        formula.clauses().all(|clause| {
            clause.literals().any(|literal| {
                values
                    .iter()
                    .any(|(name, value)| literal.variable().name() == *name
                        && literal.is_positive() == *value)
            })
        })
    }

    #[test]
    fn encode_and_gate_clause_group() {
        let f = encode(&[Gate::binary(GateKind::And, "x", "y", "z")]);
        let clauses: Vec<_> = f.clauses().cloned().collect();
        assert_eq!(
            clauses,
            vec![
                Clause::new(vec![n("y"), n("z"), p("x")]),
                Clause::new(vec![p("y"), n("x")]),
                Clause::new(vec![p("z"), n("x")]),
            ]
        );
    }

    #[test]
    fn encode_not_gate_clause_group() {
        let f = encode(&[Gate::not("y", "x")]);
        let clauses: Vec<_> = f.clauses().cloned().collect();
        assert_eq!(
            clauses,
            vec![
                Clause::new(vec![p("x"), p("y")]),
                Clause::new(vec![n("x"), n("y")]),
            ]
        );
    }

    #[test]
    fn encode_true_gate_is_a_unit_clause() {
        let f = encode(&[Gate::always_true("x")]);
        let clauses: Vec<_> = f.clauses().cloned().collect();
        assert_eq!(clauses, vec![Clause::new(vec![p("x")])]);
    }

    #[test]
    fn encode_empty_gate_list() {
        assert!(encode(&[]).is_empty());
    }

    #[test]
    fn encode_preserves_gate_order() {
        let f = encode(&[
            Gate::always_true("t"),
            Gate::binary(GateKind::Or, "x", "t", "u"),
        ]);
        assert_eq!(f.len(), 4);
        assert_eq!(
            f.clauses().next().unwrap(),
            &Clause::new(vec![p("t")])
        );
        assert_eq!(
            f.clauses().nth(1).unwrap(),
            &Clause::new(vec![p("t"), p("u"), n("x")])
        );
    }

    // The clause group of a gate must be satisfied exactly when
    // output = kind(inputs) holds, for every input combination.
    #[test]
    fn binary_encodings_match_truth_tables() {
        for &kind in BINARY_KINDS {
            let f = encode(&[Gate::binary(kind, "a", "b", "c")]);
            for bits in 0..8u8 {
                let a = bits & 1 != 0;
                let b = bits & 2 != 0;
                let c = bits & 4 != 0;
                let expected = a == kind.eval(b, c);
                assert_eq!(
                    satisfied(&f, &[("a", a), ("b", b), ("c", c)]),
                    expected,
                    "{:?} with a={} b={} c={}",
                    kind,
                    a,
                    b,
                    c
                );
            }
        }
    }

    #[test]
    fn not_encoding_matches_truth_table() {
        let f = encode(&[Gate::not("a", "c")]);
        for bits in 0..4u8 {
            let a = bits & 1 != 0;
            let c = bits & 2 != 0;
            assert_eq!(satisfied(&f, &[("a", a), ("c", c)]), a == !c);
        }
    }

    #[test]
    fn true_encoding_matches_truth_table() {
        let f = encode(&[Gate::always_true("a")]);
        assert!(satisfied(&f, &[("a", true)]));
        assert!(!satisfied(&f, &[("a", false)]));
    }

    #[test]
    fn encode_shares_variables_across_gates() {
        let f = encode(&[
            Gate::binary(GateKind::And, "x", "y", "z"),
            Gate::not("w", "x"),
        ]);
        let variables = f.variables();
        assert_eq!(variables.len(), 4);
    }
}
