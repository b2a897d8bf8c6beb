use gatesat::{Clause, Formula, Literal, Solver, Variable};
use rand::Rng;
use std::collections::HashMap;

const VARIABLE_POOL: &[&str] = &["p", "q", "r", "s", "t", "u"];

#[test]
fn fuzz_solver_against_exhaustive_search() {
    for _ in 0..50 {
        test_fuzz_instance();
    }
}

fn test_fuzz_instance() {
    let f = random_formula();
    let exhaustive = solve_by_testing_all_combinations(&f);
    let solution = Solver::new(f.clone()).solve();

    assert_eq!(
        solution.is_satisfiable(),
        exhaustive,
        "solver disagrees with exhaustive search on {:?}",
        f
    );

    if let Some(assignment) = solution.assignment() {
        assert!(
            assignment.satisfies(&f),
            "returned assignment does not satisfy {:?}",
            f
        );
    }
}

fn random_formula() -> Formula {
    let mut rng = rand::thread_rng();

    let num_clauses = rng.gen_range(0, 9);
    let clauses = (0..num_clauses).map(|_| {
        // Size 0 is allowed: an empty clause makes the formula unsatisfiable,
        // which keeps the UNSAT path covered.
        let size = rng.gen_range(0, 4);
        Clause::new((0..size).map(|_| {
            let name = VARIABLE_POOL[rng.gen_range(0, VARIABLE_POOL.len())];
            if rng.gen::<bool>() {
                Literal::Positive(Variable::new(name))
            } else {
                Literal::Negative(Variable::new(name))
            }
        }))
    });
    Formula::new(clauses.collect::<Vec<_>>())
}

fn solve_by_testing_all_combinations(f: &Formula) -> bool {
    let variables: Vec<Variable> = f.variables().into_iter().collect();
    assert!(variables.len() <= 16);

    (0..1u32 << variables.len()).any(|mask| {
        let values: HashMap<&Variable, bool> = variables
            .iter()
            .enumerate()
            .map(|(i, variable)| (variable, mask & (1 << i) != 0))
            .collect();

        f.clauses().all(|clause| {
            clause
                .literals()
                .any(|literal| values[literal.variable()] == literal.is_positive())
        })
    })
}
