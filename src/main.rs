use clap::{App, Arg};
use gatesat::formula::dimacs::{parse, DimacsParseError};
use gatesat::formula::Formula;
use gatesat::*;
use std::fs::File;

fn main() {
    env_logger::init();

    let matches = App::new("gatesat")
        .arg(Arg::with_name("INPUT").help("input file (in CNF)").index(1))
        .arg(
            Arg::with_name("fail-fast")
                .long("fail-fast")
                .help("give up on a search level at the first propagation conflict"),
        )
        .arg(
            Arg::with_name("trace")
                .long("trace")
                .help("print the decision trace"),
        )
        .get_matches();

    let f = if let Some(path) = matches.value_of("INPUT") {
        parse_from_file(path)
    } else {
        parse(std::io::stdin())
    };

    match f {
        Ok(f) => {
            let solution = Solver::new(f)
                .fail_fast(matches.is_present("fail-fast"))
                .solve();

            if matches.is_present("trace") {
                for step in solution.trace() {
                    println!("c [{}] {}", step.path(), step.description());
                }
            }

            let exit_code = match solution.result() {
                SatResult::Satisfiable(assignment) => {
                    println!("s SATISFIABLE");
                    for (variable, value) in assignment.iter() {
                        println!("v {} = {}", variable, value);
                    }
                    0
                }
                SatResult::Unsatisfiable => {
                    println!("s UNSATISFIABLE");
                    1
                }
            };
            std::process::exit(exit_code);
        }
        Err(e) => {
            eprintln!("parse error: {:?}", e);
            std::process::exit(-1);
        }
    }
}

fn parse_from_file(path: &str) -> Result<Formula, DimacsParseError> {
    let file = File::open(path)?;
    parse(file)
}
