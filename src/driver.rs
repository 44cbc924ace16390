//! Walks a parsed program against a runtime, statement by statement, and
//! collects a displayable outcome for each one.
//!
//! `SOLVE` and `QUERY` are the only statements a caller usually cares about
//! the result of, but every statement gets an outcome so a front end can
//! echo the whole program's effect if it wants to.

use std::fmt;

use crate::engine::runtime::ByteLogRuntime;
use crate::engine::symbol_table::SymbolTable;
use crate::engine::value::Value;
use crate::error::ByteLogError;
use crate::syntax::ast::{Program, Statement};

/// A value as it should be shown to a human: the interned atom name if the
/// id was ever assigned to one, otherwise the raw integer. Since atom ids
/// and integer literals share one namespace, this is a display preference,
/// not a type distinction the engine itself makes.
fn display_value(atoms: &SymbolTable, value: Value) -> String {
    if value >= 0 {
        if let Some(name) = atoms.name(value as u32) {
            return name.to_string();
        }
    }
    value.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementOutcome {
    RelationDeclared {
        name: String,
    },
    FactAsserted {
        relation: String,
        was_new: bool,
    },
    RuleRegistered {
        target: String,
    },
    Solved,
    QueryResult {
        relation: String,
        rows: Vec<(String, String)>,
    },
}

impl fmt::Display for StatementOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementOutcome::RelationDeclared { name } => write!(f, "REL {name}"),
            StatementOutcome::FactAsserted { relation, was_new } => {
                let tag = if *was_new { "new" } else { "duplicate" };
                write!(f, "FACT {relation} ({tag})")
            }
            StatementOutcome::RuleRegistered { target } => write!(f, "RULE {target} registered"),
            StatementOutcome::Solved => write!(f, "SOLVE complete"),
            StatementOutcome::QueryResult { relation, rows } => {
                if rows.is_empty() {
                    write!(f, "QUERY {relation}: (no matches)")
                } else {
                    writeln!(f, "QUERY {relation}:")?;
                    for (index, (a, b)) in rows.iter().enumerate() {
                        if index > 0 {
                            writeln!(f)?;
                        }
                        write!(f, "  {relation}({a}, {b})")?;
                    }
                    Ok(())
                }
            }
        }
    }
}

/// Runs every statement of `program` against `runtime` in order, stopping
/// at the first error (a parse error can't reach here; a rule compile
/// error or a fixpoint cap can).
pub fn run_program(
    runtime: &mut ByteLogRuntime,
    program: &Program,
) -> Result<Vec<StatementOutcome>, ByteLogError> {
    let mut outcomes = Vec::with_capacity(program.len());

    for statement in program {
        let outcome = match statement {
            Statement::RelDecl { name } => {
                runtime.declare_relation(name);
                StatementOutcome::RelationDeclared { name: name.clone() }
            }
            Statement::Fact { relation, a, b } => {
                let was_new = runtime.assert_fact(relation, a, b);
                StatementOutcome::FactAsserted {
                    relation: relation.clone(),
                    was_new,
                }
            }
            Statement::Rule(rule) => {
                runtime.register_rule(rule)?;
                StatementOutcome::RuleRegistered {
                    target: rule.target.clone(),
                }
            }
            Statement::Solve => {
                runtime.solve()?;
                StatementOutcome::Solved
            }
            Statement::Query {
                relation,
                arg_a,
                arg_b,
            } => {
                let rows = runtime
                    .query(relation, arg_a, arg_b)
                    .into_iter()
                    .map(|(a, b)| {
                        (
                            display_value(runtime.atoms(), a),
                            display_value(runtime.atoms(), b),
                        )
                    })
                    .collect();
                StatementOutcome::QueryResult {
                    relation: relation.clone(),
                    rows,
                }
            }
        };
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::runtime::DEFAULT_MAX_ROUNDS;
    use crate::syntax::parser::parse_program;

    #[test]
    fn reachability_end_to_end() {
        let source = "\
            REL edge\n\
            FACT edge a b\n\
            FACT edge b c\n\
            FACT edge c d\n\
            RULE reach: SCAN edge, EMIT reach $0 $1\n\
            RULE reach: SCAN edge, JOIN reach $1, EMIT reach $0 $2\n\
            SOLVE\n\
            QUERY reach a ?\n\
        ";
        let program = parse_program(source).unwrap();
        let mut runtime = ByteLogRuntime::new(DEFAULT_MAX_ROUNDS);
        let outcomes = run_program(&mut runtime, &program).unwrap();

        let StatementOutcome::QueryResult { rows, .. } = outcomes.last().unwrap() else {
            panic!("expected a query result");
        };
        let mut rows = rows.clone();
        rows.sort();
        assert_eq!(
            rows,
            vec![
                ("a".to_string(), "b".to_string()),
                ("a".to_string(), "c".to_string()),
                ("a".to_string(), "d".to_string()),
            ]
        );
    }

    #[test]
    fn duplicate_fact_is_reported_but_not_an_error() {
        let program = parse_program("FACT r 1 2\nFACT r 1 2\n").unwrap();
        let mut runtime = ByteLogRuntime::new(DEFAULT_MAX_ROUNDS);
        let outcomes = run_program(&mut runtime, &program).unwrap();
        assert_eq!(
            outcomes,
            vec![
                StatementOutcome::FactAsserted {
                    relation: "r".to_string(),
                    was_new: true
                },
                StatementOutcome::FactAsserted {
                    relation: "r".to_string(),
                    was_new: false
                },
            ]
        );
    }

    #[test]
    fn malformed_rule_aborts_the_program() {
        let program = parse_program("RULE r: JOIN e $0, EMIT r $0 $1\n").unwrap();
        let mut runtime = ByteLogRuntime::new(DEFAULT_MAX_ROUNDS);
        assert!(matches!(
            run_program(&mut runtime, &program),
            Err(ByteLogError::RuleCompile { .. })
        ));
    }
}
