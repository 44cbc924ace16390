//! Compiling a parsed rule body into the op list the VM executes.
//!
//! Compilation happens once, at registration time, and rejects malformed
//! bodies immediately so `SOLVE` never has to fail halfway through a round.

use crate::error::ByteLogError;
use crate::syntax::ast::{BodyOpAst, RuleAst};

use super::value::RelationId;

/// A single body operation, relation names already resolved to ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Seeds the register vector from every fact of `rel`: `reg = [a, b]`.
    /// Only legal as the first operation of a rule body.
    Scan { rel: RelationId },
    /// `SCAN rel MATCH $var` — `var` must already be bound; restricts to
    /// facts whose first column equals `reg[var]` and pushes the second
    /// column as a new register.
    ScanMatch { rel: RelationId, var: usize },
    /// `JOIN rel $var` — identical runtime behavior to `ScanMatch`, kept as
    /// a distinct variant for provenance in traces and error messages.
    Join { rel: RelationId, var: usize },
}

impl Op {
    pub fn relation(&self) -> RelationId {
        match *self {
            Op::Scan { rel } | Op::ScanMatch { rel, .. } | Op::Join { rel, .. } => rel,
        }
    }
}

/// A rule as the fixpoint driver and VM see it: a target relation, a
/// compiled op list, and an emit template naming two registers.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub target: RelationId,
    pub ops: Vec<Op>,
    pub emit_a: usize,
    pub emit_b: usize,
}

impl CompiledRule {
    /// Every relation id this rule's body reads from, including repeats.
    pub fn body_relations(&self) -> impl Iterator<Item = RelationId> + '_ {
        self.ops.iter().map(Op::relation)
    }
}

/// Resolves a rule's relation names to ids via `resolve`, type-checks the
/// register references, and rejects a malformed body.
pub fn compile_rule(
    rule: &RuleAst,
    mut resolve: impl FnMut(&str) -> RelationId,
) -> Result<CompiledRule, ByteLogError> {
    let fail = |message: String| ByteLogError::RuleCompile {
        line: rule.line,
        column: rule.column,
        message,
    };

    if rule.body.is_empty() {
        return Err(fail("rule body must not be empty".to_string()));
    }

    let mut ops = Vec::with_capacity(rule.body.len());
    let mut reg_len = 0usize;

    for (index, op) in rule.body.iter().enumerate() {
        match op {
            BodyOpAst::Scan {
                relation,
                match_var: None,
            } => {
                if index != 0 {
                    return Err(fail(
                        "SCAN without MATCH may only be the first body operation".to_string(),
                    ));
                }
                ops.push(Op::Scan {
                    rel: resolve(relation),
                });
                reg_len = 2;
            }
            BodyOpAst::Scan {
                relation,
                match_var: Some(var),
            } => {
                if index == 0 {
                    return Err(fail(
                        "the first body operation must be a plain SCAN (MATCH has nothing bound yet)"
                            .to_string(),
                    ));
                }
                if *var >= reg_len {
                    return Err(fail(format!(
                        "MATCH references unbound register ${var}"
                    )));
                }
                ops.push(Op::ScanMatch {
                    rel: resolve(relation),
                    var: *var,
                });
                reg_len += 1;
            }
            BodyOpAst::Join { relation, var } => {
                if index == 0 {
                    return Err(fail(
                        "the first body operation must be a SCAN".to_string(),
                    ));
                }
                if *var >= reg_len {
                    return Err(fail(format!("JOIN references unbound register ${var}")));
                }
                ops.push(Op::Join {
                    rel: resolve(relation),
                    var: *var,
                });
                reg_len += 1;
            }
        }
    }

    if rule.emit.relation != rule.target {
        return Err(fail(format!(
            "EMIT target '{}' does not match rule target '{}'",
            rule.emit.relation, rule.target
        )));
    }
    if rule.emit.var_a >= reg_len {
        return Err(fail(format!(
            "EMIT references unbound register ${}",
            rule.emit.var_a
        )));
    }
    if rule.emit.var_b >= reg_len {
        return Err(fail(format!(
            "EMIT references unbound register ${}",
            rule.emit.var_b
        )));
    }

    Ok(CompiledRule {
        target: resolve(&rule.target),
        ops,
        emit_a: rule.emit.var_a,
        emit_b: rule.emit.var_b,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::ast::EmitAst;

    fn resolver() -> impl FnMut(&str) -> RelationId {
        let mut next = 0u32;
        let mut seen = std::collections::HashMap::new();
        move |name: &str| {
            *seen.entry(name.to_string()).or_insert_with(|| {
                let id = next;
                next += 1;
                id
            })
        }
    }

    fn rule(body: Vec<BodyOpAst>, emit: EmitAst) -> RuleAst {
        RuleAst {
            target: emit.relation.clone(),
            body,
            emit,
            line: 1,
            column: 1,
        }
    }

    #[test]
    fn rejects_empty_body() {
        let r = rule(
            vec![],
            EmitAst {
                relation: "r".to_string(),
                var_a: 0,
                var_b: 1,
            },
        );
        assert!(matches!(
            compile_rule(&r, resolver()),
            Err(ByteLogError::RuleCompile { .. })
        ));
    }

    #[test]
    fn rejects_non_scan_first_op() {
        let r = rule(
            vec![BodyOpAst::Join {
                relation: "e".to_string(),
                var: 0,
            }],
            EmitAst {
                relation: "r".to_string(),
                var_a: 0,
                var_b: 1,
            },
        );
        assert!(matches!(
            compile_rule(&r, resolver()),
            Err(ByteLogError::RuleCompile { .. })
        ));
    }

    #[test]
    fn rejects_unbound_register_in_join() {
        let r = rule(
            vec![
                BodyOpAst::Scan {
                    relation: "e".to_string(),
                    match_var: None,
                },
                BodyOpAst::Join {
                    relation: "e".to_string(),
                    var: 5,
                },
            ],
            EmitAst {
                relation: "r".to_string(),
                var_a: 0,
                var_b: 2,
            },
        );
        assert!(matches!(
            compile_rule(&r, resolver()),
            Err(ByteLogError::RuleCompile { .. })
        ));
    }

    #[test]
    fn rejects_unbound_register_in_emit() {
        let r = rule(
            vec![BodyOpAst::Scan {
                relation: "e".to_string(),
                match_var: None,
            }],
            EmitAst {
                relation: "r".to_string(),
                var_a: 0,
                var_b: 9,
            },
        );
        assert!(matches!(
            compile_rule(&r, resolver()),
            Err(ByteLogError::RuleCompile { .. })
        ));
    }

    #[test]
    fn accepts_a_well_formed_recursive_rule() {
        let r = rule(
            vec![
                BodyOpAst::Scan {
                    relation: "parent".to_string(),
                    match_var: None,
                },
                BodyOpAst::Join {
                    relation: "ancestor".to_string(),
                    var: 1,
                },
            ],
            EmitAst {
                relation: "ancestor".to_string(),
                var_a: 0,
                var_b: 2,
            },
        );
        let compiled = compile_rule(&r, resolver()).unwrap();
        assert_eq!(compiled.ops.len(), 2);
        assert_eq!(compiled.emit_a, 0);
        assert_eq!(compiled.emit_b, 2);
    }

    #[test]
    fn rejects_mismatched_emit_target() {
        let r = RuleAst {
            target: "a".to_string(),
            body: vec![BodyOpAst::Scan {
                relation: "e".to_string(),
                match_var: None,
            }],
            emit: EmitAst {
                relation: "b".to_string(),
                var_a: 0,
                var_b: 1,
            },
            line: 1,
            column: 1,
        };
        assert!(matches!(
            compile_rule(&r, resolver()),
            Err(ByteLogError::RuleCompile { .. })
        ));
    }
}
