//! The rule body as a linear, register-based virtual machine.
//!
//! Evaluates a compiled rule into the bindings it derives, using staged
//! materialization (one batch per op) rather than depth-first nested
//! iteration — simpler to get right, and an explicitly licensed tradeoff.

use crate::engine::rule::{CompiledRule, Op};
use crate::engine::storage::FactStore;
use crate::engine::value::Value;

use super::semi_naive::Delta;

/// Which data source a single op position should read from: the full
/// accumulated relation, or (for semi-naive rounds) one relation's delta.
#[derive(Clone, Copy)]
pub struct DeltaSource<'a> {
    pub delta: &'a Delta,
    pub restrict_op: usize,
}

/// Runs `rule`'s body to completion, producing one register vector per
/// derivable binding. `source` is `None` for a full (non-incremental)
/// evaluation; `Some` restricts exactly one body operation to its
/// relation's delta, per the semi-naive rewrite in the fixpoint driver.
pub fn eval_bindings(
    rule: &CompiledRule,
    store: &FactStore,
    source: Option<DeltaSource<'_>>,
) -> Vec<Vec<Value>> {
    let mut bindings: Vec<Vec<Value>> = Vec::new();

    for (index, op) in rule.ops.iter().enumerate() {
        let use_delta = matches!(source, Some(s) if s.restrict_op == index);

        match op {
            Op::Scan { rel } => {
                bindings = if use_delta {
                    source
                        .unwrap()
                        .delta
                        .facts_of(*rel)
                        .iter()
                        .map(|&(a, b)| vec![a, b])
                        .collect()
                } else {
                    store.iter(*rel).map(|(a, b)| vec![a, b]).collect()
                };
            }
            Op::ScanMatch { rel, var } | Op::Join { rel, var } => {
                let mut next = Vec::new();
                for reg in bindings.drain(..) {
                    let key = reg[*var];
                    if use_delta {
                        for b in source.unwrap().delta.by_first_of(*rel, key) {
                            let mut extended = reg.clone();
                            extended.push(b);
                            next.push(extended);
                        }
                    } else {
                        for b in store.lookup_by_first(*rel, key) {
                            let mut extended = reg.clone();
                            extended.push(b);
                            next.push(extended);
                        }
                    }
                }
                bindings = next;
            }
        }
    }

    bindings
}

/// Applies a rule's emit template to a completed binding vector.
pub fn emit_triple(rule: &CompiledRule, binding: &[Value]) -> (u32, Value, Value) {
    (rule.target, binding[rule.emit_a], binding[rule.emit_b])
}
