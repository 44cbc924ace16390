//! The semi-naive fixpoint driver: repeatedly run every rule until a full
//! round produces no new fact.
//!
//! Round 0 evaluates every rule against the complete fact store. Every
//! round after that evaluates, for each rule, one variant per body-op
//! position — that operation's relation restricted to the facts added in
//! the previous round, every other operation against the full accumulated
//! relation — and unions the results. Insertion into the shared fact store
//! already deduplicates across these variants and across rounds, so the
//! "union" is just "insert every emission".

use ahash::HashMap;

use crate::engine::rule::CompiledRule;
use crate::engine::storage::FactStore;
use crate::engine::value::{RelationId, Value};
use crate::error::ByteLogError;

use super::vm::{emit_triple, eval_bindings, DeltaSource};

/// The facts added in the previous round, indexed for the `JOIN`/`MATCH`
/// lookups semi-naive evaluation needs.
#[derive(Default)]
pub struct Delta {
    facts: HashMap<RelationId, Vec<(Value, Value)>>,
    by_first: HashMap<RelationId, HashMap<Value, Vec<Value>>>,
}

impl Delta {
    fn build(new_facts: &HashMap<RelationId, Vec<(Value, Value)>>) -> Self {
        let mut by_first: HashMap<RelationId, HashMap<Value, Vec<Value>>> = HashMap::default();
        for (&rel, facts) in new_facts {
            let index = by_first.entry(rel).or_default();
            for &(a, b) in facts {
                index.entry(a).or_default().push(b);
            }
        }
        Delta {
            facts: new_facts.clone(),
            by_first,
        }
    }

    pub fn facts_of(&self, rel: RelationId) -> &[(Value, Value)] {
        self.facts.get(&rel).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn by_first_of(&self, rel: RelationId, a: Value) -> impl Iterator<Item = Value> + '_ {
        self.by_first
            .get(&rel)
            .and_then(|index| index.get(&a))
            .into_iter()
            .flat_map(|v| v.iter().copied())
    }
}

/// Evaluates every rule once — fully if `delta` is `None` (round 0),
/// otherwise once per body-op position whose relation has new facts — and
/// inserts every emitted triple. Returns the facts that were genuinely new,
/// keyed by relation, for the next round's delta.
fn evaluate_round(
    store: &mut FactStore,
    rules: &[CompiledRule],
    delta: Option<&Delta>,
) -> HashMap<RelationId, Vec<(Value, Value)>> {
    let mut new_facts: HashMap<RelationId, Vec<(Value, Value)>> = HashMap::default();

    let record = |store: &mut FactStore,
                       new_facts: &mut HashMap<RelationId, Vec<(Value, Value)>>,
                       bindings: Vec<Vec<Value>>,
                       rule: &CompiledRule| {
        for binding in bindings {
            let (rel, a, b) = emit_triple(rule, &binding);
            if store.insert(rel, a, b) {
                new_facts.entry(rel).or_default().push((a, b));
            }
        }
    };

    match delta {
        None => {
            for rule in rules {
                let bindings = eval_bindings(rule, store, None);
                record(store, &mut new_facts, bindings, rule);
            }
        }
        Some(delta) => {
            for rule in rules {
                for (op_index, op) in rule.ops.iter().enumerate() {
                    if delta.facts_of(op.relation()).is_empty() {
                        continue;
                    }
                    let bindings = eval_bindings(
                        rule,
                        store,
                        Some(DeltaSource {
                            delta,
                            restrict_op: op_index,
                        }),
                    );
                    record(store, &mut new_facts, bindings, rule);
                }
            }
        }
    }

    new_facts
}

/// Runs rules to a fixpoint: rounds continue until one produces no new
/// fact, or `max_rounds` is exceeded. Rules are evaluated in registration
/// order each round; this is deterministic for debuggability but not
/// externally observable, since the fact store is a set.
pub fn run_fixpoint(
    store: &mut FactStore,
    rules: &[CompiledRule],
    max_rounds: u64,
) -> Result<(), ByteLogError> {
    let mut rounds: u64 = 1;
    if rounds > max_rounds {
        return Err(ByteLogError::FixpointIterationCapExceeded { rounds });
    }

    let span = tracing::debug_span!("fixpoint_round", round = rounds);
    let _enter = span.enter();
    let mut new_facts = evaluate_round(store, rules, None);
    drop(_enter);

    loop {
        if new_facts.is_empty() {
            tracing::debug!(rounds, "fixpoint reached");
            return Ok(());
        }

        let delta = Delta::build(&new_facts);
        rounds += 1;
        if rounds > max_rounds {
            return Err(ByteLogError::FixpointIterationCapExceeded { rounds });
        }

        let span = tracing::debug_span!("fixpoint_round", round = rounds);
        let _enter = span.enter();
        new_facts = evaluate_round(store, rules, Some(&delta));
    }
}
