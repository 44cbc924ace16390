//! Pattern queries: `relation(arg_a, arg_b)?` where each argument is either
//! a concrete value or a wildcard `_`.

use crate::engine::storage::FactStore;
use crate::engine::value::{QueryArg, RelationId, Value};

/// Evaluates a query against the fact store, dispatching on which
/// arguments are concrete versus wildcard. An unknown relation simply has
/// no facts, so it answers like any other empty relation rather than
/// erroring.
pub fn run_query(
    store: &FactStore,
    rel: RelationId,
    arg_a: QueryArg,
    arg_b: QueryArg,
) -> Vec<(Value, Value)> {
    match (arg_a, arg_b) {
        (QueryArg::Concrete(a), QueryArg::Concrete(b)) => {
            if store.contains(rel, a, b) {
                vec![(a, b)]
            } else {
                Vec::new()
            }
        }
        (QueryArg::Concrete(a), QueryArg::Wildcard) => {
            store.lookup_by_first(rel, a).map(|b| (a, b)).collect()
        }
        (QueryArg::Wildcard, QueryArg::Concrete(b)) => {
            store.lookup_by_second(rel, b).map(|a| (a, b)).collect()
        }
        (QueryArg::Wildcard, QueryArg::Wildcard) => store.iter(rel).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> FactStore {
        let mut store = FactStore::new();
        store.insert(0, 1, 2);
        store.insert(0, 1, 3);
        store.insert(0, 4, 2);
        store
    }

    #[test]
    fn both_concrete_hit() {
        let store = sample_store();
        assert_eq!(
            run_query(&store, 0, QueryArg::Concrete(1), QueryArg::Concrete(2)),
            vec![(1, 2)]
        );
    }

    #[test]
    fn both_concrete_miss() {
        let store = sample_store();
        assert!(run_query(&store, 0, QueryArg::Concrete(1), QueryArg::Concrete(9)).is_empty());
    }

    #[test]
    fn first_concrete_second_wildcard() {
        let store = sample_store();
        let mut results = run_query(&store, 0, QueryArg::Concrete(1), QueryArg::Wildcard);
        results.sort();
        assert_eq!(results, vec![(1, 2), (1, 3)]);
    }

    #[test]
    fn first_wildcard_second_concrete() {
        let store = sample_store();
        let mut results = run_query(&store, 0, QueryArg::Wildcard, QueryArg::Concrete(2));
        results.sort();
        assert_eq!(results, vec![(1, 2), (4, 2)]);
    }

    #[test]
    fn both_wildcard_returns_everything() {
        let store = sample_store();
        let mut results = run_query(&store, 0, QueryArg::Wildcard, QueryArg::Wildcard);
        results.sort();
        assert_eq!(results, vec![(1, 2), (1, 3), (4, 2)]);
    }

    #[test]
    fn unknown_relation_is_empty() {
        let store = sample_store();
        assert!(run_query(&store, 99, QueryArg::Wildcard, QueryArg::Wildcard).is_empty());
    }
}
