//! The fact store: a set of `(relation, a, b)` triples with secondary
//! indexes for join lookup, keyed on an integer relation id and a fixed
//! two-column tuple rather than an arbitrary-arity, typed ground atom.

use ahash::{HashMap, HashMapExt};
use indexmap::IndexSet;

use super::value::{RelationId, Value};

type FactSet = IndexSet<(Value, Value), ahash::RandomState>;
type AdjacencyIndex = HashMap<Value, IndexSet<Value, ahash::RandomState>>;

#[derive(Default)]
struct RelationIndex {
    facts: FactSet,
    by_first: AdjacencyIndex,
    by_second: AdjacencyIndex,
}

/// All facts for every relation, plus the adjacency indexes `JOIN` and
/// pattern queries read from.
#[derive(Default)]
pub struct FactStore {
    relations: HashMap<RelationId, RelationIndex>,
}

impl FactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures `rel` has storage, even if it never receives a fact — so an
    /// empty relation still answers `iter`/`lookup_*` instead of being
    /// indistinguishable from an unknown one.
    pub fn ensure_relation(&mut self, rel: RelationId) {
        self.relations.entry(rel).or_default();
    }

    /// Inserts `(a, b)` into `rel`. Returns `true` iff the triple was not
    /// already present; updates both adjacency indexes in the same step, so
    /// `facts`/`by_first`/`by_second` never disagree.
    pub fn insert(&mut self, rel: RelationId, a: Value, b: Value) -> bool {
        let index = self.relations.entry(rel).or_default();
        if !index.facts.insert((a, b)) {
            return false;
        }
        index.by_first.entry(a).or_default().insert(b);
        index.by_second.entry(b).or_default().insert(a);
        true
    }

    pub fn contains(&self, rel: RelationId, a: Value, b: Value) -> bool {
        self.relations
            .get(&rel)
            .map(|index| index.facts.contains(&(a, b)))
            .unwrap_or(false)
    }

    pub fn iter(&self, rel: RelationId) -> impl Iterator<Item = (Value, Value)> + '_ {
        self.relations
            .get(&rel)
            .into_iter()
            .flat_map(|index| index.facts.iter().copied())
    }

    /// All `b` such that `(rel, a, b)` is stored. The hot path for `JOIN`.
    pub fn lookup_by_first(&self, rel: RelationId, a: Value) -> impl Iterator<Item = Value> + '_ {
        self.relations
            .get(&rel)
            .and_then(|index| index.by_first.get(&a))
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// All `a` such that `(rel, a, b)` is stored. Needed for queries with
    /// the first column a wildcard and the second bound.
    pub fn lookup_by_second(&self, rel: RelationId, b: Value) -> impl Iterator<Item = Value> + '_ {
        self.relations
            .get(&rel)
            .and_then(|index| index.by_second.get(&b))
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn relation_len(&self, rel: RelationId) -> usize {
        self.relations.get(&rel).map(|i| i.facts.len()).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.relations.values().map(|i| i.facts.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_novelty() {
        let mut store = FactStore::new();
        assert!(store.insert(0, 1, 2));
        assert!(!store.insert(0, 1, 2));
        assert_eq!(store.relation_len(0), 1);
    }

    #[test]
    fn dedup_across_many_inserts() {
        let mut store = FactStore::new();
        for _ in 0..10 {
            store.insert(0, 1, 2);
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn index_consistency() {
        let mut store = FactStore::new();
        store.insert(0, 1, 2);
        store.insert(0, 1, 3);
        store.insert(0, 4, 2);

        let mut from_first: Vec<_> = store
            .iter(0)
            .flat_map(|(a, _)| store.lookup_by_first(0, a).map(move |b| (a, b)))
            .collect();
        from_first.sort();
        let mut all: Vec<_> = store.iter(0).collect();
        all.sort();
        assert_eq!(from_first, all);

        let mut from_second: Vec<_> = store
            .iter(0)
            .flat_map(|(_, b)| store.lookup_by_second(0, b).map(move |a| (a, b)))
            .collect();
        from_second.sort();
        assert_eq!(from_second, all);
    }

    #[test]
    fn unknown_relation_is_empty_not_error() {
        let store = FactStore::new();
        assert!(!store.contains(99, 1, 2));
        assert_eq!(store.iter(99).count(), 0);
        assert_eq!(store.lookup_by_first(99, 1).count(), 0);
        assert_eq!(store.lookup_by_second(99, 1).count(), 0);
    }

    #[test]
    fn monotone_growth_only() {
        let mut store = FactStore::new();
        store.insert(0, 1, 2);
        let before = store.len();
        store.insert(0, 1, 2);
        store.insert(0, 3, 4);
        assert!(store.len() >= before);
    }
}
