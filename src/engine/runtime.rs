//! Ties the atom table, the relation table, the fact store, and the
//! compiled rule set together into the single object a program runs
//! against.

use crate::error::ByteLogError;
use crate::evaluation::query::run_query;
use crate::evaluation::semi_naive::run_fixpoint;
use crate::syntax::ast::{QueryArgAst, RuleAst, TermAst};

use super::rule::{compile_rule, CompiledRule};
use super::storage::FactStore;
use super::symbol_table::SymbolTable;
use super::value::{QueryArg, RelationId, Value};

/// The default fixpoint round budget: a safety cap against a runaway rule
/// set, not a number programs are expected to approach.
pub const DEFAULT_MAX_ROUNDS: u64 = 10_000;

pub struct ByteLogRuntime {
    atoms: SymbolTable,
    relations: SymbolTable,
    store: FactStore,
    rules: Vec<CompiledRule>,
    max_rounds: u64,
    /// Set whenever a fact is inserted or a rule is registered since the
    /// last successful `solve`; lets a repeated `SOLVE` with nothing new to
    /// derive skip straight to a no-op instead of re-scanning every rule.
    dirty: bool,
}

impl ByteLogRuntime {
    pub fn new(max_rounds: u64) -> Self {
        ByteLogRuntime {
            atoms: SymbolTable::new(),
            relations: SymbolTable::new(),
            store: FactStore::new(),
            rules: Vec::new(),
            max_rounds,
            dirty: false,
        }
    }

    pub fn atoms(&self) -> &SymbolTable {
        &self.atoms
    }

    pub fn relations(&self) -> &SymbolTable {
        &self.relations
    }

    pub fn store(&self) -> &FactStore {
        &self.store
    }

    /// `REL <name>` — interning is idempotent, so redeclaring an existing
    /// relation is harmless.
    pub fn declare_relation(&mut self, name: &str) -> RelationId {
        let id = self.relations.intern(name);
        self.store.ensure_relation(id);
        id
    }

    fn resolve_term(&mut self, term: &TermAst) -> Value {
        match term {
            TermAst::Int(value) => *value,
            TermAst::Atom(name) => self.atoms.intern(name) as Value,
        }
    }

    /// `FACT <rel> <a> <b>`. Returns `true` if the fact was new. The
    /// relation need not have been declared by a prior `REL` — first use
    /// registers it, matching the symbol table's declaration-or-first-use
    /// ordering contract.
    pub fn assert_fact(&mut self, relation: &str, a: &TermAst, b: &TermAst) -> bool {
        let rel = self.declare_relation(relation);
        let a = self.resolve_term(a);
        let b = self.resolve_term(b);
        let inserted = self.store.insert(rel, a, b);
        if inserted {
            self.dirty = true;
        }
        inserted
    }

    /// `RULE ...`. Compiles and registers the rule, failing at registration
    /// time rather than partway through a `SOLVE`.
    pub fn register_rule(&mut self, rule: &RuleAst) -> Result<(), ByteLogError> {
        let relations = &mut self.relations;
        let compiled = compile_rule(rule, |name| relations.intern(name))?;

        self.store.ensure_relation(compiled.target);
        for rel in compiled.body_relations() {
            self.store.ensure_relation(rel);
        }

        self.rules.push(compiled);
        self.dirty = true;
        Ok(())
    }

    /// `SOLVE`. A repeated call with nothing changed since the last one is
    /// a true no-op: no rule re-evaluation, no round-0 rescan.
    pub fn solve(&mut self) -> Result<(), ByteLogError> {
        if !self.dirty {
            return Ok(());
        }
        run_fixpoint(&mut self.store, &self.rules, self.max_rounds)?;
        self.dirty = false;
        Ok(())
    }

    /// `<rel> <a> <b>?`. An unresolvable atom argument (one never interned
    /// by any `FACT`/`RULE`) can match nothing, so it short-circuits to an
    /// empty result rather than being treated as a fresh value.
    pub fn query(
        &self,
        relation: &str,
        arg_a: &QueryArgAst,
        arg_b: &QueryArgAst,
    ) -> Vec<(Value, Value)> {
        let Some(rel) = self.relations.lookup(relation) else {
            return Vec::new();
        };
        let (Some(a), Some(b)) = (
            self.resolve_query_arg(arg_a),
            self.resolve_query_arg(arg_b),
        ) else {
            return Vec::new();
        };
        run_query(&self.store, rel, a, b)
    }

    fn resolve_query_arg(&self, arg: &QueryArgAst) -> Option<QueryArg> {
        match arg {
            QueryArgAst::Wildcard => Some(QueryArg::Wildcard),
            QueryArgAst::Concrete(term) => self.resolve_query_term(term).map(QueryArg::Concrete),
        }
    }

    fn resolve_query_term(&self, term: &TermAst) -> Option<Value> {
        match term {
            TermAst::Int(value) => Some(*value),
            TermAst::Atom(name) => self.atoms.lookup(name).map(|id| id as Value),
        }
    }
}
