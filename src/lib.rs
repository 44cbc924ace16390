//! ByteLog: a small deductive database language over binary relations.
//!
//! A program declares relations, asserts ground facts, and registers rules
//! whose bodies are ordered `SCAN`/`JOIN`/`EMIT` operations; `SOLVE` runs
//! every registered rule to a semi-naive fixpoint, and `QUERY` answers
//! point and pattern lookups against the resulting fact store.

pub mod cli;
pub mod driver;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod syntax;

pub use engine::runtime::{ByteLogRuntime, DEFAULT_MAX_ROUNDS};
pub use error::{ByteLogError, ByteLogResult};
pub use syntax::parser::parse_program;
