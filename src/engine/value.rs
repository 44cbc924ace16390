//! The value domain shared by every fact argument.

/// An id drawn from the single namespace facts live in: either the numeric
/// value of an integer literal, or the id an atom literal interned to.
pub type Value = i64;

/// A relation identifier, dense and assigned in declaration/first-use order.
pub type RelationId = u32;

/// A query argument: a concrete value to match, or a wildcard that matches
/// anything. Kept as an explicit sum type rather than a smuggled sentinel
/// in the value domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryArg {
    Concrete(Value),
    Wildcard,
}
