//! The parsed program: a tagged sum type over statement and op variants
//! held in a flat `Vec`, not an intrusive linked list with a `next` field.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermAst {
    Int(i64),
    Atom(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyOpAst {
    /// `SCAN <rel>` (no MATCH) or `SCAN <rel> MATCH $<v>`.
    Scan {
        relation: String,
        match_var: Option<usize>,
    },
    /// `JOIN <rel> $<v>`.
    Join { relation: String, var: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitAst {
    pub relation: String,
    pub var_a: usize,
    pub var_b: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleAst {
    pub target: String,
    pub body: Vec<BodyOpAst>,
    pub emit: EmitAst,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryArgAst {
    Concrete(TermAst),
    Wildcard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    RelDecl {
        name: String,
    },
    Fact {
        relation: String,
        a: TermAst,
        b: TermAst,
    },
    Rule(RuleAst),
    Solve,
    Query {
        relation: String,
        arg_a: QueryArgAst,
        arg_b: QueryArgAst,
    },
}

pub type Program = Vec<Statement>;
