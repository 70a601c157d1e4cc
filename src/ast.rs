use std::fmt;

use regex::bytes::Regex;

/// A compiled query: the predicate tree evaluated against each line.
///
/// Built exactly once per run by the parser and never mutated afterwards;
/// evaluation is a pure tree walk, so a query may be shared read-only
/// across threads.
#[derive(Debug, Clone)]
pub enum Query {
    /// Logical negation: -q
    Not(Box<Query>),
    /// Both sides must match: a && b (short-circuits)
    And(Box<Query>, Box<Query>),
    /// Either side may match: a || b (short-circuits)
    Or(Box<Query>, Box<Query>),
    /// Compare a field's value against a literal: key = 3, 0 >= "x", ...
    Compare {
        key: KeyRef,
        op: CompareOp,
        operand: Operand,
    },
    /// Regex match against a field's raw value bytes: key ~ "pattern"
    Match { key: KeyRef, pattern: Regex },
    /// Set membership: key in (a, b, c)
    In { key: KeyRef, set: Vec<Operand> },
}

/// How a predicate addresses a field: by key name or by 0-based position
/// of appearance on the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRef {
    Name(String),
    Position(usize),
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// A literal operand in a comparison or membership set
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Operand {
    /// Numeric view, if this operand is numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Operand::Int(n) => Some(*n as f64),
            Operand::Float(n) => Some(*n),
            Operand::Str(_) => None,
        }
    }

    /// Textual form, used when a comparison degrades to byte ordering.
    pub fn to_text(&self) -> String {
        match self {
            Operand::Int(n) => n.to_string(),
            Operand::Float(n) => n.to_string(),
            Operand::Str(s) => s.clone(),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        };
        write!(f, "{}", s)
    }
}
