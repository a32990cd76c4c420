//! Construction cache keys and slots.
//!
//! Every rule-defining call is identified by the operation performed plus
//! its structurally-compared arguments. Built-in combinators carry fixed
//! operation codes; named rules are keyed by their registered name.

use pegra_core::{CharSet, RuleId};

/// Operation codes for the built-in combinators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Op {
    Ch,
    CharIgnoreCase,
    CharRange,
    CharSet,
    Str,
    StrIgnoreCase,
    Sequence,
    FirstOf,
    Optional,
    ZeroOrMore,
    OneOrMore,
    Test,
    TestNot,
    Action,
    Empty,
    Any,
    Eoi,
}

/// Identity of the defining operation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum KeyOp {
    Builtin(Op),
    Named(String),
}

/// One structurally-compared argument of a rule-defining call.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum KeyArg {
    Char(char),
    CharPair(char, char),
    Chars(Vec<char>),
    Set(CharSet),
    Rule(RuleId),
    /// Action identity is the function pointer address.
    ActionPtr(usize),
    /// The resolved scope shift an action was constructed under.
    Shift(u8),
}

/// Cache key: defining operation plus ordered argument list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Key {
    op: KeyOp,
    args: Vec<KeyArg>,
}

impl Key {
    pub(crate) fn builtin(op: Op, args: Vec<KeyArg>) -> Self {
        Self {
            op: KeyOp::Builtin(op),
            args,
        }
    }

    pub(crate) fn named(name: &str, args: Vec<KeyArg>) -> Self {
        Self {
            op: KeyOp::Named(name.to_string()),
            args,
        }
    }
}

/// State of a cache entry.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Slot {
    /// The defining body for this key is currently running. A recursive
    /// re-entry allocates one placeholder slot; further re-entries reuse it.
    InProgress { placeholder: Option<RuleId> },
    /// Construction completed; every caller observes this node.
    Finished(RuleId),
}
