//! Literal coercion: heterogeneous rule-call arguments and the overridable
//! hooks that turn them into matcher nodes.

use pegra_core::{ActionFn, RuleId};

use crate::builder::Builder;
use crate::error::BuildError;

/// A value accepted where a rule is expected.
///
/// The closed set of shapes `to_rule` dispatches on: an existing rule
/// handle, a single character, a string, a raw character sequence, or an
/// action callback.
pub enum Lit<V> {
    Rule(RuleId),
    Char(char),
    Str(String),
    Chars(Vec<char>),
    Action(ActionFn<V>),
}

impl<V> Lit<V> {
    /// Short description of the value, for coercion error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Lit::Rule(id) => id.to_string(),
            Lit::Char(c) => format!("'{c}'"),
            Lit::Str(s) => format!("\"{s}\""),
            Lit::Chars(chars) => format!("{:?}", chars.iter().collect::<String>()),
            Lit::Action(f) => format!("action@{:#x}", *f as usize),
        }
    }
}

impl<V> Clone for Lit<V> {
    fn clone(&self) -> Self {
        match self {
            Lit::Rule(id) => Lit::Rule(*id),
            Lit::Char(c) => Lit::Char(*c),
            Lit::Str(s) => Lit::Str(s.clone()),
            Lit::Chars(chars) => Lit::Chars(chars.clone()),
            Lit::Action(f) => Lit::Action(*f),
        }
    }
}

impl<V> std::fmt::Debug for Lit<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Lit({})", self.describe())
    }
}

impl<V> From<RuleId> for Lit<V> {
    fn from(id: RuleId) -> Self {
        Lit::Rule(id)
    }
}

impl<V> From<char> for Lit<V> {
    fn from(c: char) -> Self {
        Lit::Char(c)
    }
}

impl<V> From<&str> for Lit<V> {
    fn from(s: &str) -> Self {
        Lit::Str(s.to_string())
    }
}

impl<V> From<String> for Lit<V> {
    fn from(s: String) -> Self {
        Lit::Str(s)
    }
}

impl<V> From<&[char]> for Lit<V> {
    fn from(chars: &[char]) -> Self {
        Lit::Chars(chars.to_vec())
    }
}

impl<V> From<Vec<char>> for Lit<V> {
    fn from(chars: Vec<char>) -> Self {
        Lit::Chars(chars)
    }
}

impl<V> From<ActionFn<V>> for Lit<V> {
    fn from(f: ActionFn<V>) -> Self {
        Lit::Action(f)
    }
}

/// Per-parser literal coercion hooks.
///
/// A derived grammar can replace these to inject cross-cutting behavior at
/// every literal call site, e.g. transparently appending whitespace
/// skipping after each matched literal, without changing the rule bodies.
pub struct CoercionHooks<V> {
    pub from_char_literal: fn(&mut Builder<V>, char) -> Result<RuleId, BuildError>,
    pub from_string_literal: fn(&mut Builder<V>, &str) -> Result<RuleId, BuildError>,
    pub from_char_array: fn(&mut Builder<V>, &[char]) -> Result<RuleId, BuildError>,
}

impl<V> Default for CoercionHooks<V> {
    fn default() -> Self {
        Self {
            from_char_literal: default_from_char_literal,
            from_string_literal: default_from_string_literal,
            from_char_array: default_from_char_array,
        }
    }
}

impl<V> Clone for CoercionHooks<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for CoercionHooks<V> {}

fn default_from_char_literal<V>(b: &mut Builder<V>, c: char) -> Result<RuleId, BuildError> {
    b.ch(c)
}

fn default_from_string_literal<V>(b: &mut Builder<V>, s: &str) -> Result<RuleId, BuildError> {
    let chars: Vec<char> = s.chars().collect();
    let from_char_array = b.hooks().from_char_array;
    from_char_array(b, &chars)
}

fn default_from_char_array<V>(b: &mut Builder<V>, chars: &[char]) -> Result<RuleId, BuildError> {
    b.string_chars(chars)
}
