//! Explicit character sets with "all but" negation.

use std::fmt;

/// A set of characters, either positive ("any of these") or negated
/// ("any character except these").
///
/// Characters are stored sorted and deduplicated so two sets built from
/// the same characters in any order compare and hash equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CharSet {
    chars: Vec<char>,
    negated: bool,
}

impl CharSet {
    /// Set matching any of the given characters.
    pub fn of(chars: impl IntoIterator<Item = char>) -> Self {
        Self::build(chars, false)
    }

    /// Set matching any character except the given ones.
    pub fn all_but(chars: impl IntoIterator<Item = char>) -> Self {
        Self::build(chars, true)
    }

    fn build(chars: impl IntoIterator<Item = char>, negated: bool) -> Self {
        let mut chars: Vec<char> = chars.into_iter().collect();
        chars.sort_unstable();
        chars.dedup();
        Self { chars, negated }
    }

    /// Whether the given character is in the set.
    pub fn contains(&self, c: char) -> bool {
        self.chars.binary_search(&c).is_ok() != self.negated
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// The explicit characters, sorted. For a negated set these are the
    /// excluded characters.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Whether the explicit character list is empty.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

impl fmt::Display for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("^")?;
        }
        f.write_str("[")?;
        for c in &self.chars {
            write!(f, "{c}")?;
        }
        f.write_str("]")
    }
}
