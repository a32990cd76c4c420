//! Construction-time errors.

/// Errors raised while defining a grammar.
///
/// All of these abort grammar preparation entirely; none is deferred to
/// match time. Variants carry the innermost named rule being defined when
/// one is available.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// A value could not be converted to a rule of this parser.
    #[error("`{value}` cannot be converted to a rule of this parser{}", in_rule(.rule))]
    Coercion {
        value: String,
        rule: Option<String>,
    },

    /// A positive character set with no characters can never match.
    #[error("character set must contain at least one character{}", in_rule(.rule))]
    EmptyCharSet { rule: Option<String> },

    /// Character range whose start exceeds its end.
    #[error("invalid character range '{lo}'..'{hi}'{}", in_rule(.rule))]
    InvalidCharRange {
        lo: char,
        hi: char,
        rule: Option<String>,
    },

    /// Ordered choice over zero alternatives.
    #[error("ordered choice requires at least one alternative{}", in_rule(.rule))]
    EmptyFirstOf { rule: Option<String> },

    /// A scope marker level outside the supported 1..=4 range.
    #[error("scope marker level {count} is outside the supported range 1..=4{}", in_rule(.rule))]
    MarkerOutOfRange { count: u8, rule: Option<String> },

    /// The net scope shift exceeded the maximum supported depth of 4.
    #[error("scope shift of {shift} exceeds the supported maximum depth of 4{}", in_rule(.rule))]
    ShiftTooDeep { shift: u8, rule: Option<String> },

    /// A reversal requested more levels down than were shifted up.
    #[error(
        "scope reversal by {count} exceeds the prior forward shift of {shift}{}",
        in_rule(.rule)
    )]
    ReversalUnderflow {
        shift: u8,
        count: u8,
        rule: Option<String>,
    },

    /// A named rule resolved to its own placeholder: it makes no progress
    /// and can never match.
    #[error("rule `{rule}` resolves to itself and can never make progress")]
    NoProgress { rule: String },

    /// `finish` was handed a rule id that is not a live node of this arena.
    #[error("r{id} is not a valid root for this grammar")]
    InvalidRoot { id: u32 },

    /// A recursion placeholder was never resolved, which means a named rule
    /// definition was abandoned before completing.
    #[error("rule construction left an unresolved placeholder at r{id}")]
    UnresolvedPlaceholder { id: u32 },
}

fn in_rule(rule: &Option<String>) -> String {
    match rule {
        Some(rule) => format!(" (while defining `{rule}`)"),
        None => String::new(),
    }
}
