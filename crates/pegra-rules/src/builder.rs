//! The rule factory: combinator constructors, construction cache and scope
//! resolution.

use indexmap::IndexMap;

use pegra_core::{ActionFn, CharSet, MatcherKind, RuleGraph, RuleId};

use crate::cache::{Key, KeyArg, Op, Slot};
use crate::coerce::{CoercionHooks, Lit};
use crate::error::BuildError;
use crate::grammar::Grammar;

/// Maximum supported scope shift depth.
const MAX_SHIFT: u8 = 4;

/// Builds one grammar: owns the arena under construction, the construction
/// cache, the coercion hooks and the scope-resolver state.
///
/// Every constructor is a cached rule-defining call: invoking it twice with
/// equal arguments yields the same node both times. Consuming the builder
/// with [`Builder::finish`] freezes the arena into a read-only [`Grammar`].
pub struct Builder<V> {
    graph: RuleGraph<V>,
    cache: IndexMap<Key, Slot>,
    hooks: CoercionHooks<V>,
    /// Net scope shift accumulated from enclosing `up`/`down` markers.
    shift: u8,
    /// Stack of named rules currently being defined, for error context.
    defining: Vec<String>,
}

impl<V> Builder<V> {
    pub fn new() -> Self {
        Self::with_hooks(CoercionHooks::default())
    }

    /// Builder with custom literal coercion hooks.
    pub fn with_hooks(hooks: CoercionHooks<V>) -> Self {
        Self {
            graph: RuleGraph::new(),
            cache: IndexMap::new(),
            hooks,
            shift: 0,
            defining: Vec::new(),
        }
    }

    pub fn hooks(&self) -> CoercionHooks<V> {
        self.hooks
    }

    /// The arena under construction. Read-only access for inspection; all
    /// mutation goes through the constructors.
    pub fn graph(&self) -> &RuleGraph<V> {
        &self.graph
    }

    fn context(&self) -> Option<String> {
        self.defining.last().cloned()
    }

    /// Memoize a built-in combinator call. Built-ins evaluate their
    /// arguments applicatively before the key is formed, so they can never
    /// re-enter themselves; only named rules need the in-progress protocol.
    fn cached(
        &mut self,
        key: Key,
        build: impl FnOnce(&mut Self) -> Result<RuleId, BuildError>,
    ) -> Result<RuleId, BuildError> {
        if let Some(Slot::Finished(id)) = self.cache.get(&key) {
            return Ok(*id);
        }
        let id = build(self)?;
        self.cache.insert(key, Slot::Finished(id));
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Literal constructors
    // ------------------------------------------------------------------

    /// Rule matching exactly the given character.
    pub fn ch(&mut self, c: char) -> Result<RuleId, BuildError> {
        self.cached(Key::builtin(Op::Ch, vec![KeyArg::Char(c)]), |b| {
            Ok(b.graph.push(MatcherKind::Char(c)))
        })
    }

    /// Rule matching the given character case-independently.
    /// Degenerates to [`Builder::ch`] when the character has no case.
    pub fn char_ignore_case(&mut self, c: char) -> Result<RuleId, BuildError> {
        if c.is_lowercase() == c.is_uppercase() {
            return self.ch(c);
        }
        self.cached(Key::builtin(Op::CharIgnoreCase, vec![KeyArg::Char(c)]), |b| {
            Ok(b.graph.push(MatcherKind::CharIgnoreCase(c)))
        })
    }

    /// Rule matching any character from `lo` to `hi`, both inclusive.
    /// Degenerates to [`Builder::ch`] when the range is a single character.
    pub fn char_range(&mut self, lo: char, hi: char) -> Result<RuleId, BuildError> {
        if lo > hi {
            return Err(BuildError::InvalidCharRange {
                lo,
                hi,
                rule: self.context(),
            });
        }
        if lo == hi {
            return self.ch(lo);
        }
        self.cached(
            Key::builtin(Op::CharRange, vec![KeyArg::CharPair(lo, hi)]),
            |b| Ok(b.graph.push(MatcherKind::CharRange(lo, hi))),
        )
    }

    /// Rule matching any of the characters in the given string.
    pub fn char_set(&mut self, characters: &str) -> Result<RuleId, BuildError> {
        self.char_set_of(CharSet::of(characters.chars()))
    }

    /// Rule matching any character except those in the given string.
    pub fn none_of(&mut self, characters: &str) -> Result<RuleId, BuildError> {
        self.char_set_of(CharSet::all_but(characters.chars()))
    }

    /// Rule matching any character of an explicit set.
    /// Degenerates to [`Builder::ch`] for a singleton non-negated set.
    pub fn char_set_of(&mut self, set: CharSet) -> Result<RuleId, BuildError> {
        if set.is_empty() && !set.is_negated() {
            return Err(BuildError::EmptyCharSet {
                rule: self.context(),
            });
        }
        if !set.is_negated() && set.chars().len() == 1 {
            return self.ch(set.chars()[0]);
        }
        self.cached(
            Key::builtin(Op::CharSet, vec![KeyArg::Set(set.clone())]),
            |b| Ok(b.graph.push(MatcherKind::CharSet(set))),
        )
    }

    /// Rule matching the given string.
    ///
    /// This is the explicit wrapper that bypasses the coercion hooks; a
    /// string literal passed as a [`Lit`] goes through
    /// [`CoercionHooks::from_string_literal`] instead.
    pub fn string(&mut self, s: &str) -> Result<RuleId, BuildError> {
        let chars: Vec<char> = s.chars().collect();
        self.string_chars(&chars)
    }

    /// Rule matching the given character sequence. Single-character
    /// sequences degenerate directly to [`Builder::ch`].
    pub fn string_chars(&mut self, chars: &[char]) -> Result<RuleId, BuildError> {
        if chars.is_empty() {
            return self.empty();
        }
        if chars.len() == 1 {
            return self.ch(chars[0]);
        }
        let chars = chars.to_vec();
        self.cached(
            Key::builtin(Op::Str, vec![KeyArg::Chars(chars.clone())]),
            |b| {
                let children = chars
                    .iter()
                    .map(|&c| b.ch(c))
                    .collect::<Result<Vec<_>, _>>()?;
                let seq = b.sequence_ids(children)?;
                let quoted = format!("\"{}\"", chars.iter().collect::<String>());
                b.graph.label_if_unset(seq, &quoted);
                Ok(seq)
            },
        )
    }

    /// Rule matching the given string case-independently.
    pub fn string_ignore_case(&mut self, s: &str) -> Result<RuleId, BuildError> {
        let chars: Vec<char> = s.chars().collect();
        if chars.is_empty() {
            return self.empty();
        }
        if chars.len() == 1 {
            return self.char_ignore_case(chars[0]);
        }
        self.cached(
            Key::builtin(Op::StrIgnoreCase, vec![KeyArg::Chars(chars.clone())]),
            |b| {
                let children = chars
                    .iter()
                    .map(|&c| b.char_ignore_case(c))
                    .collect::<Result<Vec<_>, _>>()?;
                let seq = b.sequence_ids(children)?;
                let quoted = format!("\"{}\"", chars.iter().collect::<String>());
                b.graph.label_if_unset(seq, &quoted);
                Ok(seq)
            },
        )
    }

    // ------------------------------------------------------------------
    // Combinators
    // ------------------------------------------------------------------

    /// Rule that succeeds when all subrules match, one after the other.
    /// Degenerates to its single child when given one subrule, and to
    /// [`Builder::empty`] when given none.
    pub fn sequence(&mut self, rules: Vec<Lit<V>>) -> Result<RuleId, BuildError> {
        let ids = self.to_rules(rules)?;
        self.sequence_ids(ids)
    }

    fn sequence_ids(&mut self, ids: Vec<RuleId>) -> Result<RuleId, BuildError> {
        match ids.len() {
            0 => self.empty(),
            1 => Ok(ids[0]),
            _ => self.cached(
                Key::builtin(Op::Sequence, ids.iter().map(|&id| KeyArg::Rule(id)).collect()),
                |b| Ok(b.graph.push(MatcherKind::Sequence(ids))),
            ),
        }
    }

    /// Ordered choice: tries the subrules in order and succeeds with the
    /// first one that matches. Degenerates to its single child when given
    /// one subrule.
    pub fn first_of(&mut self, rules: Vec<Lit<V>>) -> Result<RuleId, BuildError> {
        let ids = self.to_rules(rules)?;
        match ids.len() {
            0 => Err(BuildError::EmptyFirstOf {
                rule: self.context(),
            }),
            1 => Ok(ids[0]),
            _ => self.cached(
                Key::builtin(Op::FirstOf, ids.iter().map(|&id| KeyArg::Rule(id)).collect()),
                |b| Ok(b.graph.push(MatcherKind::FirstOf(ids))),
            ),
        }
    }

    /// Rule that tries its subrule and succeeds either way.
    pub fn optional(&mut self, rule: impl Into<Lit<V>>) -> Result<RuleId, BuildError> {
        let id = self.to_rule(rule.into())?;
        self.cached(Key::builtin(Op::Optional, vec![KeyArg::Rule(id)]), |b| {
            Ok(b.graph.push(MatcherKind::Optional(id)))
        })
    }

    /// Rule matching its subrule repeatedly, greedily, zero or more times.
    pub fn zero_or_more(&mut self, rule: impl Into<Lit<V>>) -> Result<RuleId, BuildError> {
        let id = self.to_rule(rule.into())?;
        self.cached(Key::builtin(Op::ZeroOrMore, vec![KeyArg::Rule(id)]), |b| {
            Ok(b.graph.push(MatcherKind::ZeroOrMore(id)))
        })
    }

    /// Rule matching its subrule repeatedly, greedily, at least once.
    pub fn one_or_more(&mut self, rule: impl Into<Lit<V>>) -> Result<RuleId, BuildError> {
        let id = self.to_rule(rule.into())?;
        self.cached(Key::builtin(Op::OneOrMore, vec![KeyArg::Rule(id)]), |b| {
            Ok(b.graph.push(MatcherKind::OneOrMore(id)))
        })
    }

    /// Syntactic predicate: the subrule must match but consumes no input.
    pub fn test(&mut self, rule: impl Into<Lit<V>>) -> Result<RuleId, BuildError> {
        let id = self.to_rule(rule.into())?;
        self.cached(Key::builtin(Op::Test, vec![KeyArg::Rule(id)]), |b| {
            Ok(b.graph.push(MatcherKind::Test(id)))
        })
    }

    /// Inverse syntactic predicate: succeeds when the subrule does not
    /// match, consuming no input.
    pub fn test_not(&mut self, rule: impl Into<Lit<V>>) -> Result<RuleId, BuildError> {
        let id = self.to_rule(rule.into())?;
        self.cached(Key::builtin(Op::TestNot, vec![KeyArg::Rule(id)]), |b| {
            Ok(b.graph.push(MatcherKind::TestNot(id)))
        })
    }

    /// Rule matching nothing, always succeeding.
    pub fn empty(&mut self) -> Result<RuleId, BuildError> {
        self.cached(Key::builtin(Op::Empty, vec![]), |b| {
            Ok(b.graph.push(MatcherKind::Empty))
        })
    }

    /// Rule matching any character except the end-of-input sentinel.
    pub fn any(&mut self) -> Result<RuleId, BuildError> {
        self.cached(Key::builtin(Op::Any, vec![]), |b| {
            Ok(b.graph.push_labeled(MatcherKind::Any, "ANY"))
        })
    }

    /// Rule matching the end-of-input sentinel.
    pub fn eoi(&mut self) -> Result<RuleId, BuildError> {
        self.cached(Key::builtin(Op::Eoi, vec![]), |b| {
            Ok(b.graph.push_labeled(MatcherKind::EndOfInput, "EOI"))
        })
    }

    /// Rule running the given action callback. The node records the net
    /// scope shift of the enclosing `up`/`down` markers, so at match time
    /// the callback evaluates against the frame that many creator links up
    /// the chain.
    pub fn action(&mut self, f: ActionFn<V>) -> Result<RuleId, BuildError> {
        let shift = self.shift;
        self.cached(
            Key::builtin(
                Op::Action,
                vec![KeyArg::ActionPtr(f as usize), KeyArg::Shift(shift)],
            ),
            |b| {
                let index = b.graph.push_action(f);
                Ok(b.graph.push(MatcherKind::Action { index, shift }))
            },
        )
    }

    // ------------------------------------------------------------------
    // Scope markers
    // ------------------------------------------------------------------

    /// Evaluate everything constructed inside `f` as if it were written
    /// `n` lexical levels higher: actions record a shift raised by `n`.
    ///
    /// `n` must be in 1..=4 and the net shift may never exceed 4.
    pub fn up<T>(
        &mut self,
        n: u8,
        f: impl FnOnce(&mut Self) -> Result<T, BuildError>,
    ) -> Result<T, BuildError> {
        self.check_marker(n)?;
        let raised = self.shift + n;
        if raised > MAX_SHIFT {
            return Err(BuildError::ShiftTooDeep {
                shift: raised,
                rule: self.context(),
            });
        }
        self.shift = raised;
        let result = f(self);
        self.shift -= n;
        result
    }

    /// Reverse a prior [`Builder::up`] by `n` levels for everything
    /// constructed inside `f`. Fails when `n` exceeds the prior forward
    /// shift.
    pub fn down<T>(
        &mut self,
        n: u8,
        f: impl FnOnce(&mut Self) -> Result<T, BuildError>,
    ) -> Result<T, BuildError> {
        self.check_marker(n)?;
        let Some(lowered) = self.shift.checked_sub(n) else {
            return Err(BuildError::ReversalUnderflow {
                shift: self.shift,
                count: n,
                rule: self.context(),
            });
        };
        let saved = self.shift;
        self.shift = lowered;
        let result = f(self);
        self.shift = saved;
        result
    }

    fn check_marker(&self, n: u8) -> Result<(), BuildError> {
        if !(1..=MAX_SHIFT).contains(&n) {
            return Err(BuildError::MarkerOutOfRange {
                count: n,
                rule: self.context(),
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Named rules
    // ------------------------------------------------------------------

    /// Define (or look up) the named rule `name` applied to `args`.
    ///
    /// Implements the miss/in-progress/finished cache protocol: the body
    /// runs exactly once per (name, argument) key, and a recursive re-entry
    /// observes a placeholder that resolves to the finished node when the
    /// outermost construction completes. The scope net is reset for the
    /// body, so markers never leak across a named-rule boundary.
    pub fn rule<F>(&mut self, name: &str, args: Vec<Lit<V>>, body: F) -> Result<RuleId, BuildError>
    where
        F: FnOnce(&mut Self, &[RuleId]) -> Result<RuleId, BuildError>,
    {
        let arg_ids = self.to_rules(args)?;
        let key = Key::named(name, arg_ids.iter().map(|&id| KeyArg::Rule(id)).collect());

        match self.cache.get_mut(&key) {
            Some(Slot::Finished(id)) => return Ok(*id),
            Some(Slot::InProgress { placeholder }) => {
                if let Some(p) = *placeholder {
                    return Ok(p);
                }
                let p = self.graph.push_placeholder();
                match self.cache.get_mut(&key) {
                    Some(Slot::InProgress { placeholder }) => *placeholder = Some(p),
                    _ => unreachable!("in-progress slot vanished during re-entry"),
                }
                return Ok(p);
            }
            None => {}
        }

        self.cache
            .insert(key.clone(), Slot::InProgress { placeholder: None });
        self.defining.push(name.to_string());
        let saved_shift = std::mem::replace(&mut self.shift, 0);
        let result = body(self, &arg_ids);
        self.shift = saved_shift;
        self.defining.pop();
        let id = result?;

        let placeholder = match self.cache.get(&key) {
            Some(Slot::InProgress { placeholder }) => *placeholder,
            _ => unreachable!("in-progress slot vanished during construction"),
        };
        if let Some(p) = placeholder {
            if id == p {
                return Err(BuildError::NoProgress {
                    rule: name.to_string(),
                });
            }
            self.graph.replace_refs(p, id);
            self.graph.retire(p);
        }

        self.graph.label_if_unset(id, name);
        if arg_ids.is_empty() {
            self.graph.define(name, id);
        }
        self.cache.insert(key, Slot::Finished(id));
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Coercion
    // ------------------------------------------------------------------

    /// Convert a literal value to a rule, dispatching by its shape through
    /// the coercion hooks.
    pub fn to_rule(&mut self, value: Lit<V>) -> Result<RuleId, BuildError> {
        match value {
            Lit::Rule(id) => {
                if !self.graph.contains(id) {
                    return Err(BuildError::Coercion {
                        value: value_out_of_arena(id),
                        rule: self.context(),
                    });
                }
                Ok(id)
            }
            Lit::Char(c) => (self.hooks.from_char_literal)(self, c),
            Lit::Str(s) => {
                let from_string_literal = self.hooks.from_string_literal;
                from_string_literal(self, &s)
            }
            Lit::Chars(chars) => {
                let from_char_array = self.hooks.from_char_array;
                from_char_array(self, &chars)
            }
            Lit::Action(f) => self.action(f),
        }
    }

    /// Element-wise [`Builder::to_rule`], preserving order.
    pub fn to_rules(&mut self, values: Vec<Lit<V>>) -> Result<Vec<RuleId>, BuildError> {
        values.into_iter().map(|v| self.to_rule(v)).collect()
    }

    // ------------------------------------------------------------------
    // Labels and finishing
    // ------------------------------------------------------------------

    /// Attach a diagnostic label to a rule.
    pub fn label(&mut self, id: RuleId, label: &str) -> Result<RuleId, BuildError> {
        if !self.graph.contains(id) {
            return Err(BuildError::Coercion {
                value: value_out_of_arena(id),
                rule: self.context(),
            });
        }
        self.graph.set_label(id, label);
        Ok(id)
    }

    /// Freeze the arena into a read-only grammar rooted at `root`.
    pub fn finish(self, root: RuleId) -> Result<Grammar<V>, BuildError> {
        if !self.graph.contains(root) || self.graph.node(root).is_retired() {
            return Err(BuildError::InvalidRoot { id: root.as_u32() });
        }
        for (id, node) in self.graph.live_nodes() {
            if matches!(node.kind, MatcherKind::Placeholder) {
                return Err(BuildError::UnresolvedPlaceholder { id: id.as_u32() });
            }
        }
        Ok(Grammar::new(self.graph, root))
    }
}

impl<V> Default for Builder<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn value_out_of_arena(id: RuleId) -> String {
    format!("{id} (not a rule of this builder)")
}
