//! The recursive match engine.

use pegra_core::{MatcherKind, RuleId, Scope};
use pegra_rules::Grammar;

use crate::error::RuntimeError;
use crate::frame::FrameArena;
use crate::input::Input;
use crate::trace::{NoopTracer, Tracer};

/// Runtime limits for a match run.
#[derive(Clone, Copy, Debug)]
pub struct Limits {
    /// Maximum total matcher invocations (default: 1,000,000).
    exec_fuel: u32,
    /// Maximum matcher nesting depth (default: 1,024).
    recursion_limit: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            exec_fuel: 1_000_000,
            recursion_limit: 1024,
        }
    }
}

impl Limits {
    /// New limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution fuel limit.
    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.exec_fuel = fuel;
        self
    }

    /// Set the recursion limit.
    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn get_exec_fuel(&self) -> u32 {
        self.exec_fuel
    }

    pub fn get_recursion_limit(&self) -> u32 {
        self.recursion_limit
    }
}

/// Result of a match run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Whether the root rule matched.
    pub matched: bool,
    /// Characters consumed by the match (0 when it failed).
    pub end: usize,
}

/// Executes a frozen grammar against input text.
///
/// Matching is greedy with no re-entry into committed alternatives:
/// once an ordered-choice branch succeeds the other branches are never
/// retried. A failed matcher restores the input position it started at.
pub struct Machine<'g, V> {
    grammar: &'g Grammar<V>,
    limits: Limits,
}

struct State<V> {
    input: Input,
    frames: FrameArena<V>,
    pos: usize,
    fuel: u32,
    depth: u32,
}

impl<V> State<V> {
    fn eat(&mut self, pred: impl Fn(char) -> bool) -> bool {
        match self.input.char_at(self.pos) {
            Some(c) if pred(c) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }
}

impl<'g, V> Machine<'g, V> {
    pub fn new(grammar: &'g Grammar<V>) -> Self {
        Self {
            grammar,
            limits: Limits::default(),
        }
    }

    /// Set the runtime limits.
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Match the input against the grammar's root rule.
    ///
    /// Convenience wrapper around [`Machine::run_with`] using `NoopTracer`,
    /// which compiles away.
    pub fn run(&self, text: &str) -> Result<MatchOutcome, RuntimeError> {
        self.run_with(text, &mut NoopTracer)
    }

    /// Match the input with a tracer receiving execution events.
    pub fn run_with<T: Tracer>(
        &self,
        text: &str,
        tracer: &mut T,
    ) -> Result<MatchOutcome, RuntimeError> {
        let mut st = State {
            input: Input::new(text),
            frames: FrameArena::new(),
            pos: 0,
            fuel: self.limits.exec_fuel,
            depth: 0,
        };
        let matched = self.eval(&mut st, self.grammar.root(), tracer)?;
        Ok(MatchOutcome {
            matched,
            end: st.pos.min(st.input.len()),
        })
    }

    /// Evaluate one matcher. Pushes a call frame for every non-action
    /// matcher and restores the input position when the matcher fails.
    fn eval<T: Tracer>(
        &self,
        st: &mut State<V>,
        id: RuleId,
        tracer: &mut T,
    ) -> Result<bool, RuntimeError> {
        if st.fuel == 0 {
            return Err(RuntimeError::ExecFuelExhausted(self.limits.exec_fuel));
        }
        st.fuel -= 1;

        if let MatcherKind::Action { index, shift } = *self.grammar.kind(id) {
            return self.eval_action(st, id, index, shift, tracer);
        }

        if st.depth >= self.limits.recursion_limit {
            return Err(RuntimeError::RecursionLimitExceeded(
                self.limits.recursion_limit,
            ));
        }
        st.depth += 1;

        let start = st.pos;
        let creator = st.frames.current();
        st.frames.push(id, start);
        tracer.enter(id, self.grammar.label(id), start);

        let matched = self.eval_kind(st, self.grammar.kind(id), tracer)?;

        st.frames.restore(creator);
        st.depth -= 1;
        if !matched {
            st.pos = start;
        }
        tracer.result(id, matched, st.pos);
        Ok(matched)
    }

    fn eval_kind<T: Tracer>(
        &self,
        st: &mut State<V>,
        kind: &MatcherKind,
        tracer: &mut T,
    ) -> Result<bool, RuntimeError> {
        match kind {
            MatcherKind::Char(c) => Ok(st.eat(|g| g == *c)),
            MatcherKind::CharIgnoreCase(c) => {
                Ok(st.eat(|g| g == *c || g.to_lowercase().eq(c.to_lowercase())))
            }
            MatcherKind::CharRange(lo, hi) => Ok(st.eat(|g| (*lo..=*hi).contains(&g))),
            MatcherKind::CharSet(set) => Ok(st.eat(|g| set.contains(g))),
            MatcherKind::Any => Ok(st.eat(|_| true)),
            MatcherKind::EndOfInput => {
                if st.input.at_sentinel(st.pos) {
                    st.pos += 1;
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            MatcherKind::Empty => Ok(true),
            MatcherKind::Sequence(children) => {
                for &child in children {
                    if !self.eval(st, child, tracer)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            MatcherKind::FirstOf(children) => {
                for &child in children {
                    if self.eval(st, child, tracer)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            MatcherKind::Optional(child) => {
                self.eval(st, *child, tracer)?;
                Ok(true)
            }
            MatcherKind::ZeroOrMore(child) => {
                self.repeat(st, *child, tracer)?;
                Ok(true)
            }
            MatcherKind::OneOrMore(child) => self.repeat(st, *child, tracer),
            MatcherKind::Test(child) => {
                let save = st.pos;
                let matched = self.eval(st, *child, tracer)?;
                st.pos = save;
                Ok(matched)
            }
            MatcherKind::TestNot(child) => {
                let save = st.pos;
                let matched = self.eval(st, *child, tracer)?;
                st.pos = save;
                Ok(!matched)
            }
            MatcherKind::Action { .. } => unreachable!("actions are handled in eval"),
            MatcherKind::Placeholder => unreachable!("placeholder node in finished grammar"),
        }
    }

    /// Greedy repetition. Returns whether at least one iteration matched.
    fn repeat<T: Tracer>(
        &self,
        st: &mut State<V>,
        child: RuleId,
        tracer: &mut T,
    ) -> Result<bool, RuntimeError> {
        let mut matched_once = false;
        loop {
            let before = st.pos;
            if !self.eval(st, child, tracer)? {
                break;
            }
            if st.pos == before {
                return Err(RuntimeError::StuckRepetition { position: before });
            }
            matched_once = true;
        }
        Ok(matched_once)
    }

    fn eval_action<T: Tracer>(
        &self,
        st: &mut State<V>,
        id: RuleId,
        index: usize,
        shift: u8,
        tracer: &mut T,
    ) -> Result<bool, RuntimeError> {
        let Some(frame_idx) = st.frames.ancestor(shift) else {
            return Err(RuntimeError::ShallowFrameChain {
                shift,
                depth: st.frames.chain_depth(),
            });
        };
        let action = self.grammar.action(index);
        let pos = st.pos;
        let State { input, frames, .. } = st;
        let frame = frames.get_mut(frame_idx);
        let mut scope = FrameScope {
            input,
            start: frame.start,
            pos,
            value: &mut frame.value,
        };
        let ok = action(&mut scope);
        tracer.action(id, shift, ok);
        Ok(ok)
    }
}

/// `Scope` handle onto the frame an action's shift selected.
struct FrameScope<'a, V> {
    input: &'a Input,
    start: usize,
    pos: usize,
    value: &'a mut Option<V>,
}

impl<V> Scope<V> for FrameScope<'_, V> {
    fn start(&self) -> usize {
        self.start
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn matched_text(&self) -> String {
        self.input.slice(self.start, self.pos)
    }

    fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    fn set_value(&mut self, value: V) {
        *self.value = Some(value);
    }

    fn take_value(&mut self) -> Option<V> {
        self.value.take()
    }
}
