//! Arena of matcher nodes.

use std::fmt;
use std::fmt::Write as _;

use indexmap::IndexMap;

use crate::charset::CharSet;
use crate::scope::ActionFn;

/// Stable index of a matcher node in its `RuleGraph`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(u32);

impl RuleId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Construct from a raw index. Intended for executors and tests that
    /// store ids outside the graph; an id is only meaningful together with
    /// the arena that minted it.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// The matching behavior of one node.
///
/// Children are `RuleId` indices into the owning arena, so a kind may
/// reference any earlier slot, including (for recursive rules) a slot that
/// transitively references this node back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatcherKind {
    /// Exactly one character.
    Char(char),
    /// One character, matched case-independently.
    CharIgnoreCase(char),
    /// Any character in the inclusive range.
    CharRange(char, char),
    /// Any character in an explicit set.
    CharSet(CharSet),
    /// All children in order.
    Sequence(Vec<RuleId>),
    /// First child that matches, tried in order.
    FirstOf(Vec<RuleId>),
    /// Child if it matches, else nothing. Always succeeds.
    Optional(RuleId),
    /// Child repeated greedily, zero or more times. Always succeeds.
    ZeroOrMore(RuleId),
    /// Child repeated greedily, at least once.
    OneOrMore(RuleId),
    /// Lookahead: child must match, no input is consumed.
    Test(RuleId),
    /// Negative lookahead: child must not match, no input is consumed.
    TestNot(RuleId),
    /// External action callback, indexing the arena's action table.
    /// `shift` is the resolved scope shift: how many creator links to skip
    /// up the frame chain before evaluating.
    Action { index: usize, shift: u8 },
    /// Matches nothing, always succeeds.
    Empty,
    /// Any character except the end-of-input sentinel.
    Any,
    /// The end-of-input sentinel position.
    EndOfInput,
    /// Reserved slot for a recursive rule still under construction.
    /// Never present in a finished grammar: every reference is rewritten to
    /// the finished node and the slot is retired.
    Placeholder,
}

/// One immutable node of the rule graph.
#[derive(Clone, Debug)]
pub struct Matcher {
    pub kind: MatcherKind,
    /// Diagnostic label, auto-derived for some kinds or user-supplied.
    pub label: Option<String>,
    retired: bool,
}

impl Matcher {
    /// Whether this slot was consumed by a resolved recursion placeholder.
    /// Retired slots are hidden from dumps and never handed out again.
    pub fn is_retired(&self) -> bool {
        self.retired
    }
}

/// Append-only arena of matcher nodes plus the action table and the
/// named-definition registry.
///
/// Only the construction layer mutates a graph; once frozen into a grammar
/// it is read-only and safe for unsynchronized concurrent reads.
pub struct RuleGraph<V> {
    nodes: Vec<Matcher>,
    actions: Vec<ActionFn<V>>,
    definitions: IndexMap<String, RuleId>,
}

impl<V> RuleGraph<V> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            actions: Vec::new(),
            definitions: IndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the id addresses a slot of this arena.
    pub fn contains(&self, id: RuleId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Append a new unlabeled node.
    pub fn push(&mut self, kind: MatcherKind) -> RuleId {
        let id = RuleId::new(self.nodes.len());
        self.nodes.push(Matcher {
            kind,
            label: None,
            retired: false,
        });
        id
    }

    /// Append a new labeled node.
    pub fn push_labeled(&mut self, kind: MatcherKind, label: impl Into<String>) -> RuleId {
        let id = self.push(kind);
        self.nodes[id.index()].label = Some(label.into());
        id
    }

    /// Reserve a slot for a recursive rule still under construction.
    pub fn push_placeholder(&mut self) -> RuleId {
        self.push(MatcherKind::Placeholder)
    }

    pub fn node(&self, id: RuleId) -> &Matcher {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: RuleId) -> &MatcherKind {
        &self.nodes[id.index()].kind
    }

    pub fn label(&self, id: RuleId) -> Option<&str> {
        self.nodes[id.index()].label.as_deref()
    }

    pub fn set_label(&mut self, id: RuleId, label: impl Into<String>) {
        self.nodes[id.index()].label = Some(label.into());
    }

    /// Attach a label unless the node already carries one.
    pub fn label_if_unset(&mut self, id: RuleId, label: &str) {
        let node = &mut self.nodes[id.index()];
        if node.label.is_none() {
            node.label = Some(label.to_string());
        }
    }

    /// Register an action callback, returning its table index.
    pub fn push_action(&mut self, action: ActionFn<V>) -> usize {
        self.actions.push(action);
        self.actions.len() - 1
    }

    pub fn action(&self, index: usize) -> ActionFn<V> {
        self.actions[index]
    }

    /// Record a named rule definition. First definition of a name wins.
    pub fn define(&mut self, name: &str, id: RuleId) {
        self.definitions.entry(name.to_string()).or_insert(id);
    }

    pub fn definition(&self, name: &str) -> Option<RuleId> {
        self.definitions.get(name).copied()
    }

    /// Named definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = (&str, RuleId)> {
        self.definitions.iter().map(|(name, &id)| (name.as_str(), id))
    }

    /// Rewrite every child reference to `from` into `to`.
    ///
    /// Used when a recursion placeholder resolves to its finished node.
    pub fn replace_refs(&mut self, from: RuleId, to: RuleId) {
        let swap = |id: &mut RuleId| {
            if *id == from {
                *id = to;
            }
        };
        for node in &mut self.nodes {
            match &mut node.kind {
                MatcherKind::Sequence(children) | MatcherKind::FirstOf(children) => {
                    children.iter_mut().for_each(swap);
                }
                MatcherKind::Optional(child)
                | MatcherKind::ZeroOrMore(child)
                | MatcherKind::OneOrMore(child)
                | MatcherKind::Test(child)
                | MatcherKind::TestNot(child) => swap(child),
                MatcherKind::Char(_)
                | MatcherKind::CharIgnoreCase(_)
                | MatcherKind::CharRange(..)
                | MatcherKind::CharSet(_)
                | MatcherKind::Action { .. }
                | MatcherKind::Empty
                | MatcherKind::Any
                | MatcherKind::EndOfInput
                | MatcherKind::Placeholder => {}
            }
        }
    }

    /// Retire a resolved placeholder slot.
    pub fn retire(&mut self, id: RuleId) {
        self.nodes[id.index()].retired = true;
    }

    /// Live (non-retired) nodes in arena order.
    pub fn live_nodes(&self) -> impl Iterator<Item = (RuleId, &Matcher)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| !node.retired)
            .map(|(i, node)| (RuleId::new(i), node))
    }

    /// Human-readable dump: one line per live node, in arena order.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (id, node) in self.live_nodes() {
            write!(out, "{id} ").unwrap();
            dump_kind(&mut out, &node.kind);
            if let Some(label) = &node.label {
                write!(out, " ; {label}").unwrap();
            }
            out.push('\n');
        }
        out
    }
}

fn dump_kind(out: &mut String, kind: &MatcherKind) {
    match kind {
        MatcherKind::Char(c) => write!(out, "Char '{c}'"),
        MatcherKind::CharIgnoreCase(c) => write!(out, "CharIgnoreCase '{c}'"),
        MatcherKind::CharRange(lo, hi) => write!(out, "CharRange '{lo}'..'{hi}'"),
        MatcherKind::CharSet(set) => write!(out, "CharSet {set}"),
        MatcherKind::Sequence(children) => Ok(dump_children(out, "Sequence", children)),
        MatcherKind::FirstOf(children) => Ok(dump_children(out, "FirstOf", children)),
        MatcherKind::Optional(child) => write!(out, "Optional {child}"),
        MatcherKind::ZeroOrMore(child) => write!(out, "ZeroOrMore {child}"),
        MatcherKind::OneOrMore(child) => write!(out, "OneOrMore {child}"),
        MatcherKind::Test(child) => write!(out, "Test {child}"),
        MatcherKind::TestNot(child) => write!(out, "TestNot {child}"),
        MatcherKind::Action { index, shift } => write!(out, "Action a{index} shift={shift}"),
        MatcherKind::Empty => write!(out, "Empty"),
        MatcherKind::Any => write!(out, "Any"),
        MatcherKind::EndOfInput => write!(out, "EndOfInput"),
        MatcherKind::Placeholder => write!(out, "Placeholder"),
    }
    .unwrap()
}

fn dump_children(out: &mut String, name: &str, children: &[RuleId]) {
    out.push_str(name);
    for child in children {
        write!(out, " {child}").unwrap();
    }
}

impl<V> Default for RuleGraph<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for RuleGraph<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleGraph")
            .field("nodes", &self.nodes)
            .field("actions", &self.actions.len())
            .field("definitions", &self.definitions)
            .finish()
    }
}
