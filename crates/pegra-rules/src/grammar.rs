//! Finished grammars and the once-initialized grammar cell.

use std::fmt;
use std::fmt::Write as _;
use std::sync::{Arc, OnceLock};

use pegra_core::{ActionFn, Matcher, MatcherKind, RuleGraph, RuleId};

use crate::error::BuildError;

/// A frozen rule graph with a designated root.
///
/// Read-only: safe for unsynchronized concurrent reads by any number of
/// matching executors, cycles included.
pub struct Grammar<V> {
    graph: RuleGraph<V>,
    root: RuleId,
}

impl<V> Grammar<V> {
    pub(crate) fn new(graph: RuleGraph<V>, root: RuleId) -> Self {
        Self { graph, root }
    }

    pub fn root(&self) -> RuleId {
        self.root
    }

    pub fn graph(&self) -> &RuleGraph<V> {
        &self.graph
    }

    pub fn node(&self, id: RuleId) -> &Matcher {
        self.graph.node(id)
    }

    pub fn kind(&self, id: RuleId) -> &MatcherKind {
        self.graph.kind(id)
    }

    pub fn label(&self, id: RuleId) -> Option<&str> {
        self.graph.label(id)
    }

    pub fn action(&self, index: usize) -> ActionFn<V> {
        self.graph.action(index)
    }

    /// Look up a named rule registered during construction.
    pub fn definition(&self, name: &str) -> Option<RuleId> {
        self.graph.definition(name)
    }

    /// Root line followed by the arena dump.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        writeln!(out, "root {}", self.root).unwrap();
        out.push_str(&self.graph.dump());
        out
    }
}

impl<V> fmt::Debug for Grammar<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("root", &self.root)
            .field("graph", &self.graph)
            .finish()
    }
}

/// Lazily builds a grammar exactly once, even under concurrent first use.
///
/// Contending threads converge on one published grammar (or one error);
/// none observes a partially built node. Usable as a `static`.
pub struct GrammarCell<V> {
    cell: OnceLock<Result<Arc<Grammar<V>>, BuildError>>,
}

impl<V> GrammarCell<V> {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Return the published grammar, running `build` first if no caller has
    /// built it yet. The build closure runs at most once per cell.
    pub fn get_or_build(
        &self,
        build: impl FnOnce() -> Result<Grammar<V>, BuildError>,
    ) -> Result<Arc<Grammar<V>>, BuildError> {
        self.cell.get_or_init(|| build().map(Arc::new)).clone()
    }

    /// The published grammar, if any caller has built it.
    pub fn get(&self) -> Option<&Result<Arc<Grammar<V>>, BuildError>> {
        self.cell.get()
    }
}

impl<V> Default for GrammarCell<V> {
    fn default() -> Self {
        Self::new()
    }
}
