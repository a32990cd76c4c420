#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Rule graph model for the pegra PEG engine.
//!
//! Grammars are represented as an arena of immutable matcher nodes
//! (`RuleGraph`), addressed by stable `RuleId` indices. Cycles between
//! self- or mutually-recursive rules are just indices referencing earlier
//! arena slots, so ownership stays acyclic.
//!
//! The construction layer (`pegra-rules`) mutates the arena while a grammar
//! is being defined; once frozen into a grammar the graph is read-only.

mod charset;
mod graph;
mod scope;

#[cfg(test)]
mod charset_tests;
#[cfg(test)]
mod graph_tests;

pub use charset::CharSet;
pub use graph::{Matcher, MatcherKind, RuleGraph, RuleId};
pub use scope::{ActionFn, Scope};
