#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Rule construction layer for the pegra PEG engine.
//!
//! `Builder` is the combinator surface grammar authors call. Every
//! rule-defining call routes through the construction cache, so identical
//! invocations anywhere in a grammar share one node and recursive rules
//! converge on a single slot instead of looping forever. Scope markers
//! (`up`/`down`) are resolved here, at construction time, into flat shift
//! values carried by action nodes.
//!
//! All errors are construction-time fatal: no partial grammar is usable.

mod builder;
mod cache;
mod coerce;
mod error;
mod grammar;

#[cfg(test)]
mod coerce_tests;
#[cfg(test)]
mod grammar_tests;
#[cfg(test)]
mod scope_tests;

pub use builder::Builder;
pub use coerce::{CoercionHooks, Lit};
pub use error::BuildError;
pub use grammar::{Grammar, GrammarCell};
