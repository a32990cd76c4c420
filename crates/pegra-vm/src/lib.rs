#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Recursive match engine for pegra rule graphs.
//!
//! Walks a frozen [`pegra_rules::Grammar`] against an input buffer,
//! maintains the call-frame chain, and invokes actions with their resolved
//! scope shifts. Match failure is a normal negative outcome; only fuel
//! exhaustion, a too-shallow frame chain and non-consuming repetitions are
//! runtime errors.

mod error;
mod frame;
mod input;
mod machine;
mod trace;

#[cfg(test)]
mod input_tests;

pub use error::RuntimeError;
pub use frame::{Frame, FrameArena};
pub use input::Input;
pub use machine::{Limits, Machine, MatchOutcome};
pub use trace::{NoopTracer, PrintTracer, Tracer};
