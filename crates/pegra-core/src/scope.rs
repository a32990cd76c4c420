//! Boundary between the rule graph and action callbacks.

/// Handle onto one call frame, passed to action callbacks during matching.
///
/// Which frame the handle selects is decided by the action node's resolved
/// scope shift: 0 is the innermost enclosing rule invocation, N skips N
/// creator links up the frame chain.
pub trait Scope<V> {
    /// Input position where the selected frame's rule started matching.
    fn start(&self) -> usize;

    /// Current input position.
    fn position(&self) -> usize;

    /// Text matched by the selected frame's rule so far.
    fn matched_text(&self) -> String;

    /// The frame's user value slot.
    fn value(&self) -> Option<&V>;

    /// Store a value in the frame's value slot.
    fn set_value(&mut self, value: V);

    /// Remove and return the frame's value.
    fn take_value(&mut self) -> Option<V>;
}

/// An action callback. Returns whether the match should proceed.
///
/// Plain function pointers so actions have a stable identity for the
/// construction cache (two mentions of the same function share one node).
pub type ActionFn<V> = fn(&mut dyn Scope<V>) -> bool;
