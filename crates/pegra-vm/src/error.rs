//! Runtime errors raised during matching.

/// Errors that abort a match run.
///
/// A failed match is not an error; these cover resource exhaustion and
/// violations of the executor's side of the frame-chain contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// Execution fuel exhausted (too many matcher invocations).
    #[error("execution fuel exhausted (limit {0})")]
    ExecFuelExhausted(u32),

    /// Matcher recursion nested too deeply.
    #[error("recursion limit exceeded (limit {0})")]
    RecursionLimitExceeded(u32),

    /// An action's scope shift walked past the top of the frame chain.
    #[error("action scope shift {shift} exceeds frame chain depth {depth}")]
    ShallowFrameChain { shift: u8, depth: u32 },

    /// A repetition body succeeded without consuming input, which would
    /// loop forever.
    #[error("repetition body matched without consuming input at position {position}")]
    StuckRepetition { position: usize },
}
