//! Terminal error kinds surfaced by the proof engine.
//!
//! Every failure is final: an operation either returns a digest (or
//! `true`) or one of these four conditions. Nothing here is retryable,
//! and none of the folds panic on malformed input — a short witness
//! simply folds to a digest that fails the root comparison, while an
//! internally inconsistent one is rejected as [`ProofError::InvalidProof`].

/// Failure conditions of the public proof operations.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum ProofError {
    /// The operation needs a non-empty tree, but the root is the zero word.
    #[error("tree is empty but the operation requires elements")]
    EmptyTree,

    /// The root and the witness element count disagree about emptiness
    /// (`root == 0` xor `count == 0`) at the boundary of an append.
    #[error("root and element count disagree about emptiness")]
    InvalidTree,

    /// Parallel element lists for an update differ in length.
    #[error("current and replacement element lists differ in length")]
    LengthMismatch,

    /// The witness does not reconstruct the committed root, or a derived
    /// sub-witness is internally inconsistent.
    #[error("witness does not reconstruct the committed root")]
    InvalidProof,
}

/// Convenience alias for results produced by the proof engine.
pub type ProofResult<T> = Result<T, ProofError>;
