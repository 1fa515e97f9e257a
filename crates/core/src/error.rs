//! Error types for minting and verification.

use thiserror::Error;

/// Why a search stopped without finding a stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustionReason {
    /// The version 0 counter reached `i32::MAX`
    CounterSpace,
    /// The caller's attempt ceiling was hit
    AttemptBudget,
    /// The caller's deadline passed
    Deadline,
    /// The shared cancellation flag was raised
    Cancelled,
}

impl core::fmt::Display for ExhaustionReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let reason = match self {
            Self::CounterSpace => "counter space exhausted",
            Self::AttemptBudget => "attempt budget reached",
            Self::Deadline => "deadline passed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(reason)
    }
}

/// Errors surfaced by the minters and the verifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashcashError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("search exhausted after {attempts} attempts: {reason}")]
    SearchExhausted {
        reason: ExhaustionReason,
        attempts: u64,
    },

    #[error("malformed stamp: {0}")]
    MalformedStamp(String),

    #[error("entropy source unavailable: {0}")]
    Entropy(String),
}

pub type Result<T> = core::result::Result<T, HashcashError>;
