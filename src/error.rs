//! Error taxonomy shared by every map flavour in the crate.

use thiserror::Error;

/// Recoverable failures of dictionary operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DictError {
    /// The operation needs at least one entry and the dictionary has none.
    #[error("dictionary is empty")]
    Empty,
    /// The equality scan finished without a match.
    #[error("requested key is not present")]
    KeyNotFound,
    /// A positional index (after negative normalisation) fell outside `[0, len)`.
    #[error("index {index} out of range for dictionary of length {len}")]
    IndexOutOfRange { index: isize, len: usize },
}

impl DictError {
    /// Legacy numeric status associated with each kind.
    ///
    /// Callers bridging to tooling that expects these codes can map errors
    /// through this; the crate itself never exits the process.
    pub const fn exit_code(&self) -> i32 {
        match self {
            DictError::Empty => 5000,
            DictError::KeyNotFound => 5001,
            DictError::IndexOutOfRange { .. } => 5003,
        }
    }
}

pub type Result<T, E = DictError> = core::result::Result<T, E>;
