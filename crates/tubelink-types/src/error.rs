//! Error types for the Tubelink settlement engine.
//!
//! All errors use the `TUBE_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Input validation errors
//! - 2xx: Mode / validator administration errors
//! - 3xx: Signature / quorum errors
//! - 4xx: Replay / settlement errors
//! - 5xx: Routing / custody errors
//! - 9xx: General / internal errors
//!
//! Every failure is synchronous and reported to the caller; the engine never
//! retries. A failed call leaves no state mutation behind, with the single
//! exception of the payload-notification sub-step, which is converted into
//! an escrow outcome instead of an error.

use thiserror::Error;

use crate::{Address, Amount, NetworkId, PauseMode, WithdrawalKey};

/// Central error enum for all Tubelink operations.
#[derive(Debug, Error)]
pub enum TubeError {
    // =================================================================
    // Input Validation Errors (1xx)
    // =================================================================
    /// Deposit amount was zero.
    #[error("TUBE_ERR_100: invalid amount")]
    InvalidAmount,

    /// Withdrawal amount was zero.
    #[error("TUBE_ERR_101: amount is 0")]
    AmountIsZero,

    /// Recipient was the null identity.
    #[error("TUBE_ERR_102: invalid recipient")]
    InvalidRecipient,

    /// Batch item arrays were empty or exceeded the batch limit.
    #[error("TUBE_ERR_103: invalid array length")]
    InvalidArrayLength,

    /// Parallel batch arrays had mismatched lengths.
    #[error("TUBE_ERR_104: invalid parameters: {reason}")]
    InvalidParameters { reason: String },

    // =================================================================
    // Mode / Validator Administration Errors (2xx)
    // =================================================================
    /// Operation attempted in the wrong pause mode.
    #[error("TUBE_ERR_200: invalid mode: expected {expected}, got {actual}")]
    InvalidMode {
        expected: PauseMode,
        actual: PauseMode,
    },

    /// Validator is already a member of the set.
    #[error("TUBE_ERR_201: validator already present: {0}")]
    AlreadyPresent(Address),

    /// Validator is not a member of the set.
    #[error("TUBE_ERR_202: validator not present: {0}")]
    NotPresent(Address),

    // =================================================================
    // Signature / Quorum Errors (3xx)
    // =================================================================
    /// Signature blob length is not a positive multiple of one signature.
    #[error("TUBE_ERR_300: invalid signature length")]
    InvalidSignatureLength,

    /// A recovered identity is not a current validator. Unrecoverable
    /// signatures surface here with the null identity.
    #[error("TUBE_ERR_301: invalid validator: {0}")]
    InvalidValidator(Address),

    /// The same validator signed twice within one bundle.
    #[error("TUBE_ERR_302: duplicate validator: {0}")]
    DuplicateValidator(Address),

    /// Fewer distinct valid attesters than the quorum threshold.
    #[error("TUBE_ERR_303: insufficient validators: {got} of {need}")]
    InsufficientValidators { got: usize, need: usize },

    // =================================================================
    // Replay / Settlement Errors (4xx)
    // =================================================================
    /// The withdrawal key has already been settled (anti-double-spend).
    #[error("TUBE_ERR_400: already settled: {0}")]
    AlreadySettled(WithdrawalKey),

    // =================================================================
    // Routing / Custody Errors (5xx)
    // =================================================================
    /// `(network, token)` does not resolve to a known asset mapping.
    #[error("TUBE_ERR_500: invalid route: {network}, token {token}")]
    InvalidRouteToken {
        network: NetworkId,
        token: Address,
    },

    /// Token custody reported an insufficient balance or allowance.
    #[error("TUBE_ERR_501: insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    /// Token custody rejected a transfer for another reason.
    #[error("TUBE_ERR_502: transfer failed: {reason}")]
    TransferFailed { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("TUBE_ERR_900: internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, TubeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = TubeError::AlreadySettled(WithdrawalKey([0u8; 32]));
        let msg = format!("{err}");
        assert!(msg.starts_with("TUBE_ERR_400"), "Got: {msg}");
    }

    #[test]
    fn insufficient_validators_display() {
        let err = TubeError::InsufficientValidators { got: 1, need: 3 };
        let msg = format!("{err}");
        assert!(msg.contains("TUBE_ERR_303"));
        assert!(msg.contains("1 of 3"));
    }

    #[test]
    fn invalid_mode_display() {
        let err = TubeError::InvalidMode {
            expected: PauseMode::Administrative,
            actual: PauseMode::Operational,
        };
        let msg = format!("{err}");
        assert!(msg.contains("TUBE_ERR_200"));
        assert!(msg.contains("ADMINISTRATIVE"));
        assert!(msg.contains("OPERATIONAL"));
    }

    #[test]
    fn all_errors_have_tube_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(TubeError::InvalidAmount),
            Box::new(TubeError::AmountIsZero),
            Box::new(TubeError::InvalidSignatureLength),
            Box::new(TubeError::DuplicateValidator(Address::ZERO)),
            Box::new(TubeError::Internal("test".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("TUBE_ERR_"),
                "Error missing TUBE_ERR_ prefix: {msg}"
            );
        }
    }
}
