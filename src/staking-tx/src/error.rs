use alloy_primitives::TxHash;
use staking_types::{ChainError, IntentError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StakeTxError {
    #[error("a staking attempt is already in flight")]
    Busy,

    #[error("invalid stake amount {0:?}")]
    InvalidAmount(String),

    #[error(transparent)]
    Intent(#[from] IntentError),

    #[error("spending approval submission failed: {0}")]
    ApprovalSubmission(ChainError),

    #[error("spending approval {tx_hash} not confirmed: {source}")]
    ApprovalConfirmation { tx_hash: TxHash, source: ChainError },

    #[error("stake submission failed: {0}")]
    StakeSubmission(ChainError),

    #[error("stake {tx_hash} not confirmed: {source}")]
    StakeConfirmation { tx_hash: TxHash, source: ChainError },
}

impl StakeTxError {
    /// Transaction the user may want to look up on an explorer.
    pub fn pending_tx(&self) -> Option<TxHash> {
        match self {
            Self::ApprovalConfirmation { tx_hash, .. } | Self::StakeConfirmation { tx_hash, .. } => {
                Some(*tx_hash)
            }
            _ => None,
        }
    }
}
