//! User-facing transaction notices (the toast side-channel).

use alloy_primitives::TxHash;
use staking_types::{ChainConfig, ChainError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// The transaction could not be submitted.
    TxError { title: String, message: String },
    /// Submitted, but never confirmed (wait failed, timed out or reverted).
    TxReceiptError {
        title: String,
        tx_hash: TxHash,
        link: String,
        message: String,
    },
    TxConfirmed {
        title: String,
        tx_hash: TxHash,
        link: String,
    },
}

impl Notice {
    pub fn tx_error(title: &str, err: &ChainError) -> Self {
        Self::TxError {
            title: title.to_string(),
            message: err.to_string(),
        }
    }

    pub fn receipt_error(
        title: &str,
        tx_hash: TxHash,
        err: &ChainError,
        chain: &ChainConfig,
    ) -> Self {
        Self::TxReceiptError {
            title: title.to_string(),
            tx_hash,
            link: chain.tx_link(&tx_hash),
            message: err.to_string(),
        }
    }

    pub fn confirmed(title: &str, tx_hash: TxHash, chain: &ChainConfig) -> Self {
        Self::TxConfirmed {
            title: title.to_string(),
            tx_hash,
            link: chain.tx_link(&tx_hash),
        }
    }
}

/// Receives notices; never fails and never blocks the flow.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices as structured `tracing` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::TxError { title, message } => {
                tracing::error!(%title, %message, "transaction failed");
            }
            Notice::TxReceiptError {
                title,
                tx_hash,
                link,
                message,
            } => {
                tracing::error!(%title, %tx_hash, %link, %message, "transaction not confirmed");
            }
            Notice::TxConfirmed {
                title,
                tx_hash,
                link,
            } => {
                tracing::info!(%title, %tx_hash, %link, "transaction confirmed");
            }
        }
    }
}
