//! Shared types for GTC identity staking.
//!
//! Used by the transaction orchestrator and by the CLI's RPC client: the
//! staking intent, immutable transaction requests, observed allowance state,
//! the Solidity interfaces, and the chain capability traits.

pub mod allowance;
pub mod chain;
pub mod intent;
pub mod interfaces;
pub mod request;
pub mod stake;

pub use allowance::AllowanceState;
pub use chain::{
    ChainClient, ChainConfig, ChainError, ChainId, ChainReader, Receipt, ReceiptWaiter,
    TxSubmitter,
};
pub use intent::{IntentError, LockupPeriod, StakeIntent, SECONDS_PER_MONTH};
pub use request::TransactionRequest;
pub use stake::StakeData;
