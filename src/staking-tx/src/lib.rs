//! Approval-gated GTC staking transactions.
//!
//! - [`orchestrator`]: approve-then-stake sequencing over a [`ChainClient`](staking_types::ChainClient)
//! - [`handler`]: submission + confirmation of the staking call itself
//! - [`modal`]: headless confirmation dialog state machine
//! - [`self_stake`]: the "stake on yourself" / "update self stake" flow
//! - [`notify`]: user-facing transaction notices

pub mod allowance;
pub mod error;
pub mod format;
pub mod handler;
pub mod modal;
pub mod notify;
pub mod orchestrator;
pub mod self_stake;

#[cfg(test)]
mod mock;

pub use allowance::{check_allowance, AllowanceCheck};
pub use error::StakeTxError;
pub use handler::StakeTxHandler;
pub use modal::{ConfirmAction, ConfirmOutcome, DataLine, ModalContent, ModalState, StakeModal};
pub use notify::{Notice, Notifier, TracingNotifier};
pub use orchestrator::{ApprovalGatedExecutor, Execution, ExecutorConfig};
pub use self_stake::{parse_gtc, SelfStakeModal, SelfStakeTx};
