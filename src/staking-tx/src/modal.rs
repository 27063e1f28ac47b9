//! Headless confirmation dialog.
//!
//! Holds what the dialog shows (title, summary lines, button) and its state machine:
//!
//! ```text
//! Closed ──open──▶ OpenIdle ──confirm──▶ Submitting ──ok──▶ ClosedOnSuccess
//!                     ▲                      │
//!                     └────────err───────────┘
//! ```
//!
//! `close` is allowed from any state. It never cancels an attempt in flight; the
//! attempt's completion simply no longer moves the dialog.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::StakeTxError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    OpenIdle,
    Submitting,
    ClosedOnSuccess,
}

/// What the confirm button does.
#[async_trait]
pub trait ConfirmAction: Send + Sync {
    async fn confirm(&self) -> Result<(), StakeTxError>;

    fn is_loading(&self) -> bool;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataLine {
    pub label: String,
    pub value: String,
    pub emphasis: bool,
}

impl DataLine {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            emphasis: false,
        }
    }

    pub fn emphasized(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            emphasis: true,
            ..Self::new(label, value)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalContent {
    pub title: String,
    pub button_text: String,
    pub lines: Vec<DataLine>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Not open, or an attempt is already running.
    Ignored,
    Succeeded,
    Failed(StakeTxError),
}

pub struct StakeModal<A> {
    content: ModalContent,
    action: A,
    state: Mutex<ModalState>,
}

impl<A: ConfirmAction> StakeModal<A> {
    pub fn new(content: ModalContent, action: A) -> Self {
        Self {
            content,
            action,
            state: Mutex::new(ModalState::Closed),
        }
    }

    pub fn content(&self) -> &ModalContent {
        &self.content
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn state(&self) -> ModalState {
        *self.lock_state()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state(), ModalState::OpenIdle | ModalState::Submitting)
    }

    pub fn button_loading(&self) -> bool {
        self.state() == ModalState::Submitting || self.action.is_loading()
    }

    pub fn open(&self) {
        let mut state = self.lock_state();
        if matches!(*state, ModalState::Closed | ModalState::ClosedOnSuccess) {
            *state = ModalState::OpenIdle;
        }
    }

    pub fn close(&self) {
        *self.lock_state() = ModalState::Closed;
    }

    /// One press of the confirm button: at most one attempt, never retried.
    pub async fn confirm(&self) -> ConfirmOutcome {
        {
            let mut state = self.lock_state();
            if *state != ModalState::OpenIdle || self.action.is_loading() {
                tracing::debug!(state = ?*state, "confirm ignored");
                return ConfirmOutcome::Ignored;
            }
            *state = ModalState::Submitting;
        }

        let result = self.action.confirm().await;

        let mut state = self.lock_state();
        if *state == ModalState::Submitting {
            *state = match result {
                Ok(()) => ModalState::ClosedOnSuccess,
                Err(_) => ModalState::OpenIdle,
            };
        }
        match result {
            Ok(()) => ConfirmOutcome::Succeeded,
            Err(err) => ConfirmOutcome::Failed(err),
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ModalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
