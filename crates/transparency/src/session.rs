use serde::{Deserialize, Serialize};
use shared::domain::TransparencyValue;

use crate::{controller::PreviewController, error::SessionError, Target};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Committed,
    Cancelled,
}

/// One event emitted by the interaction surface while a session is open.
#[derive(Debug, Clone, Copy)]
pub enum SessionEvent {
    ValueChanged(TransparencyValue),
    Confirmed(TransparencyValue),
    Cancelled,
}

/// Summary returned on confirmation, for the host to persist and report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommitResult {
    pub final_value: TransparencyValue,
    pub applied_opacity: f64,
    pub target_count: usize,
    pub preview_enabled: bool,
}

/// One complete adjust-and-confirm-or-cancel interaction over a fixed
/// target set. Starts `Active` and ends exactly once, in `Committed` or
/// `Cancelled`.
pub struct TransparencySession<T: Target> {
    controller: PreviewController<T>,
    state: SessionState,
    initial_value: TransparencyValue,
    preview_enabled: bool,
}

impl<T: Target> TransparencySession<T> {
    /// Captures the targets' current opacities and opens the session.
    /// Fails with [`SessionError::EmptySelection`] before any target is
    /// read when `targets` is empty.
    pub fn start(
        targets: Vec<T>,
        initial_value: TransparencyValue,
        preview_default: bool,
    ) -> Result<Self, SessionError> {
        if targets.is_empty() {
            return Err(SessionError::EmptySelection);
        }

        let controller = PreviewController::capture(targets, preview_default)?;
        Ok(Self {
            controller,
            state: SessionState::Active,
            initial_value,
            preview_enabled: preview_default,
        })
    }

    /// Forwards one intermediate value to the preview broadcast.
    pub fn on_value_changed(&mut self, value: TransparencyValue) -> Result<(), SessionError> {
        self.ensure_active("on_value_changed")?;
        self.controller.preview(value);
        Ok(())
    }

    /// Permanently applies `final_value` and closes the session.
    pub fn confirm(&mut self, final_value: TransparencyValue) -> Result<CommitResult, SessionError> {
        self.ensure_active("confirm")?;
        let applied_opacity = self.controller.commit(final_value);
        self.state = SessionState::Committed;
        Ok(CommitResult {
            final_value,
            applied_opacity,
            target_count: self.controller.target_count(),
            preview_enabled: self.preview_enabled,
        })
    }

    /// Restores the captured opacities and closes the session. Rollback
    /// has fully completed by the time this returns.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        self.ensure_active("cancel")?;
        self.controller.rollback();
        self.state = SessionState::Cancelled;
        Ok(())
    }

    /// Maps one surface event onto the matching session operation,
    /// returning the commit summary when the event was a confirmation.
    pub fn apply_event(&mut self, event: SessionEvent) -> Result<Option<CommitResult>, SessionError> {
        match event {
            SessionEvent::ValueChanged(value) => {
                self.on_value_changed(value)?;
                Ok(None)
            }
            SessionEvent::Confirmed(value) => self.confirm(value).map(Some),
            SessionEvent::Cancelled => {
                self.cancel()?;
                Ok(None)
            }
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn initial_value(&self) -> TransparencyValue {
        self.initial_value
    }

    pub fn preview_enabled(&self) -> bool {
        self.preview_enabled
    }

    fn ensure_active(&self, operation: &'static str) -> Result<(), SessionError> {
        if self.state == SessionState::Active {
            Ok(())
        } else {
            Err(SessionError::InvalidSessionState {
                operation,
                state: self.state,
            })
        }
    }
}
