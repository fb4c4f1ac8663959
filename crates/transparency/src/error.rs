use thiserror::Error;

use crate::session::SessionState;

/// Failure raised by a host target's opacity accessors, e.g. when the
/// underlying layer was removed mid-session.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TargetError(String);

impl TargetError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no layers were selected for this session")]
    EmptySelection,
    #[error("{operation} is not valid once the session is {state:?}")]
    InvalidSessionState {
        operation: &'static str,
        state: SessionState,
    },
    #[error("layer '{name}' is unavailable: {source}")]
    TargetUnavailable {
        name: String,
        #[source]
        source: TargetError,
    },
}
