use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Poll,
    Reconnect,
    Reload,
    Navigate,
}

/// Raw outcome of one status request, whatever the status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Opened,
    Message(String),
    Closed,
    Errored(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    PollCompleted(Result<PollResponse, FetchError>),
    Channel(ChannelEvent),
    TimerFired(TimerKind),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Connect,
    Body,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Connect => write!(f, "connection failed"),
            FailureKind::Body => write!(f, "failed to read body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
