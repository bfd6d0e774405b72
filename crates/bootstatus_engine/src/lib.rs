//! Bootstatus engine: status fetches, push channel and timers on a background runtime.
mod channel;
mod engine;
mod fetch;
mod types;

pub use engine::{EngineEndpoints, EngineError, EngineHandle};
pub use fetch::{ChannelEventSink, EventSink, FetchSettings, ReqwestStatusFetcher, StatusFetcher};
pub use types::{ChannelEvent, EngineEvent, FailureKind, FetchError, PollResponse, TimerKind};
