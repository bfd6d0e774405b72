use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
    Poll,
    Reconnect,
    Reload,
    Navigate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue one GET against the status document.
    Fetch,
    /// Arm a one-shot timer; its expiry comes back as the matching `*Due` message.
    StartTimer { timer: Timer, delay: Duration },
    OpenChannel,
    CloseChannel,
    Render(crate::RenderRequest),
    /// Throw away all state, timers and connections and load the page again.
    Reload,
    Navigate { url: String },
}
