#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Fresh page load (initial start or after a reload).
    PageLoaded,
    /// Poll timer expired.
    PollDue,
    /// The status request completed with a transport-level response.
    ResponseReceived { status: u16, body: String },
    /// The status request could not be sent or its body could not be read.
    TransportFailed { reason: String },
    ChannelOpened,
    /// One inbound push line, `<code>: <payload>`.
    ChannelMessage(String),
    ChannelClosed,
    ChannelErrored { reason: String },
    ReconnectDue,
    ReloadDue,
    NavigateDue,
}
