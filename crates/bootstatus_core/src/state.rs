use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    page_url: Url,
    polling: bool,
    push_channel: bool,
}

impl PollerConfig {
    /// Poll and push both enabled.
    pub fn new(page_url: Url) -> Self {
        Self {
            page_url,
            polling: true,
            push_channel: true,
        }
    }

    pub fn with_polling(mut self, enabled: bool) -> Self {
        self.polling = enabled;
        self
    }

    pub fn with_push_channel(mut self, enabled: bool) -> Self {
        self.push_channel = enabled;
        self
    }

    pub fn page_url(&self) -> &Url {
        &self.page_url
    }

    pub fn polling(&self) -> bool {
        self.polling
    }

    pub fn push_channel(&self) -> bool {
        self.push_channel
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// A status request is in flight.
    Polling,
    /// The next poll timer is armed.
    WaitingRetry,
    /// Navigation to `target` is armed; polling has stopped.
    Redirecting { target: String },
    /// A reload is armed or under way.
    Reloading,
}

/// Everything one page load knows. A reload replaces it with a fresh value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerState {
    config: PollerConfig,
    phase: Phase,
    booting: bool,
    displayed: Option<String>,
    channel_open: bool,
    reload_armed: bool,
}

impl PollerState {
    pub fn new(config: PollerConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            booting: false,
            displayed: None,
            channel_open: false,
            reload_armed: false,
        }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn booting(&self) -> bool {
        self.booting
    }

    /// Raw text of the last rendered message.
    pub fn displayed(&self) -> Option<&str> {
        self.displayed.as_deref()
    }

    pub fn channel_open(&self) -> bool {
        self.channel_open
    }

    /// A push channel failure armed the reload timer.
    pub fn reload_armed(&self) -> bool {
        self.reload_armed
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn mark_booting(&mut self) {
        self.booting = true;
    }

    pub(crate) fn set_displayed(&mut self, text: &str) {
        self.displayed = Some(text.to_owned());
    }

    pub(crate) fn set_channel_open(&mut self, open: bool) {
        self.channel_open = open;
    }

    pub(crate) fn arm_reload(&mut self) {
        self.reload_armed = true;
    }
}
