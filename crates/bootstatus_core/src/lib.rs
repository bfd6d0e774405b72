//! Bootstatus core: pure poller state machine, classification and render decisions.
mod anchor;
mod constants;
mod effect;
mod endpoint;
mod msg;
mod push;
mod render;
mod state;
mod update;
mod view_model;

pub use anchor::first_anchor_target;
pub use constants::{
    BOOT_MARKER, HTML_PAGE_MARKER, LINK_MARKER, NAVIGATE_DELAY, POLL_INTERVAL,
    PORTAL_LOADING_TEXT, RELOAD_DELAY, STATUS_PATH,
};
pub use effect::{Effect, Timer};
pub use endpoint::{push_channel_url, status_url, EndpointError};
pub use msg::Msg;
pub use push::{parse_push_line, PushEvent};
pub use render::{apply_render, RegionRenderer, RenderError, Renderer};
pub use state::{Phase, PollerConfig, PollerState};
pub use update::update;
pub use view_model::{RenderKind, RenderRequest, StatusView};
