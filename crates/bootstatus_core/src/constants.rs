use std::time::Duration;

/// Delay between the end of one poll and the start of the next; also the push reconnect delay.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);
/// Delay before a scheduled full reload.
pub const RELOAD_DELAY: Duration = Duration::from_millis(3000);
/// Delay before navigating to a captive-portal link.
pub const NAVIGATE_DELAY: Duration = Duration::from_millis(3000);

/// Status document polled relative to the page URL.
pub const STATUS_PATH: &str = "msg.html";

/// Presence of this text marks the backing service as still starting.
pub const BOOT_MARKER: &str = "Booting ";
/// A full HTML document instead of a fragment is a generic error page.
pub const HTML_PAGE_MARKER: &str = "<html>";
/// Status text carrying a link to follow.
pub const LINK_MARKER: &str = "href=";

pub const PORTAL_LOADING_TEXT: &str = "Connecting to web portal";
