use status_logging::{status_debug, status_info, status_warn};

use crate::{
    first_anchor_target, parse_push_line, Effect, Msg, Phase, PollerState, PushEvent, RenderKind,
    RenderRequest, Timer, BOOT_MARKER, HTML_PAGE_MARKER, LINK_MARKER, NAVIGATE_DELAY,
    POLL_INTERVAL, PORTAL_LOADING_TEXT, RELOAD_DELAY,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PollerState, msg: Msg) -> (PollerState, Vec<Effect>) {
    let mut effects = Vec::new();

    match msg {
        Msg::PageLoaded => {
            if state.config().polling() {
                state.set_phase(Phase::Polling);
                effects.push(Effect::Fetch);
            }
            if state.config().push_channel() {
                effects.push(Effect::OpenChannel);
            }
        }
        Msg::PollDue => {
            if *state.phase() == Phase::WaitingRetry {
                state.set_phase(Phase::Polling);
                effects.push(Effect::Fetch);
            } else {
                status_debug!("Poll timer ignored in phase {:?}", state.phase());
            }
        }
        Msg::ResponseReceived { status, body } => {
            if *state.phase() == Phase::Polling {
                on_response(&mut state, status, &body, &mut effects);
            } else {
                status_debug!("Late response {} ignored in phase {:?}", status, state.phase());
            }
        }
        Msg::TransportFailed { reason } => {
            if *state.phase() == Phase::Polling {
                show_error(&mut state, format!("Error: {reason}"), &mut effects);
                if state.booting() {
                    schedule_poll(&mut state, &mut effects);
                } else {
                    schedule_reload(&mut state, &mut effects);
                }
            }
        }
        Msg::ChannelOpened => {
            status_info!("Push channel connected");
            state.set_channel_open(true);
        }
        Msg::ChannelMessage(line) => match parse_push_line(&line) {
            PushEvent::Status(payload) => {
                process_status(&mut state, payload, &mut effects);
            }
            PushEvent::Error(payload) => show_error(&mut state, payload.to_owned(), &mut effects),
            PushEvent::Unknown { code } => status_warn!("Unknown event: {}", code),
        },
        Msg::ChannelClosed => {
            state.set_channel_open(false);
            if !leaving(&state) && !state.reload_armed() {
                effects.push(Effect::StartTimer {
                    timer: Timer::Reconnect,
                    delay: POLL_INTERVAL,
                });
            }
        }
        Msg::ChannelErrored { reason } => {
            status_warn!("Push channel error: {}", reason);
            effects.push(Effect::CloseChannel);
            // Navigation armed before the reload timer fires takes precedence.
            if !state.booting() && !leaving(&state) && !state.reload_armed() {
                state.arm_reload();
                effects.push(Effect::StartTimer {
                    timer: Timer::Reload,
                    delay: RELOAD_DELAY,
                });
            }
        }
        Msg::ReconnectDue => {
            if state.config().push_channel()
                && !state.channel_open()
                && !state.reload_armed()
                && !leaving(&state)
            {
                effects.push(Effect::OpenChannel);
            }
        }
        Msg::ReloadDue => {
            if let Phase::Redirecting { target } = state.phase() {
                status_debug!("Reload skipped, navigation to {} is armed", target);
            } else if *state.phase() == Phase::Reloading || state.reload_armed() {
                state.set_phase(Phase::Reloading);
                effects.push(Effect::Reload);
            }
        }
        Msg::NavigateDue => {
            if let Phase::Redirecting { target } = state.phase() {
                effects.push(Effect::Navigate {
                    url: target.clone(),
                });
            }
        }
    }

    (state, effects)
}

fn on_response(state: &mut PollerState, status: u16, body: &str, effects: &mut Vec<Effect>) {
    if body.is_empty() {
        if state.booting() {
            schedule_poll(state, effects);
        } else {
            // Session ended: the server answers but has nothing left to say.
            state.set_phase(Phase::Reloading);
            effects.push(Effect::Reload);
        }
        return;
    }

    let mut not_found = status == 404;
    if status == 200 {
        if contains_ignore_case(body, HTML_PAGE_MARKER) {
            not_found = true;
        } else {
            if !process_status(state, body, effects) {
                schedule_poll(state, effects);
            }
            return;
        }
    }

    if not_found {
        show_info(state, PORTAL_LOADING_TEXT, RenderKind::Loading, effects);
        schedule_reload(state, effects);
        return;
    }

    show_error(state, format!("Error: Received statuscode {status}"), effects);
    schedule_poll(state, effects);
}

/// Render a status text and arm navigation if it carries a link.
/// Returns true when the page is now redirecting.
fn process_status(state: &mut PollerState, text: &str, effects: &mut Vec<Effect>) -> bool {
    let kind = if text.contains(BOOT_MARKER) {
        RenderKind::Loading
    } else {
        RenderKind::Status
    };
    show_info(state, text, kind, effects);

    if !contains_ignore_case(text, LINK_MARKER) {
        return false;
    }
    if let Phase::Redirecting { .. } = state.phase() {
        return true;
    }
    match first_anchor_target(text, state.config().page_url()) {
        Some(target) => {
            status_info!("Redirecting to {} in {:?}", target, NAVIGATE_DELAY);
            state.set_phase(Phase::Redirecting { target });
            effects.push(Effect::StartTimer {
                timer: Timer::Navigate,
                delay: NAVIGATE_DELAY,
            });
            true
        }
        None => {
            status_warn!("Status mentions a link but has no usable anchor");
            false
        }
    }
}

fn show_info(state: &mut PollerState, text: &str, kind: RenderKind, effects: &mut Vec<Effect>) {
    if text.is_empty() {
        return;
    }
    if text.contains(BOOT_MARKER) {
        state.mark_booting();
    }
    if state.displayed() == Some(text) {
        return;
    }
    state.set_displayed(text);
    effects.push(Effect::Render(RenderRequest::new(text, kind)));
}

fn show_error(state: &mut PollerState, text: String, effects: &mut Vec<Effect>) {
    status_warn!("{}", text);
    show_info(state, &text, RenderKind::Error, effects);
}

fn schedule_poll(state: &mut PollerState, effects: &mut Vec<Effect>) {
    state.set_phase(Phase::WaitingRetry);
    effects.push(Effect::StartTimer {
        timer: Timer::Poll,
        delay: POLL_INTERVAL,
    });
}

fn schedule_reload(state: &mut PollerState, effects: &mut Vec<Effect>) {
    state.set_phase(Phase::Reloading);
    effects.push(Effect::StartTimer {
        timer: Timer::Reload,
        delay: RELOAD_DELAY,
    });
}

/// A reload or navigation is already armed for this page.
fn leaving(state: &PollerState) -> bool {
    matches!(state.phase(), Phase::Reloading | Phase::Redirecting { .. })
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
