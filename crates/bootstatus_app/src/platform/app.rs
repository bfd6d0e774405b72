use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use bootstatus_core::{
    push_channel_url, status_url, update, Msg, PollerConfig, PollerState, Renderer, Timer,
    POLL_INTERVAL,
};
use bootstatus_engine::{
    ChannelEvent, EngineEndpoints, EngineEvent, EngineHandle, FetchSettings, TimerKind,
};
use status_logging::{status_debug, status_info, status_warn};

use super::cli::Cli;
use super::effects::{Control, EffectRunner};
use super::logging;
use super::ui::render::TerminalRenderer;

const MIN_RELOAD_INTERVAL: Duration = POLL_INTERVAL;

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    logging::initialize(cli.log_destination(), cli.log_level());

    if cli.no_poll && cli.no_push {
        bail!("--no-poll and --no-push together leave nothing to watch");
    }

    let config = cli.poller_config();
    let engine = start_engine(&config)?;
    let mut host = PageHost::new(config, engine, TerminalRenderer::stdout());
    let target = host.run()?;

    println!("Continue at {target}");
    Ok(())
}

fn start_engine(config: &PollerConfig) -> anyhow::Result<EngineHandle> {
    let page = config.page_url();
    let endpoints = EngineEndpoints {
        status: status_url(page).context("deriving status document url")?,
        push: push_channel_url(page).context("deriving push channel url")?,
    };
    status_info!(
        "Watching {} (poll {}, push {})",
        page,
        endpoints.status,
        endpoints.push
    );
    Ok(EngineHandle::new(FetchSettings::default(), endpoints)?)
}

/// Plays the part of the browser page: owns the poller state and performs reload and navigation.
pub struct PageHost<R: Renderer> {
    config: PollerConfig,
    runner: EffectRunner<R>,
    last_load: Option<Instant>,
}

impl<R: Renderer> PageHost<R> {
    pub fn new(config: PollerConfig, engine: EngineHandle, renderer: R) -> Self {
        Self {
            config,
            runner: EffectRunner::new(engine, renderer),
            last_load: None,
        }
    }

    #[cfg(test)]
    pub fn renderer(&self) -> &R {
        self.runner.renderer()
    }

    /// Runs page loads until one of them navigates away; returns the navigation target.
    pub fn run(&mut self) -> anyhow::Result<String> {
        loop {
            let (mut state, mut control) = self.load_page();
            while control == Control::Continue {
                let Some(event) = self.runner.engine().recv() else {
                    bail!("status engine stopped");
                };
                (state, control) = self.dispatch(state, map_event(event));
            }
            match control {
                Control::Navigate(url) => return Ok(url),
                Control::Reload | Control::Continue => {}
            }
        }
    }

    fn load_page(&mut self) -> (PollerState, Control) {
        // Consecutive page loads start at least one poll interval apart.
        if let Some(last) = self.last_load {
            if let Some(wait) = MIN_RELOAD_INTERVAL.checked_sub(last.elapsed()) {
                status_debug!("Pacing reload by {:?}", wait);
                thread::sleep(wait);
            }
        }
        self.last_load = Some(Instant::now());

        let generation = self.runner.engine_mut().reset();
        status_logging::set_page_generation(generation);
        status_info!("Page load #{}", generation);
        self.dispatch(PollerState::new(self.config.clone()), Msg::PageLoaded)
    }

    fn dispatch(&mut self, state: PollerState, msg: Msg) -> (PollerState, Control) {
        let (state, effects) = update(state, msg);
        let control = self.runner.run(effects);
        (state, control)
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PollCompleted(Ok(response)) => Msg::ResponseReceived {
            status: response.status,
            body: response.body,
        },
        EngineEvent::PollCompleted(Err(err)) => {
            status_warn!("Status request failed: {}", err);
            Msg::TransportFailed {
                reason: err.to_string(),
            }
        }
        EngineEvent::Channel(ChannelEvent::Opened) => Msg::ChannelOpened,
        EngineEvent::Channel(ChannelEvent::Message(line)) => Msg::ChannelMessage(line),
        EngineEvent::Channel(ChannelEvent::Closed) => Msg::ChannelClosed,
        EngineEvent::Channel(ChannelEvent::Errored(reason)) => Msg::ChannelErrored { reason },
        EngineEvent::TimerFired(kind) => timer_msg(map_timer_kind(kind)),
    }
}

fn map_timer_kind(kind: TimerKind) -> Timer {
    match kind {
        TimerKind::Poll => Timer::Poll,
        TimerKind::Reconnect => Timer::Reconnect,
        TimerKind::Reload => Timer::Reload,
        TimerKind::Navigate => Timer::Navigate,
    }
}

fn timer_msg(timer: Timer) -> Msg {
    match timer {
        Timer::Poll => Msg::PollDue,
        Timer::Reconnect => Msg::ReconnectDue,
        Timer::Reload => Msg::ReloadDue,
        Timer::Navigate => Msg::NavigateDue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bootstatus_core::{NAVIGATE_DELAY, PORTAL_LOADING_TEXT};
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn poll_only(server: &MockServer) -> PollerConfig {
        let page = Url::parse(&format!("{}/boot/index.html", server.uri())).unwrap();
        PollerConfig::new(page).with_push_channel(false)
    }

    fn run_host(config: PollerConfig) -> (anyhow::Result<String>, String) {
        status_logging::initialize_for_tests();
        let engine = start_engine(&config).unwrap();
        let mut host = PageHost::new(config, engine, TerminalRenderer::new(Vec::new()));
        let result = host.run();
        let printed = String::from_utf8(host.renderer().output().clone()).unwrap();
        (result, printed)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn portal_link_ends_the_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/boot/msg.html"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"Ready: <a href="http://portal/x">continue</a>"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let config = poll_only(&server);
        let (result, printed) = tokio::task::spawn_blocking(move || run_host(config))
            .await
            .unwrap();

        assert_eq!(result.unwrap(), "http://portal/x");
        assert_eq!(
            printed,
            "* Ready: <a href=\"http://portal/x\">continue</a>\n"
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn not_found_reloads_then_follows_portal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/boot/msg.html"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/boot/msg.html"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"<a href="/portal/">go</a>"#),
            )
            .mount(&server)
            .await;

        let config = poll_only(&server);
        let expected = format!("{}/portal/", server.uri());
        let (result, printed) = tokio::task::spawn_blocking(move || run_host(config))
            .await
            .unwrap();

        assert_eq!(result.unwrap(), expected);
        assert!(printed.starts_with(&format!("* {PORTAL_LOADING_TEXT} ...\n")));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn failed_push_handshake_still_follows_polled_link() {
        // The server only knows msg.html, so every push handshake is answered with 404.
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/boot/msg.html"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"Ready: <a href="http://portal/x">continue</a>"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let page = Url::parse(&format!("{}/boot/index.html", server.uri())).unwrap();
        let config = PollerConfig::new(page);
        let (result, _printed) = tokio::task::spawn_blocking(move || run_host(config))
            .await
            .unwrap();

        assert_eq!(result.unwrap(), "http://portal/x");
        let handshakes = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|request| request.url.path() == "/boot/status")
            .count();
        assert_eq!(handshakes, 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn immediate_reload_waits_for_the_poll_interval() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/boot/msg.html"))
            .respond_with(ResponseTemplate::new(200))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/boot/msg.html"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"<a href="http://portal/x">go</a>"#),
            )
            .mount(&server)
            .await;

        let config = poll_only(&server);
        let started = Instant::now();
        let (result, _printed) = tokio::task::spawn_blocking(move || run_host(config))
            .await
            .unwrap();

        assert_eq!(result.unwrap(), "http://portal/x");
        assert!(started.elapsed() >= POLL_INTERVAL + NAVIGATE_DELAY);
    }

    #[test]
    fn timer_events_map_to_due_messages() {
        assert_eq!(
            map_event(EngineEvent::TimerFired(TimerKind::Navigate)),
            Msg::NavigateDue
        );
        assert_eq!(
            map_event(EngineEvent::Channel(ChannelEvent::Message("s: x".to_string()))),
            Msg::ChannelMessage("s: x".to_string())
        );
    }
}
