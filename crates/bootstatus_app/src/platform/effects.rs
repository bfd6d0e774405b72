use bootstatus_core::{apply_render, Effect, Renderer, Timer};
use bootstatus_engine::{EngineHandle, TimerKind};
use status_logging::{status_debug, status_error, status_info};

/// What the host loop has to do after a batch of effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Continue,
    Reload,
    Navigate(String),
}

pub struct EffectRunner<R: Renderer> {
    engine: EngineHandle,
    renderer: R,
}

impl<R: Renderer> EffectRunner<R> {
    pub fn new(engine: EngineHandle, renderer: R) -> Self {
        Self { engine, renderer }
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut EngineHandle {
        &mut self.engine
    }

    #[cfg(test)]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Executes effects in order. Reload and navigation end the page, so later effects are dropped.
    pub fn run(&mut self, effects: Vec<Effect>) -> Control {
        for effect in effects {
            match effect {
                Effect::Fetch => self.engine.fetch(),
                Effect::StartTimer { timer, delay } => {
                    status_debug!("Timer {:?} armed for {:?}", timer, delay);
                    self.engine.start_timer(map_timer(timer), delay);
                }
                Effect::OpenChannel => self.engine.open_channel(),
                Effect::CloseChannel => self.engine.close_channel(),
                Effect::Render(request) => {
                    if let Err(err) = apply_render(&mut self.renderer, &request) {
                        status_error!("Render failed: {}", err);
                    }
                }
                Effect::Reload => {
                    status_info!("Reloading page");
                    return Control::Reload;
                }
                Effect::Navigate { url } => {
                    status_info!("Navigating to {}", url);
                    return Control::Navigate(url);
                }
            }
        }
        Control::Continue
    }
}

fn map_timer(timer: Timer) -> TimerKind {
    match timer {
        Timer::Poll => TimerKind::Poll,
        Timer::Reconnect => TimerKind::Reconnect,
        Timer::Reload => TimerKind::Reload,
        Timer::Navigate => TimerKind::Navigate,
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::time::Duration;

    use bootstatus_core::{RenderError, RenderKind, RenderRequest};
    use bootstatus_engine::{EngineEndpoints, EngineEvent, FetchSettings};
    use url::Url;

    use super::*;

    struct Unwritable;

    impl Renderer for Unwritable {
        fn show_status(&mut self, _text: &str, _loading: bool) -> Result<(), RenderError> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed").into())
        }

        fn show_error(&mut self, _text: &str) -> Result<(), RenderError> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed").into())
        }
    }

    fn idle_engine() -> EngineHandle {
        let endpoints = EngineEndpoints {
            status: Url::parse("http://127.0.0.1:9/msg.html").unwrap(),
            push: Url::parse("ws://127.0.0.1:9/status").unwrap(),
        };
        EngineHandle::new(FetchSettings::default(), endpoints).unwrap()
    }

    #[test]
    fn render_failure_keeps_the_poll_loop_running() {
        status_logging::initialize_for_tests();
        let mut runner = EffectRunner::new(idle_engine(), Unwritable);

        let control = runner.run(vec![
            Effect::Render(RenderRequest::new(
                "Error: Received statuscode 500",
                RenderKind::Error,
            )),
            Effect::StartTimer {
                timer: Timer::Poll,
                delay: Duration::from_millis(20),
            },
        ]);

        assert_eq!(control, Control::Continue);
        assert_eq!(
            runner.engine().recv_timeout(Duration::from_secs(2)),
            Some(EngineEvent::TimerFired(TimerKind::Poll))
        );
    }

    #[test]
    fn reload_drops_the_rest_of_the_batch() {
        status_logging::initialize_for_tests();
        let mut runner = EffectRunner::new(idle_engine(), Unwritable);

        let control = runner.run(vec![
            Effect::Reload,
            Effect::StartTimer {
                timer: Timer::Poll,
                delay: Duration::from_millis(20),
            },
        ]);

        assert_eq!(control, Control::Reload);
        assert_eq!(runner.engine().recv_timeout(Duration::from_millis(200)), None);
    }
}
