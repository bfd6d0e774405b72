use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use status_logging::{status_debug, status_trace};
use tokio::sync::mpsc as command_mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::channel::run_push_channel;
use crate::fetch::{ChannelEventSink, EventSink, FetchSettings, ReqwestStatusFetcher, StatusFetcher};
use crate::{EngineEvent, TimerKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineEndpoints {
    pub status: Url,
    pub push: Url,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to build runtime: {0}")]
    Runtime(std::io::Error),
    #[error("failed to spawn engine thread: {0}")]
    Thread(std::io::Error),
}

enum EngineCommand {
    Fetch,
    OpenChannel,
    CloseChannel,
    StartTimer { kind: TimerKind, delay: Duration },
    Reset { generation: u64 },
}

/// Owner side of the engine thread. Events from before the latest `reset` are discarded.
pub struct EngineHandle {
    cmd_tx: command_mpsc::UnboundedSender<EngineCommand>,
    event_rx: mpsc::Receiver<(u64, EngineEvent)>,
    generation: u64,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings, endpoints: EngineEndpoints) -> Result<Self, EngineError> {
        Self::with_fetcher(Arc::new(ReqwestStatusFetcher::new(settings)), endpoints)
    }

    pub fn with_fetcher(
        fetcher: Arc<dyn StatusFetcher>,
        endpoints: EngineEndpoints,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, mut cmd_rx) = command_mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(EngineError::Runtime)?;

        thread::Builder::new()
            .name("bootstatus-engine".to_string())
            .spawn(move || {
                let mut dispatcher = Dispatcher::new(fetcher, endpoints, event_tx);
                runtime.block_on(async move {
                    while let Some(command) = cmd_rx.recv().await {
                        dispatcher.handle(command);
                    }
                    dispatcher.page.cancel();
                });
            })
            .map_err(EngineError::Thread)?;

        Ok(Self {
            cmd_tx,
            event_rx,
            generation: 0,
        })
    }

    pub fn fetch(&self) {
        self.send(EngineCommand::Fetch);
    }

    pub fn open_channel(&self) {
        self.send(EngineCommand::OpenChannel);
    }

    pub fn close_channel(&self) {
        self.send(EngineCommand::CloseChannel);
    }

    pub fn start_timer(&self, kind: TimerKind, delay: Duration) {
        self.send(EngineCommand::StartTimer { kind, delay });
    }

    /// Cancels every pending timer, request and connection and starts a new generation.
    pub fn reset(&mut self) -> u64 {
        self.generation += 1;
        self.send(EngineCommand::Reset {
            generation: self.generation,
        });
        self.generation
    }

    /// Blocks for the next current-generation event. `None` once the engine thread is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        loop {
            let (generation, event) = self.event_rx.recv().ok()?;
            if let Some(event) = self.current(generation, event) {
                return Some(event);
            }
        }
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.checked_duration_since(Instant::now())?;
            let (generation, event) = self.event_rx.recv_timeout(remaining).ok()?;
            if let Some(event) = self.current(generation, event) {
                return Some(event);
            }
        }
    }

    fn current(&self, generation: u64, event: EngineEvent) -> Option<EngineEvent> {
        if generation == self.generation {
            Some(event)
        } else {
            status_trace!("Dropping {:?} from page generation {}", event, generation);
            None
        }
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

struct Dispatcher {
    fetcher: Arc<dyn StatusFetcher>,
    endpoints: EngineEndpoints,
    event_tx: mpsc::Sender<(u64, EngineEvent)>,
    sink: ChannelEventSink,
    page: CancellationToken,
    channel: Option<(CancellationToken, JoinHandle<()>)>,
}

impl Dispatcher {
    fn new(
        fetcher: Arc<dyn StatusFetcher>,
        endpoints: EngineEndpoints,
        event_tx: mpsc::Sender<(u64, EngineEvent)>,
    ) -> Self {
        let sink = ChannelEventSink::new(event_tx.clone(), 0);
        Self {
            fetcher,
            endpoints,
            event_tx,
            sink,
            page: CancellationToken::new(),
            channel: None,
        }
    }

    fn handle(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Fetch => {
                let fetcher = Arc::clone(&self.fetcher);
                let url = self.endpoints.status.clone();
                let sink = self.sink.clone();
                let page = self.page.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        _ = page.cancelled() => {}
                        result = fetcher.fetch(&url) => sink.emit(EngineEvent::PollCompleted(result)),
                    }
                });
            }
            EngineCommand::OpenChannel => {
                if let Some((_, task)) = &self.channel {
                    if !task.is_finished() {
                        status_debug!("Push channel already running");
                        return;
                    }
                }
                let close = self.page.child_token();
                let url = self.endpoints.push.clone();
                let sink = self.sink.clone();
                let task = tokio::spawn({
                    let close = close.clone();
                    async move { run_push_channel(url, &sink, close).await }
                });
                self.channel = Some((close, task));
            }
            EngineCommand::CloseChannel => {
                if let Some((close, _)) = &self.channel {
                    close.cancel();
                }
            }
            EngineCommand::StartTimer { kind, delay } => {
                let sink = self.sink.clone();
                let page = self.page.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        _ = page.cancelled() => {}
                        _ = tokio::time::sleep(delay) => sink.emit(EngineEvent::TimerFired(kind)),
                    }
                });
            }
            EngineCommand::Reset { generation } => {
                status_logging::set_page_generation(generation);
                self.page.cancel();
                self.page = CancellationToken::new();
                self.channel = None;
                self.sink = ChannelEventSink::new(self.event_tx.clone(), generation);
            }
        }
    }
}
