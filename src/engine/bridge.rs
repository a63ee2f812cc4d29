//! Session with one engine process.
//!
//! The protocol carries no request ids, so exactly one search may be in
//! flight. Callers enqueue requests on an unbounded FIFO channel; a single
//! driver task owns the engine's stdin and works through the queue one
//! request at a time. A single reader task owns stdout for the whole
//! session, reassembles lines and forwards each `bestmove` to the driver.
//!
//! ```text
//!   search() ──► requests (FIFO) ──► driver ──► stdin
//!                                      ▲
//!   stdout ──► reader ── bestmove ─────┘
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::Child;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use super::lines::LineBuffer;
use super::process::{forward_stderr, spawn_engine};
use super::protocol::{BestMove, EngineLine, UciCommand};
use super::{terminated, EngineError};
use crate::config::EngineConfig;

/// Size of each read from the engine's stdout.
const READ_CHUNK: usize = 4096;

/// How long `shutdown` waits for the engine to exit after `quit`.
const QUIT_GRACE: Duration = Duration::from_secs(2);

/// Lifecycle of an engine session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Process started, handshake not yet written.
    Uninitialized,
    Ready,
    AwaitingBestMove,
    /// Process gone or pipe failed; every request now fails.
    Terminated,
}

type Reply<T> = oneshot::Sender<Result<T, EngineError>>;
type BestMoveLine = Result<BestMove, EngineError>;

enum Request {
    Search {
        moves: Vec<String>,
        nodes: u32,
        reply: Reply<BestMove>,
    },
    NewGame {
        reply: Reply<()>,
    },
    Quit,
}

impl Request {
    fn fail(self, error: EngineError) {
        match self {
            Request::Search { reply, .. } => {
                let _ = reply.send(Err(error));
            }
            Request::NewGame { reply } => {
                let _ = reply.send(Err(error));
            }
            Request::Quit => {}
        }
    }
}

/// Handle to a running engine session.
pub struct EngineBridge {
    requests: mpsc::UnboundedSender<Request>,
    state: watch::Receiver<EngineState>,
    history: Vec<String>,
    nodes: u32,
    child: Option<Child>,
    driver: Option<JoinHandle<()>>,
    reader: JoinHandle<()>,
    stderr: Option<JoinHandle<()>>,
}

impl EngineBridge {
    /// Launch the configured engine and start a session on its pipes.
    pub fn spawn(config: &EngineConfig) -> Result<Self, EngineError> {
        let process = spawn_engine(config)?;
        let mut bridge = Self::with_io(process.stdin, process.stdout, config);
        bridge.stderr = process.stderr.map(|s| tokio::spawn(forward_stderr(s)));
        bridge.child = Some(process.child);
        Ok(bridge)
    }

    /// Start a session over arbitrary pipes. The handshake options from
    /// `config` are written before any queued request.
    pub fn with_io<W, R>(writer: W, reader: R, config: &EngineConfig) -> Self
    where
        W: AsyncWrite + Unpin + Send + 'static,
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (line_tx, line_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(EngineState::Uninitialized);

        let handshake = config
            .options
            .iter()
            .map(|(name, value)| UciCommand::SetOption {
                name: name.clone(),
                value: value.clone(),
            })
            .collect();
        let driver = Driver {
            writer,
            best_moves: line_rx,
            state: state_tx,
            search_timeout: config.search_timeout,
            stop_grace: config.stop_grace,
        };

        Self {
            requests: request_tx,
            state: state_rx,
            history: Vec::new(),
            nodes: config.nodes,
            child: None,
            driver: Some(tokio::spawn(driver.run(handshake, request_rx))),
            reader: tokio::spawn(read_lines(reader, line_tx)),
            stderr: None,
        }
    }

    /// Seed the notation history, e.g. when replacing a crashed session.
    pub fn with_history(mut self, history: Vec<String>) -> Self {
        self.history = history;
        self
    }

    pub fn state(&self) -> EngineState {
        *self.state.borrow()
    }

    /// Wait until the handshake has been written (or the session died).
    pub async fn ready(&self) -> EngineState {
        let mut state = self.state.clone();
        state
            .wait_for(|s| *s != EngineState::Uninitialized)
            .await
            .map(|s| *s)
            .unwrap_or(EngineState::Terminated)
    }

    /// Moves sent with every position, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Append an applied move. Does not start a search.
    pub fn record_move(&mut self, notation: impl Into<String>) {
        self.history.push(notation.into());
    }

    pub fn nodes(&self) -> u32 {
        self.nodes
    }

    /// Queue a search from the start position through the current history.
    ///
    /// The request is enqueued when this is called, not when the future is
    /// first polled, so searches resolve in call order.
    pub fn search(&self) -> impl Future<Output = Result<BestMove, EngineError>> + Send + 'static {
        let (reply, response) = oneshot::channel();
        let queued = self
            .requests
            .send(Request::Search {
                moves: self.history.clone(),
                nodes: self.nodes,
                reply,
            })
            .is_ok();
        async move {
            if !queued {
                return Err(terminated("engine session has ended"));
            }
            response
                .await
                .map_err(|_| terminated("engine session dropped the request"))?
        }
    }

    /// Clear the history and tell the engine a new game starts.
    pub async fn new_game(&mut self) -> Result<(), EngineError> {
        self.history.clear();
        let (reply, response) = oneshot::channel();
        self.requests
            .send(Request::NewGame { reply })
            .map_err(|_| terminated("engine session has ended"))?;
        response
            .await
            .map_err(|_| terminated("engine session dropped the request"))?
    }

    /// Send `quit` after any queued work and wait briefly for the process to
    /// exit, killing it otherwise.
    pub async fn shutdown(mut self) {
        let _ = self.requests.send(Request::Quit);
        if let Some(driver) = self.driver.take() {
            let _ = timeout(QUIT_GRACE, driver).await;
        }
        if let Some(mut child) = self.child.take() {
            match timeout(QUIT_GRACE, child.wait()).await {
                Ok(Ok(status)) => log::info!("engine exited with {}", status),
                _ => {
                    log::warn!("engine did not exit after quit, killing it");
                    let _ = child.kill().await;
                }
            }
        }
    }
}

impl Drop for EngineBridge {
    fn drop(&mut self) {
        if let Some(driver) = &self.driver {
            driver.abort();
        }
        self.reader.abort();
        if let Some(stderr) = &self.stderr {
            stderr.abort();
        }
    }
}

/// Why a search failed and whether the session survives it.
struct Failure {
    error: EngineError,
    fatal: bool,
}

impl Failure {
    fn fatal(error: EngineError) -> Self {
        Failure { error, fatal: true }
    }

    fn recoverable(error: EngineError) -> Self {
        Failure {
            error,
            fatal: false,
        }
    }
}

struct Driver<W> {
    writer: W,
    best_moves: mpsc::UnboundedReceiver<BestMoveLine>,
    state: watch::Sender<EngineState>,
    search_timeout: Option<Duration>,
    stop_grace: Duration,
}

impl<W: AsyncWrite + Unpin + Send> Driver<W> {
    async fn run(mut self, handshake: Vec<UciCommand>, mut requests: mpsc::UnboundedReceiver<Request>) {
        let reason = match self.serve(handshake, &mut requests).await {
            Ok(()) => "engine session closed".to_string(),
            Err(e) => {
                log::warn!("engine session terminated: {}", e);
                e.to_string()
            }
        };
        self.state.send_replace(EngineState::Terminated);
        requests.close();
        while let Ok(request) = requests.try_recv() {
            request.fail(terminated(reason.clone()));
        }
    }

    async fn serve(
        &mut self,
        handshake: Vec<UciCommand>,
        requests: &mut mpsc::UnboundedReceiver<Request>,
    ) -> Result<(), EngineError> {
        for command in &handshake {
            self.send(command).await?;
        }
        self.state.send_replace(EngineState::Ready);

        loop {
            let request = tokio::select! {
                request = requests.recv() => match request {
                    Some(request) => request,
                    None => return Ok(()),
                },
                stray = self.best_moves.recv() => match stray {
                    Some(line) => {
                        log::debug!("discarding bestmove with no search in flight: {:?}", line);
                        continue;
                    }
                    None => return Err(terminated("engine closed its output")),
                },
            };

            match request {
                Request::Search {
                    moves,
                    nodes,
                    reply,
                } => {
                    if *self.state.borrow() != EngineState::Ready {
                        let _ = reply.send(Err(EngineError::ConcurrentRequest));
                        continue;
                    }
                    match self.search(moves, nodes).await {
                        Ok(best) => {
                            let _ = reply.send(Ok(best));
                        }
                        Err(Failure { error, fatal }) => {
                            let reason = error.to_string();
                            let _ = reply.send(Err(error));
                            if fatal {
                                return Err(terminated(reason));
                            }
                        }
                    }
                }
                Request::NewGame { reply } => match self.send(&UciCommand::UciNewGame).await {
                    Ok(()) => {
                        let _ = reply.send(Ok(()));
                    }
                    Err(e) => {
                        let reason = e.to_string();
                        let _ = reply.send(Err(e));
                        return Err(terminated(reason));
                    }
                },
                Request::Quit => {
                    self.send(&UciCommand::Quit).await?;
                    return Ok(());
                }
            }
        }
    }

    async fn search(&mut self, moves: Vec<String>, nodes: u32) -> Result<BestMove, Failure> {
        self.discard_stale().map_err(Failure::fatal)?;
        self.state.send_replace(EngineState::AwaitingBestMove);
        self.send(&UciCommand::Position { moves })
            .await
            .map_err(Failure::fatal)?;
        self.send(&UciCommand::GoNodes(nodes))
            .await
            .map_err(Failure::fatal)?;

        let answer = match self.search_timeout {
            None => self.best_moves.recv().await,
            Some(limit) => match timeout(limit, self.best_moves.recv()).await {
                Ok(answer) => answer,
                Err(_) => return Err(self.abandon(limit).await),
            },
        };
        match answer {
            Some(Ok(best)) => {
                self.state.send_replace(EngineState::Ready);
                Ok(best)
            }
            Some(Err(e)) => {
                self.state.send_replace(EngineState::Ready);
                Err(Failure::recoverable(e))
            }
            None => Err(Failure::fatal(terminated("engine closed its output"))),
        }
    }

    /// Stop a search that ran past its limit. The session survives if the
    /// engine answers the `stop` within the grace period.
    async fn abandon(&mut self, limit: Duration) -> Failure {
        log::warn!("no bestmove after {:?}, sending stop", limit);
        let timed_out = EngineError::Timeout { after: limit };
        if let Err(e) = self.send(&UciCommand::Stop).await {
            log::warn!("{}", e);
            return Failure::fatal(timed_out);
        }
        match timeout(self.stop_grace, self.best_moves.recv()).await {
            Ok(Some(late)) => {
                log::debug!("discarding bestmove after stop: {:?}", late);
                self.state.send_replace(EngineState::Ready);
                Failure::recoverable(timed_out)
            }
            _ => Failure::fatal(timed_out),
        }
    }

    /// Drop answers that arrived with no search in flight so they cannot
    /// complete the next one.
    fn discard_stale(&mut self) -> Result<(), EngineError> {
        loop {
            match self.best_moves.try_recv() {
                Ok(line) => log::debug!("discarding stale bestmove: {:?}", line),
                Err(TryRecvError::Empty) => return Ok(()),
                Err(TryRecvError::Disconnected) => {
                    return Err(terminated("engine closed its output"))
                }
            }
        }
    }

    async fn send(&mut self, command: &UciCommand) -> Result<(), EngineError> {
        log::trace!("engine < {}", command);
        let line = format!("{}\n", command);
        let write = async {
            self.writer.write_all(line.as_bytes()).await?;
            self.writer.flush().await
        };
        write
            .await
            .map_err(|e| terminated(format!("write to engine failed: {}", e)))
    }
}

/// Single consumer of the engine's output for the whole session.
async fn read_lines<R: AsyncRead + Unpin>(mut reader: R, best_moves: mpsc::UnboundedSender<BestMoveLine>) {
    let mut buffer = LineBuffer::new();
    let mut chunk = vec![0u8; READ_CHUNK];
    loop {
        let n = match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                log::warn!("reading engine output failed: {}", e);
                break;
            }
        };
        for line in buffer.push(&chunk[..n]) {
            if !dispatch_line(&line, &best_moves) {
                return;
            }
        }
    }
    if let Some(line) = buffer.finish() {
        dispatch_line(&line, &best_moves);
    }
    log::debug!("engine output closed");
}

/// Forward a `bestmove` line to the driver. Returns false once the driver
/// is gone.
fn dispatch_line(line: &str, best_moves: &mpsc::UnboundedSender<BestMoveLine>) -> bool {
    log::trace!("engine > {}", line);
    let answer = match EngineLine::parse(line) {
        EngineLine::BestMove(best) => Ok(best),
        EngineLine::MalformedBestMove(line) => Err(EngineError::MalformedResponse { line }),
        EngineLine::Other(_) => return true,
    };
    best_moves.send(answer).is_ok()
}
