#![cfg(feature = "std")]

use std::time::Duration;

/// Engine program launched when none is configured.
pub const DEFAULT_ENGINE: &str = "lc0";

/// Node budget sent with every `go nodes` search.
pub const DEFAULT_NODES: u32 = 1000;

/// Default limit on a single search before `stop` is sent (60 seconds).
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(60);

/// How long to wait for the discarded `bestmove` after a `stop` (5 seconds).
pub const DEFAULT_STOP_GRACE: Duration = Duration::from_secs(5);

/// Options sent once after spawning: single-threaded search, no pondering,
/// no verbose stats, no win/draw/loss display.
pub const HANDSHAKE_OPTIONS: [(&str, &str); 4] = [
    ("Threads", "1"),
    ("VerboseMoveStats", "false"),
    ("Ponder", "false"),
    ("UCI_ShowWDL", "false"),
];

/// How to launch and drive the external engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub program: String,
    pub args: Vec<String>,
    pub nodes: u32,
    /// `None` waits for `bestmove` indefinitely.
    pub search_timeout: Option<Duration>,
    pub stop_grace: Duration,
    pub options: Vec<(String, String)>,
}

impl EngineConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_nodes(mut self, nodes: u32) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_search_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.search_timeout = timeout;
        self
    }

    pub fn with_stop_grace(mut self, grace: Duration) -> Self {
        self.stop_grace = grace;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_ENGINE.to_string(),
            args: Vec::new(),
            nodes: DEFAULT_NODES,
            search_timeout: Some(DEFAULT_SEARCH_TIMEOUT),
            stop_grace: DEFAULT_STOP_GRACE,
            options: HANDSHAKE_OPTIONS
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
        }
    }
}
