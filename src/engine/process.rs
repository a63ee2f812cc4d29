//! Launching the engine program as a child process.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};

use crate::config::EngineConfig;
use crate::engine::EngineError;

/// A running engine with its pipes taken out of the child handle.
pub struct EngineProcess {
    pub child: Child,
    pub stdin: ChildStdin,
    pub stdout: ChildStdout,
    pub stderr: Option<ChildStderr>,
}

/// Spawn the configured engine with piped stdio. The child is killed when
/// its handle is dropped. Must be called inside a tokio runtime.
pub fn spawn_engine(config: &EngineConfig) -> Result<EngineProcess, EngineError> {
    let mut child = Command::new(&config.program)
        .args(&config.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| EngineError::Spawn {
            program: config.program.clone(),
            source,
        })?;

    let missing = |pipe: &str| EngineError::Terminated {
        reason: format!("engine {} has no {}", config.program, pipe),
    };
    let stdin = child.stdin.take().ok_or_else(|| missing("stdin"))?;
    let stdout = child.stdout.take().ok_or_else(|| missing("stdout"))?;
    let stderr = child.stderr.take();

    log::info!(
        "spawned engine {} (pid {})",
        config.program,
        child.id().map(|id| id.to_string()).unwrap_or_else(|| "?".into())
    );
    Ok(EngineProcess {
        child,
        stdin,
        stdout,
        stderr,
    })
}

/// Forward the engine's stderr to the log until it closes.
pub async fn forward_stderr(stderr: ChildStderr) {
    let mut lines = BufReader::new(stderr).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => log::debug!("engine stderr: {}", line),
            Ok(None) => break,
            Err(e) => {
                log::debug!("engine stderr closed: {}", e);
                break;
            }
        }
    }
}
