//! External toolchain process execution.
//!
//! The orchestrator talks to the toolchain only through [`ProcessRunner`],
//! which hands back a structured [`InvocationOutput`] instead of failing on a
//! non-zero exit. [`SystemRunner`] is the real implementation: it inherits
//! the caller's environment, streams the child's output through to the
//! operator while keeping a tail of it for diagnostics, and enforces an
//! optional timeout.

mod types;

use std::future::Future;
use std::io;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub use types::{InvocationOutput, ToolchainInvocation};

/// Bytes of each output stream kept for error reports.
const CAPTURE_LIMIT: usize = 64 * 1024;

/// How long to wait for output pipes to drain once the child has been reaped.
/// Grandchildren may still hold the pipes open.
const DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Runs a toolchain invocation to completion.
pub trait ProcessRunner {
  /// Run `invocation`, waiting at most `timeout` when given.
  ///
  /// A non-zero exit is not an error here; `Err` means the process could not
  /// be started or waited on.
  fn run(
    &self,
    invocation: &ToolchainInvocation,
    timeout: Option<Duration>,
  ) -> impl Future<Output = io::Result<InvocationOutput>>;
}

/// Spawns real processes with `tokio::process`.
#[derive(Debug, Clone)]
pub struct SystemRunner {
  passthrough: bool,
}

impl Default for SystemRunner {
  fn default() -> Self {
    Self { passthrough: true }
  }
}

impl SystemRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Capture output without echoing it to the terminal.
  pub fn quiet() -> Self {
    Self { passthrough: false }
  }
}

impl ProcessRunner for SystemRunner {
  async fn run(&self, invocation: &ToolchainInvocation, timeout: Option<Duration>) -> io::Result<InvocationOutput> {
    info!(command = %invocation, "running toolchain");

    let mut child = Command::new(&invocation.program)
      .args(&invocation.args)
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .kill_on_drop(true)
      .spawn()?;

    let stdout_task = spawn_pump(child.stdout.take(), self.passthrough.then(tokio::io::stdout));
    let stderr_task = spawn_pump(child.stderr.take(), self.passthrough.then(tokio::io::stderr));

    let (code, timed_out) = match timeout {
      Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
        Ok(status) => (status?.code(), false),
        Err(_) => {
          warn!(command = %invocation, timeout = ?limit, "toolchain timed out, killing");
          child.kill().await?;
          (None, true)
        }
      },
      None => (child.wait().await?.code(), false),
    };

    let stdout = drain(stdout_task).await?;
    let stderr = drain(stderr_task).await?;

    debug!(code = ?code, timed_out, "toolchain exited");

    Ok(InvocationOutput {
      code,
      stdout: String::from_utf8_lossy(&stdout).into_owned(),
      stderr: String::from_utf8_lossy(&stderr).into_owned(),
      timed_out,
    })
  }
}

fn spawn_pump<R, W>(reader: Option<R>, sink: Option<W>) -> JoinHandle<io::Result<Vec<u8>>>
where
  R: AsyncRead + Unpin + Send + 'static,
  W: AsyncWrite + Unpin + Send + 'static,
{
  tokio::spawn(async move {
    let Some(reader) = reader else {
      return Ok(Vec::new());
    };
    pump(reader, sink).await
  })
}

/// Copy `reader` into `sink` (when present), keeping the last
/// [`CAPTURE_LIMIT`] bytes. A failing sink is dropped; capture continues.
async fn pump<R, W>(mut reader: R, mut sink: Option<W>) -> io::Result<Vec<u8>>
where
  R: AsyncRead + Unpin,
  W: AsyncWrite + Unpin,
{
  let mut captured = Vec::new();
  let mut buf = [0u8; 8192];

  loop {
    let n = reader.read(&mut buf).await?;
    if n == 0 {
      break;
    }
    if let Some(writer) = sink.as_mut() {
      let written = match writer.write_all(&buf[..n]).await {
        Ok(()) => writer.flush().await,
        Err(e) => Err(e),
      };
      if let Err(e) = written {
        debug!(error = %e, "output passthrough failed, capturing only");
        sink = None;
      }
    }
    captured.extend_from_slice(&buf[..n]);
    if captured.len() > CAPTURE_LIMIT {
      let excess = captured.len() - CAPTURE_LIMIT;
      captured.drain(..excess);
    }
  }

  Ok(captured)
}

async fn drain(task: JoinHandle<io::Result<Vec<u8>>>) -> io::Result<Vec<u8>> {
  let abort = task.abort_handle();
  match tokio::time::timeout(DRAIN_GRACE, task).await {
    Ok(joined) => joined.map_err(io::Error::other)?,
    Err(_) => {
      debug!("output pipe still held open after exit, dropping remainder");
      abort.abort();
      Ok(Vec::new())
    }
  }
}
