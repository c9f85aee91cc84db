//! Subprocess runner backed by `tokio::process`.

use std::io;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::ExitReport;
use crate::error::RunnerError;
use crate::ports::{ProcessRunner, RunningProcess};

/// Launches the target as a real child process with stdout/stderr piped.
///
/// Both streams are drained on their own tasks while the process runs, so a
/// chatty child never blocks on a full pipe.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for TokioProcessRunner {
    fn spawn(
        &self,
        program: &Path,
        args: &[String],
    ) -> Result<Box<dyn RunningProcess>, RunnerError> {
        let mut cmd = build_command(program, args);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| RunnerError::Spawn {
            program: program.to_path_buf(),
            source,
        })?;

        debug!(program = %program.display(), pid = ?child.id(), "spawned process");

        let stdout = child.stdout.take().map(|s| tokio::spawn(capture(s)));
        let stderr = child.stderr.take().map(|s| tokio::spawn(capture(s)));

        Ok(Box::new(TokioProcess {
            child,
            stdout,
            stderr,
        }))
    }
}

/// Batch files need the command interpreter on Windows.
#[cfg(windows)]
fn build_command(program: &Path, args: &[String]) -> Command {
    let is_batch = program
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bat") || ext.eq_ignore_ascii_case("cmd"));

    if is_batch {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(program).args(args);
        cmd
    } else {
        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd
    }
}

#[cfg(not(windows))]
fn build_command(program: &Path, args: &[String]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd
}

async fn capture<R>(mut reader: R) -> io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer).await?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Output of a capture task. A failed read or a task that never finished
/// is an OS-level failure of the attempt.
async fn collect(handle: Option<JoinHandle<io::Result<String>>>) -> Result<String, RunnerError> {
    match handle {
        Some(handle) => handle
            .await
            .map_err(|join| RunnerError::Wait(io::Error::other(join)))?
            .map_err(RunnerError::Wait),
        None => Ok(String::new()),
    }
}

struct TokioProcess {
    child: Child,
    stdout: Option<JoinHandle<io::Result<String>>>,
    stderr: Option<JoinHandle<io::Result<String>>>,
}

#[async_trait]
impl RunningProcess for TokioProcess {
    fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    async fn wait(mut self: Box<Self>) -> Result<ExitReport, RunnerError> {
        let status = self.child.wait().await.map_err(RunnerError::Wait)?;

        let stdout = collect(self.stdout.take()).await?;
        let stderr = collect(self.stderr.take()).await?;

        Ok(ExitReport {
            exit_code: status.code(),
            stdout,
            stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    /// Yields `prefix`, then fails like a broken pipe.
    struct BrokenPipe {
        prefix: &'static [u8],
    }

    impl AsyncRead for BrokenPipe {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            if self.prefix.is_empty() {
                return Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe broke")));
            }
            let n = self.prefix.len().min(buf.remaining());
            buf.put_slice(&self.prefix[..n]);
            self.prefix = &self.prefix[n..];
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn read_error_is_not_a_truncated_success() {
        let handle = tokio::spawn(capture(BrokenPipe { prefix: b"partial" }));

        let err = collect(Some(handle)).await.unwrap_err();

        assert!(matches!(err, RunnerError::Wait(_)));
        assert!(err.to_string().contains("pipe broke"));
    }

    #[tokio::test]
    async fn panicked_capture_task_is_a_wait_error() {
        let handle: JoinHandle<io::Result<String>> =
            tokio::spawn(async { panic!("capture task died") });

        let err = collect(Some(handle)).await.unwrap_err();

        assert!(matches!(err, RunnerError::Wait(_)));
    }

    #[tokio::test]
    async fn missing_stream_collects_empty() {
        assert_eq!(collect(None).await.unwrap(), "");
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let runner = TokioProcessRunner::new();
        let result = runner.spawn(Path::new("./definitely/not/here"), &[]);

        match result {
            Err(RunnerError::Spawn { program, .. }) => {
                assert_eq!(program, Path::new("./definitely/not/here"));
            }
            Err(other) => panic!("expected spawn error, got {other}"),
            Ok(_) => panic!("expected spawn error"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_streams_and_exit_code() {
        let runner = TokioProcessRunner::new();
        let args = vec![
            "-c".to_string(),
            "echo out; echo err 1>&2; exit 3".to_string(),
        ];

        let process = runner.spawn(Path::new("sh"), &args).unwrap();
        assert!(process.pid().is_some());

        let report = process.wait().await.unwrap();
        assert_eq!(report.exit_code, Some(3));
        assert_eq!(report.stdout, "out\n");
        assert_eq!(report.stderr, "err\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn passes_arguments_verbatim() {
        let runner = TokioProcessRunner::new();
        let args = vec![
            "-c".to_string(),
            "printf '%s|' \"$@\"".to_string(),
            "sh".to_string(),
            "a b".to_string(),
            "$HOME".to_string(),
        ];

        let report = runner
            .spawn(Path::new("sh"), &args)
            .unwrap()
            .wait()
            .await
            .unwrap();

        assert!(report.success());
        assert_eq!(report.stdout, "a b|$HOME|");
    }
}
