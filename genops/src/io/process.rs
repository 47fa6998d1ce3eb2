//! Child process execution with a wall-clock limit and bounded capture.
//!
//! On unix the child leads its own process group, so a timeout kills every
//! process it forked, not just the direct child. Pipes are read on detached
//! threads; once the child is reaped they get a short grace period to hit EOF
//! and are abandoned after that, so a straggler holding a pipe open cannot
//! stall the caller.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, instrument, warn};
use wait_timeout::ChildExt;

const READ_CHUNK: usize = 8192;

/// How long pipes may stay open after the child has been reaped.
const PIPE_GRACE: Duration = Duration::from_secs(2);

/// Bytes kept from one stream, plus how many were drained and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    pub bytes: Vec<u8>,
    pub dropped: usize,
    /// The stream never reached EOF: something outside the child still held
    /// it when reading was abandoned.
    pub left_open: bool,
}

impl Captured {
    fn render(&self, label: &str, buf: &mut String) {
        buf.push_str(&format!("=== {label} ===\n"));
        buf.push_str(&String::from_utf8_lossy(&self.bytes));
        if self.dropped > 0 {
            buf.push_str(&format!("\n[{label} truncated {} bytes]", self.dropped));
        }
        if self.left_open {
            buf.push_str(&format!(
                "\n[{label} still open after the process exited; stopped reading]"
            ));
        }
    }
}

/// Exit status and captured streams of a finished (or killed) child.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Captured,
    pub stderr: Captured,
    /// The child was killed because it outlived its time limit.
    pub timed_out: bool,
}

impl CommandOutput {
    /// Stdout then stderr, each under a header, with truncation notes.
    pub fn combined(&self) -> String {
        let mut buf = String::new();
        self.stdout.render("stdout", &mut buf);
        buf.push('\n');
        self.stderr.render("stderr", &mut buf);
        buf
    }
}

/// Spawn `cmd`, wait at most `timeout`, and capture both streams.
///
/// Stdin is null. Each stream is drained on its own thread so the child never
/// blocks on a full pipe; only the first `limit` bytes per stream are kept.
/// An expired timeout kills the child's whole process group and sets
/// `timed_out`. The call returns at most [`PIPE_GRACE`] after the child is
/// reaped. Only a failure to spawn or to reap the child is an error.
#[instrument(skip_all, fields(timeout_ms = timeout.as_millis() as u64, limit))]
pub fn run_command_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    limit: usize,
) -> Result<CommandOutput> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    #[cfg(unix)]
    std::os::unix::process::CommandExt::process_group(&mut cmd, 0);

    let program = cmd.get_program().to_string_lossy().into_owned();
    debug!(%program, "spawning child process");
    let mut child = cmd.spawn().map_err(|err| {
        error!(%err, %program, "failed to spawn child process");
        anyhow!(err).context(format!("spawn {program}"))
    })?;

    let stdout = StreamCapture::spawn(child.stdout.take(), limit);
    let stderr = StreamCapture::spawn(child.stderr.take(), limit);

    let (status, timed_out) = match child.wait_timeout(timeout).context("wait for child")? {
        Some(status) => (status, false),
        None => {
            warn!(timeout_ms = timeout.as_millis() as u64, %program, "child timed out, killing");
            kill_tree(&mut child).context("kill child")?;
            (child.wait().context("reap killed child")?, true)
        }
    };

    let deadline = Instant::now() + PIPE_GRACE;
    let stdout = stdout.finish(deadline).context("collect stdout")?;
    let stderr = stderr.finish(deadline).context("collect stderr")?;
    if stdout.left_open || stderr.left_open {
        warn!(%program, "output pipes still held by leftover processes, killing them");
        kill_group(child.id());
    }
    if stdout.dropped > 0 || stderr.dropped > 0 {
        warn!(
            stdout_dropped = stdout.dropped,
            stderr_dropped = stderr.dropped,
            "child output truncated"
        );
    }

    debug!(exit_code = ?status.code(), timed_out, "child finished");
    Ok(CommandOutput {
        status,
        stdout,
        stderr,
        timed_out,
    })
}

/// Kill the child and, on unix, every process left in its group.
fn kill_tree(child: &mut Child) -> std::io::Result<()> {
    kill_group(child.id());
    child.kill()
}

/// Best-effort `SIGKILL` to the process group led by `pid`.
#[cfg(unix)]
fn kill_group(pid: u32) {
    let group = format!("-{pid}");
    let result = Command::new("kill")
        .args(["-KILL", "--", group.as_str()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match result {
        Ok(status) if status.success() => debug!(pgid = pid, "process group killed"),
        Ok(status) => debug!(pgid = pid, ?status, "process group already gone"),
        Err(err) => warn!(pgid = pid, %err, "could not signal process group"),
    }
}

#[cfg(not(unix))]
fn kill_group(_pid: u32) {}

/// A stream being drained on a detached thread.
struct StreamCapture {
    captured: Arc<Mutex<Captured>>,
    done: Option<Receiver<Result<()>>>,
}

impl StreamCapture {
    fn spawn<R>(stream: Option<R>, limit: usize) -> Self
    where
        R: Read + Send + 'static,
    {
        let captured = Arc::new(Mutex::new(Captured::default()));
        let done = stream.map(|reader| {
            let (tx, rx) = mpsc::channel();
            let sink = Arc::clone(&captured);
            thread::spawn(move || {
                let _ = tx.send(read_capped(reader, limit, &sink));
            });
            rx
        });
        Self { captured, done }
    }

    /// Wait for EOF until `deadline`, then return whatever was read.
    fn finish(self, deadline: Instant) -> Result<Captured> {
        let left_open = match &self.done {
            None => false,
            Some(done) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match done.recv_timeout(wait) {
                    Ok(result) => {
                        result?;
                        false
                    }
                    Err(RecvTimeoutError::Timeout) => true,
                    Err(RecvTimeoutError::Disconnected) => {
                        return Err(anyhow!("output reader thread panicked"));
                    }
                }
            }
        };
        let mut captured = self
            .captured
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        captured.left_open = left_open;
        Ok(captured)
    }
}

/// Read `reader` to the end into `sink`, keeping at most `limit` bytes.
fn read_capped<R: Read>(mut reader: R, limit: usize, sink: &Mutex<Captured>) -> Result<()> {
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        let n = reader.read(&mut chunk).context("read child output")?;
        if n == 0 {
            return Ok(());
        }
        let mut captured = sink.lock().unwrap_or_else(PoisonError::into_inner);
        let keep = n.min(limit.saturating_sub(captured.bytes.len()));
        captured.bytes.extend_from_slice(&chunk[..keep]);
        captured.dropped += n - keep;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_capped_counts_dropped_bytes() {
        let data = vec![b'x'; 20_000];
        let sink = Mutex::new(Captured::default());
        read_capped(data.as_slice(), 100, &sink).expect("read");
        let captured = sink.into_inner().expect("lock");
        assert_eq!(captured.bytes.len(), 100);
        assert_eq!(captured.dropped, 19_900);
        assert!(!captured.left_open);
    }

    #[test]
    fn spawn_failure_is_an_error() {
        let cmd = Command::new("genops-test-no-such-program");
        let err = run_command_with_timeout(cmd, Duration::from_secs(1), 100)
            .expect_err("spawn should fail");
        assert!(err.to_string().contains("spawn genops-test-no-such-program"));
    }

    #[cfg(unix)]
    #[test]
    fn captures_both_streams() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("echo out; echo err >&2; exit 3");
        let output = run_command_with_timeout(cmd, Duration::from_secs(10), 1_000).expect("run");
        assert_eq!(output.status.code(), Some(3));
        assert!(!output.timed_out);
        assert_eq!(output.combined(), "=== stdout ===\nout\n\n=== stderr ===\nerr\n");
    }

    #[cfg(unix)]
    #[test]
    fn kills_on_timeout() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("exec sleep 30");
        let output =
            run_command_with_timeout(cmd, Duration::from_millis(200), 1_000).expect("run");
        assert!(output.timed_out);
        assert!(!output.status.success());
    }

    #[cfg(unix)]
    #[test]
    fn combined_notes_truncation() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("printf 'abcdefghij'");
        let output = run_command_with_timeout(cmd, Duration::from_secs(10), 4).expect("run");
        assert_eq!(output.stdout.bytes, b"abcd");
        assert_eq!(output.stdout.dropped, 6);
        assert!(output.combined().contains("[stdout truncated 6 bytes]"));
    }

    #[cfg(unix)]
    #[test]
    fn timeout_kills_forked_grandchildren() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("sleep 30; echo done");
        let started = Instant::now();
        let output =
            run_command_with_timeout(cmd, Duration::from_millis(300), 1_000).expect("run");
        assert!(output.timed_out);
        assert!(
            started.elapsed() < Duration::from_secs(5),
            "returned after {:?}",
            started.elapsed()
        );
        assert!(!output.combined().contains("done"));
    }

    #[cfg(unix)]
    #[test]
    fn background_process_holding_pipes_does_not_block() {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg("sleep 30 & echo started");
        let started = Instant::now();
        let output = run_command_with_timeout(cmd, Duration::from_secs(10), 1_000).expect("run");
        assert!(
            started.elapsed() < Duration::from_secs(8),
            "returned after {:?}",
            started.elapsed()
        );
        assert!(!output.timed_out);
        assert_eq!(output.status.code(), Some(0));
        assert_eq!(output.stdout.bytes, b"started\n");
        assert!(output.stdout.left_open);
        assert!(output.combined().contains("[stdout still open after the process exited"));
    }
}
