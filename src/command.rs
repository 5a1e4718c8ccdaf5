//! Abstraction over subprocess invocation.
//!
//! Both the version probe and the script runner go through [`CommandRunner`], so
//! tests can answer with canned output and callers can bound a run with a timeout
//! without touching the resolution pipeline.

use crate::error::EmbedError;
use std::ffi::OsStr;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, Output, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

pub trait CommandRunner: Send + Sync {
    /// Spawn `program` with `args` (no shell), wait for it to exit and capture its output.
    ///
    /// Spawn failures, I/O failures and timeouts surface as [`EmbedError::ExecutionFailure`].
    /// A non-zero exit status is not an error here.
    fn run(&self, program: &Path, args: &[&OsStr], options: &RunOptions)
        -> Result<Output, EmbedError>;
}

/// Per-invocation options. The default waits indefinitely.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub timeout: Option<Duration>,
}

impl RunOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

/// Production implementation backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(
        &self,
        program: &Path,
        args: &[&OsStr],
        options: &RunOptions,
    ) -> Result<Output, EmbedError> {
        let failure = |source: io::Error| EmbedError::ExecutionFailure {
            program: program.display().to_string(),
            source,
        };

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(failure)?;

        match options.timeout {
            None => child.wait_with_output().map_err(failure),
            Some(timeout) => wait_with_timeout(child, timeout).map_err(failure),
        }
    }
}

fn wait_with_timeout(mut child: Child, timeout: Duration) -> io::Result<Output> {
    // Pipes are drained on their own threads so a chatty child cannot block on a full pipe.
    // A grandchild may inherit them and keep them open after the child exits, so collecting
    // the output is bounded by the same deadline as the wait.
    let deadline = Instant::now() + timeout;
    let stdout = drain_in_background(child.stdout.take());
    let stderr = drain_in_background(child.stderr.take());

    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(timed_out(timeout));
        }
        thread::sleep(POLL_INTERVAL);
    };

    let stdout = collect(&stdout, deadline, timeout)?;
    let stderr = collect(&stderr, deadline, timeout)?;
    Ok(Output {
        status,
        stdout,
        stderr,
    })
}

fn drain_in_background<R>(pipe: Option<R>) -> Receiver<io::Result<Vec<u8>>>
where
    R: Read + Send + 'static,
{
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let _ = sender.send(drain(pipe));
    });
    receiver
}

fn drain<R: Read>(pipe: Option<R>) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buffer)?;
    }
    Ok(buffer)
}

fn collect(
    receiver: &Receiver<io::Result<Vec<u8>>>,
    deadline: Instant,
    timeout: Duration,
) -> io::Result<Vec<u8>> {
    match receiver.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(output) => output,
        Err(RecvTimeoutError::Timeout) => Err(timed_out(timeout)),
        Err(RecvTimeoutError::Disconnected) => {
            Err(io::Error::other("output reader thread panicked"))
        }
    }
}

fn timed_out(timeout: Duration) -> io::Error {
    io::Error::new(
        io::ErrorKind::TimedOut,
        format!("process did not finish within {timeout:?}"),
    )
}
