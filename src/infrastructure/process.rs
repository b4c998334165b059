//! Local process execution
//!
//! Implements the CommandRunner port with `std::process`, prefixing
//! privileged commands with `sudo` when the tool is not already root.

use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::domain::ports::command_runner::{CommandOutput, CommandRunner, Invocation};
use crate::error::{IndirectorError, IndirectorResult};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long to keep reading pipes after killing a timed-out child. `sudo`
/// cannot forward SIGKILL, so a grandchild may hold the pipes open.
const KILL_GRACE: Duration = Duration::from_millis(250);

/// Runs commands on the local machine
pub struct SystemRunner {
    use_sudo: bool,
    stdout_to_stderr: bool,
}

impl SystemRunner {
    pub fn new(use_sudo: bool) -> Self {
        Self {
            use_sudo,
            stdout_to_stderr: false,
        }
    }

    /// Send streamed command output to stderr, keeping stdout for NDJSON.
    pub fn stdout_to_stderr(mut self) -> Self {
        self.stdout_to_stderr = true;
        self
    }

    fn command(&self, invocation: &Invocation) -> Command {
        if invocation.privileged && self.use_sudo {
            let mut cmd = Command::new("sudo");
            cmd.arg(&invocation.program).args(&invocation.args);
            cmd
        } else {
            let mut cmd = Command::new(&invocation.program);
            cmd.args(&invocation.args);
            cmd
        }
    }

    fn spawn_error(invocation: &Invocation, source: std::io::Error) -> IndirectorError {
        IndirectorError::Spawn {
            command: invocation.to_string(),
            source,
        }
    }

    fn run_streaming(&self, invocation: &Invocation) -> IndirectorResult<CommandOutput> {
        let mut cmd = self.command(invocation);
        if self.stdout_to_stderr {
            cmd.stdout(Stdio::from(std::io::stderr()));
        } else {
            cmd.stdout(Stdio::inherit());
        }
        cmd.stderr(Stdio::inherit());
        cmd.stdin(if invocation.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::inherit()
        });

        let mut child = cmd
            .spawn()
            .map_err(|e| Self::spawn_error(invocation, e))?;
        feed_stdin(&mut child, invocation.stdin.as_deref())?;
        let status = child.wait()?;

        Ok(CommandOutput {
            code: Some(exit_code(status)),
            ..CommandOutput::default()
        })
    }

    fn run_captured(&self, invocation: &Invocation) -> IndirectorResult<CommandOutput> {
        let mut cmd = self.command(invocation);
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        cmd.stdin(if invocation.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });

        let mut child = cmd
            .spawn()
            .map_err(|e| Self::spawn_error(invocation, e))?;
        let stdout = PipeReader::start(child.stdout.take());
        let stderr = PipeReader::start(child.stderr.take());
        feed_stdin(&mut child, invocation.stdin.as_deref())?;

        let status = match invocation.timeout {
            None => Some(child.wait()?),
            Some(timeout) => wait_with_deadline(&mut child, Instant::now() + timeout)?,
        };

        let output = match status {
            Some(status) => CommandOutput {
                code: Some(exit_code(status)),
                stdout: stdout.finish(),
                stderr: stderr.finish(),
                timed_out: false,
            },
            None => {
                thread::sleep(KILL_GRACE);
                CommandOutput {
                    code: None,
                    stdout: stdout.snapshot(),
                    stderr: stderr.snapshot(),
                    timed_out: true,
                }
            }
        };
        Ok(output)
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> IndirectorResult<CommandOutput> {
        if invocation.capture {
            self.run_captured(invocation)
        } else {
            self.run_streaming(invocation)
        }
    }
}

fn feed_stdin(child: &mut Child, input: Option<&str>) -> IndirectorResult<()> {
    if let (Some(input), Some(mut stdin)) = (input, child.stdin.take()) {
        stdin.write_all(input.as_bytes())?;
    }
    Ok(())
}

/// Waits until `deadline`; kills the child and returns `None` if it is
/// still running by then.
fn wait_with_deadline(child: &mut Child, deadline: Instant) -> IndirectorResult<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Drains a child pipe on a background thread into a shared buffer.
struct PipeReader {
    buffer: Arc<Mutex<Vec<u8>>>,
    handle: Option<JoinHandle<()>>,
}

impl PipeReader {
    fn start<R: Read + Send + 'static>(pipe: Option<R>) -> Self {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let handle = pipe.map(|mut pipe| {
            let sink = Arc::clone(&buffer);
            thread::spawn(move || {
                let mut chunk = [0u8; 4096];
                loop {
                    match pipe.read(&mut chunk) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => sink
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .extend_from_slice(&chunk[..n]),
                    }
                }
            })
        });
        Self { buffer, handle }
    }

    /// Wait for EOF, then return everything read.
    fn finish(mut self) -> String {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        self.snapshot()
    }

    /// Whatever has been read so far, without waiting for EOF.
    fn snapshot(&self) -> String {
        let bytes = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}
