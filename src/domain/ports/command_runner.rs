//! CommandRunner port - abstraction over external process execution
//!
//! Every apt, docker and tailscale interaction goes through this trait so the
//! bootstrap pipeline can be driven by a scripted runner in tests.

use std::fmt;
use std::time::Duration;

use crate::error::{IndirectorError, IndirectorResult};

/// Exit code reported for a captured command that hit its timeout.
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// A single external command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Needs root; runners prepend `sudo` when not already root
    pub privileged: bool,
    /// Capture stdout/stderr instead of streaming them to the terminal
    pub capture: bool,
    /// Kill the process after this long (captured commands only)
    pub timeout: Option<Duration>,
    /// Bytes written to the child's stdin
    pub stdin: Option<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            privileged: false,
            capture: false,
            timeout: None,
            stdin: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn privileged(mut self) -> Self {
        self.privileged = true;
        self
    }

    pub fn captured(mut self) -> Self {
        self.capture = true;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// True if this invocation runs `program` with `args` as a prefix.
    pub fn matches(&self, program: &str, args: &[&str]) -> bool {
        self.program == program
            && self.args.len() >= args.len()
            && self.args.iter().zip(args).all(|(a, b)| a == b)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg.replace('\'', "'\\''"))?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Result of a finished (or timed out) command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` only when the process was killed on timeout
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl CommandOutput {
    pub fn success() -> Self {
        Self {
            code: Some(0),
            ..Self::default()
        }
    }

    pub fn failure(code: i32) -> Self {
        Self {
            code: Some(code),
            ..Self::default()
        }
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0) && !self.timed_out
    }

    /// stdout followed by stderr, the way `2>&1` capture reads in practice.
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => {
                let mut out = self.stdout.clone();
                if !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(&self.stderr);
                out
            }
        }
    }

    fn exit_code(&self) -> i32 {
        if self.timed_out {
            TIMEOUT_EXIT_CODE
        } else {
            self.code.unwrap_or(1)
        }
    }
}

/// Abstract process execution interface
///
/// Implementations:
/// - `SystemRunner` - spawns real processes (with `sudo` when needed)
/// - `ScriptedRunner` (tests) - replays canned outputs and records calls
pub trait CommandRunner {
    /// Run a command to completion. Only spawn failures are errors; a
    /// non-zero exit is reported through `CommandOutput`.
    fn run(&self, invocation: &Invocation) -> IndirectorResult<CommandOutput>;

    /// Block for `duration`. Scripted runners return immediately.
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }

    /// Run a command that must succeed; a failure aborts the current step.
    fn run_checked(&self, step: &str, invocation: &Invocation) -> IndirectorResult<CommandOutput> {
        let output = self.run(invocation)?;
        if output.is_success() {
            return Ok(output);
        }
        Err(IndirectorError::CommandFailed {
            step: step.to_string(),
            command: invocation.to_string(),
            code: output.exit_code(),
            stderr: output.stderr.trim().to_string(),
        })
    }
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, invocation: &Invocation) -> IndirectorResult<CommandOutput> {
        (**self).run(invocation)
    }

    fn pause(&self, duration: Duration) {
        (**self).pause(duration)
    }
}
