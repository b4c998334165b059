//! Scripted command runner and recording event sink.

use std::cell::RefCell;
use std::time::Duration;

use indirector::domain::ports::{
    BootstrapEvent, BootstrapEventSink, CommandOutput, CommandRunner, Invocation,
};
use indirector::IndirectorResult;

struct Rule {
    program: String,
    words: Vec<String>,
    output: CommandOutput,
}

impl Rule {
    fn matches(&self, invocation: &Invocation) -> bool {
        invocation.program == self.program && contains_in_order(&invocation.args, &self.words)
    }
}

/// True if every word appears in `args`, in order, not necessarily adjacent.
fn contains_in_order(args: &[String], words: &[String]) -> bool {
    let mut rest = args.iter();
    words.iter().all(|word| rest.any(|arg| arg == word))
}

/// Replays canned output; anything without a rule succeeds silently.
///
/// Later rules win over earlier ones, so tests override the healthy defaults.
pub struct ScriptedRunner {
    rules: Vec<Rule>,
    calls: RefCell<Vec<Invocation>>,
    pauses: RefCell<Vec<Duration>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            calls: RefCell::new(Vec::new()),
            pauses: RefCell::new(Vec::new()),
        }
    }

    /// Docker installed, `vpn` running, Tailscale logged in.
    pub fn healthy() -> Self {
        Self::new()
            .on("docker", &["ps"], CommandOutput::success().with_stdout("vpn\n"))
            .on(
                "docker",
                &["exec", "vpn", "tailscale", "status"],
                CommandOutput::success().with_stdout("100.64.0.1 stage ops@ linux -\n# Logged in as ops@example.com\n"),
            )
            .on("dpkg", &["--print-architecture"], CommandOutput::success().with_stdout("amd64\n"))
    }

    /// Same as `healthy`, but Docker is missing.
    pub fn without_docker() -> Self {
        Self::healthy().on("docker", &["--version"], CommandOutput::failure(127))
    }

    pub fn on(mut self, program: &str, words: &[&str], output: CommandOutput) -> Self {
        self.rules.push(Rule {
            program: program.to_string(),
            words: words.iter().map(|w| w.to_string()).collect(),
            output,
        });
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Rendered command lines, in call order.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.to_string()).collect()
    }

    pub fn position(&self, program: &str, words: &[&str]) -> Option<usize> {
        let words: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        self.calls
            .borrow()
            .iter()
            .position(|c| c.program == program && contains_in_order(&c.args, &words))
    }

    pub fn ran(&self, program: &str, words: &[&str]) -> bool {
        self.position(program, words).is_some()
    }

    pub fn find(&self, program: &str, words: &[&str]) -> Option<Invocation> {
        self.position(program, words)
            .map(|index| self.calls.borrow()[index].clone())
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.borrow().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> IndirectorResult<CommandOutput> {
        self.calls.borrow_mut().push(invocation.clone());
        let output = self
            .rules
            .iter()
            .rev()
            .find(|rule| rule.matches(invocation))
            .map(|rule| rule.output.clone())
            .unwrap_or_else(CommandOutput::success);
        Ok(output)
    }

    fn pause(&self, duration: Duration) {
        self.pauses.borrow_mut().push(duration);
    }
}

/// Keeps every event for later assertions
#[derive(Default)]
pub struct RecordingSink {
    events: RefCell<Vec<BootstrapEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<BootstrapEvent> {
        self.events.borrow().clone()
    }

    pub fn skipped_steps(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                BootstrapEvent::StepSkipped { step, .. } => Some(step.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                BootstrapEvent::Warning { message } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }
}

impl BootstrapEventSink for RecordingSink {
    fn on_event(&self, event: BootstrapEvent) {
        self.events.borrow_mut().push(event);
    }
}
