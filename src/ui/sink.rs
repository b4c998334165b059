//! Bootstrap event sinks: colored console lines or NDJSON

use serde_json::{json, Value};

use indirector::domain::ports::{BootstrapEvent, BootstrapEventSink};

use crate::ui::context::UiContext;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// Renders bootstrap progress as colored log lines on stdout
pub struct ConsoleEventSink {
    ui: UiContext,
}

impl ConsoleEventSink {
    pub fn new(ui: UiContext) -> Self {
        Self { ui }
    }
}

impl BootstrapEventSink for ConsoleEventSink {
    fn on_event(&self, event: BootstrapEvent) {
        if matches!(event, BootstrapEvent::CommandStarted { .. }) && self.ui.verbose == 0 {
            return;
        }
        let line = render_event(&event, self.ui.color, self.ui.unicode);
        match event {
            BootstrapEvent::Warning { .. }
            | BootstrapEvent::CommandTolerated { .. }
            | BootstrapEvent::UnexpectedOutput { .. } => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }
}

/// Writes each bootstrap event as an NDJSON line on stdout
pub struct JsonEventSink;

impl BootstrapEventSink for JsonEventSink {
    fn on_event(&self, event: BootstrapEvent) {
        let _ = crate::ui::json::emit(&event_json(&event));
    }
}

pub fn render_event(event: &BootstrapEvent, color: bool, unicode: bool) -> String {
    let icon = |icon: Icon| icon.colored(color, unicode);
    match event {
        BootstrapEvent::StepStarted { step } => format!(
            "\n{} {}",
            icon(Icon::Step),
            ColoredText::info(step.as_str()).bold().render(color)
        ),
        BootstrapEvent::StepSkipped { step, reason } => format!(
            "{} {}",
            icon(Icon::Skipped),
            ColoredText::dim(format!("{} skipped: {}", step, reason)).render(color)
        ),
        BootstrapEvent::CommandStarted { command } => format!(
            "  {} {}",
            icon(Icon::Command),
            ColoredText::dim(command.as_str()).render(color)
        ),
        BootstrapEvent::CommandTolerated { command, code, note } => {
            let status = match code {
                Some(code) => format!("exit {}", code),
                None => "timed out".to_string(),
            };
            format!(
                "{} {}",
                icon(Icon::Warning),
                ColoredText::warning(format!("{} ({}): {}", command, status, note)).render(color)
            )
        }
        BootstrapEvent::Info { message } => format!("{} {}", icon(Icon::Arrow), message),
        BootstrapEvent::Warning { message } => format!(
            "{} {}",
            icon(Icon::Warning),
            ColoredText::warning(message.as_str()).render(color)
        ),
        BootstrapEvent::DirectoryReady { path, owner, mode } => format!(
            "{} {} {}",
            icon(Icon::Success),
            path.display(),
            ColoredText::dim(format!("(owner {}, mode {})", owner, mode)).render(color)
        ),
        BootstrapEvent::LoginUrl { url } => format!(
            "{} Open this URL to log the VPN in:\n    {}",
            icon(Icon::Link),
            ColoredText::info(url.as_str()).bold().render(color)
        ),
        BootstrapEvent::UnexpectedOutput { output } => format!(
            "{} {}\n{}",
            icon(Icon::Warning),
            ColoredText::warning("tailscale up printed no login URL:").render(color),
            output.trim_end()
        ),
        BootstrapEvent::Completed => format!(
            "\n{} {}",
            icon(Icon::Success),
            ColoredText::success("Bootstrap finished").bold().render(color)
        ),
    }
}

pub fn event_json(event: &BootstrapEvent) -> Value {
    let mut value = match event {
        BootstrapEvent::StepStarted { step } => json!({"event": "step_started", "step": step}),
        BootstrapEvent::StepSkipped { step, reason } => {
            json!({"event": "step_skipped", "step": step, "reason": reason})
        }
        BootstrapEvent::CommandStarted { command } => json!({"event": "command", "command": command}),
        BootstrapEvent::CommandTolerated { command, code, note } => json!({
            "event": "command_tolerated",
            "command": command,
            "code": code,
            "note": note,
        }),
        BootstrapEvent::Info { message } => json!({"event": "info", "message": message}),
        BootstrapEvent::Warning { message } => json!({"event": "warning", "message": message}),
        BootstrapEvent::DirectoryReady { path, owner, mode } => json!({
            "event": "directory_ready",
            "path": path.display().to_string(),
            "owner": owner,
            "mode": mode,
        }),
        BootstrapEvent::LoginUrl { url } => json!({"event": "login_url", "url": url}),
        BootstrapEvent::UnexpectedOutput { output } => {
            json!({"event": "unexpected_output", "output": output})
        }
        BootstrapEvent::Completed => json!({"event": "completed"}),
    };
    value["timestamp"] = Value::String(chrono::Utc::now().to_rfc3339());
    value
}
