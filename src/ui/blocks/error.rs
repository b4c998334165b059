use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;
use crate::ui::widgets::panel::{Panel, PanelStyle};

/// Lines of captured stderr shown under a failed command
const STDERR_TAIL_LINES: usize = 8;

/// Framed fatal error: what failed, where, and what to try
#[derive(Debug, Clone)]
pub struct ErrorBlock {
    message: String,
    details: Vec<(String, String)>,
    output: Option<String>,
    fix: Option<String>,
}

impl ErrorBlock {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: Vec::new(),
            output: None,
            fix: None,
        }
    }

    pub fn with_detail(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push((label.into(), value.into()));
        self
    }

    /// Attach the tail of a command's stderr.
    pub fn with_output(mut self, output: &str) -> Self {
        let lines: Vec<&str> = output.trim_end().lines().collect();
        if !lines.is_empty() {
            let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
            self.output = Some(lines[start..].join("\n"));
        }
        self
    }

    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = Some(fix.into());
        self
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let mut panel = Panel::titled(
            format!(
                "{} {}",
                Icon::Error.colored(supports_color, supports_unicode),
                ColoredText::error("ERROR").bold().render(supports_color)
            ),
            PanelStyle::Error,
        );

        panel.line(&self.message);
        if !self.details.is_empty() {
            panel.blank();
            for (label, value) in &self.details {
                panel.line(format!("{}: {}", label, value));
            }
        }
        if let Some(output) = &self.output {
            panel.blank();
            for line in output.lines() {
                panel.line(ColoredText::dim(line).render(supports_color));
            }
        }
        if let Some(fix) = &self.fix {
            panel.blank();
            panel.line(format!("FIX: {}", fix));
        }

        panel.render(supports_color, supports_unicode)
    }
}
