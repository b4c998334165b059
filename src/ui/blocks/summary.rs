use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;
use crate::ui::widgets::panel::{Panel, PanelStyle};

/// Framed end-of-run summary
#[derive(Debug, Clone)]
pub struct ResultSummary {
    title: String,
    success: bool,
    facts: Vec<(String, String)>,
    warnings: Vec<String>,
    next_step: Option<String>,
}

impl ResultSummary {
    pub fn success(title: impl Into<String>) -> Self {
        Self::with_outcome(title, true)
    }

    pub fn attention(title: impl Into<String>) -> Self {
        Self::with_outcome(title, false)
    }

    fn with_outcome(title: impl Into<String>, success: bool) -> Self {
        Self {
            title: title.into(),
            success,
            facts: Vec::new(),
            warnings: Vec::new(),
            next_step: None,
        }
    }

    pub fn add_fact(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.facts.push((label.into(), value.into()));
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn with_next_step(&mut self, hint: impl Into<String>) {
        self.next_step = Some(hint.into());
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let (style, icon, title) = if self.success {
            (PanelStyle::Success, Icon::Success, ColoredText::success(self.title.as_str()))
        } else {
            (PanelStyle::Warning, Icon::Warning, ColoredText::warning(self.title.as_str()))
        };

        let mut panel = Panel::titled(
            format!(
                "{} {}",
                icon.colored(supports_color, supports_unicode),
                title.bold().render(supports_color)
            ),
            style,
        );

        if !self.facts.is_empty() {
            panel.blank();
            let width = self.facts.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
            for (label, value) in &self.facts {
                panel.line(format!("{:<width$}  {}", label, value, width = width));
            }
        }

        if !self.warnings.is_empty() {
            panel.blank();
            for warning in &self.warnings {
                panel.line(format!(
                    "{} {}",
                    Icon::Warning.colored(supports_color, supports_unicode),
                    warning
                ));
            }
        }

        if let Some(next_step) = &self.next_step {
            panel.blank();
            panel.line(format!(
                "{} {} {}",
                Icon::Arrow.colored(supports_color, supports_unicode),
                ColoredText::dim("Next:").render(supports_color),
                next_step
            ));
        }

        panel.render(supports_color, supports_unicode)
    }
}
