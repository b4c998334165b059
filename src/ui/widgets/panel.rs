use std::borrow::Cow;

use crossterm::style::Stylize;
use unicode_width::UnicodeWidthStr;

use crate::ui::primitives::border::Border;
use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelStyle {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// A framed block of lines, sized to its widest line
#[derive(Debug, Default, Clone)]
pub struct Panel {
    title: Option<String>,
    rows: Vec<String>,
    style: PanelStyle,
}

impl Panel {
    pub fn titled(title: impl Into<String>, style: PanelStyle) -> Self {
        Self {
            title: Some(title.into()),
            rows: Vec::new(),
            style,
        }
    }

    /// Multi-line text becomes one row per line.
    pub fn line(&mut self, text: impl AsRef<str>) {
        self.rows.extend(text.as_ref().lines().map(str::to_string));
    }

    pub fn blank(&mut self) {
        self.rows.push(String::new());
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let border = Border::for_terminal(supports_unicode);
        let rows: Vec<&str> = self
            .title
            .iter()
            .map(String::as_str)
            .chain(self.rows.iter().map(String::as_str))
            .collect();
        let inner = rows.iter().map(|r| visible_width(r)).max().unwrap_or(0) + 2;

        let paint = |s: &str| -> String {
            if !supports_color {
                return s.to_string();
            }
            let color = match self.style {
                PanelStyle::Info => theme::colors::INFO,
                PanelStyle::Success => theme::colors::SUCCESS,
                PanelStyle::Warning => theme::colors::WARNING,
                PanelStyle::Error => theme::colors::ERROR,
            };
            format!("{}", s.with(color))
        };

        let mut out = paint(&format!(
            "{}{}{}",
            border.top_left,
            border.horizontal.repeat(inner),
            border.top_right
        ));
        out.push('\n');
        for row in rows {
            let pad = inner - 1 - visible_width(row);
            out.push_str(&paint(border.vertical));
            out.push(' ');
            out.push_str(row);
            out.push_str(&" ".repeat(pad));
            out.push_str(&paint(border.vertical));
            out.push('\n');
        }
        out.push_str(&paint(&format!(
            "{}{}{}",
            border.bottom_left,
            border.horizontal.repeat(inner),
            border.bottom_right
        )));
        out.push('\n');
        out
    }
}

/// Display width ignoring ANSI escape sequences.
fn visible_width(s: &str) -> usize {
    strip_ansi(s).width()
}

fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains('\u{1b}') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut in_escape = false;
    for c in s.chars() {
        match (in_escape, c) {
            (false, '\u{1b}') => in_escape = true,
            (false, c) => out.push(c),
            (true, c) if c.is_ascii_alphabetic() => in_escape = false,
            (true, _) => {}
        }
    }
    Cow::Owned(out)
}
