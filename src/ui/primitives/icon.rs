use crossterm::style::Stylize;

use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Success,
    Error,
    Warning,
    Step,
    Skipped,
    Arrow,
    Command,
    Link,
    Bootstrap,
    Companion,
}

impl Icon {
    pub fn render(&self, supports_unicode: bool) -> &'static str {
        if supports_unicode {
            match self {
                Icon::Success => theme::icons::SUCCESS,
                Icon::Error => theme::icons::ERROR,
                Icon::Warning => theme::icons::WARNING,
                Icon::Step => theme::icons::STEP,
                Icon::Skipped => theme::icons::SKIPPED,
                Icon::Arrow => theme::icons::ARROW,
                Icon::Command => theme::icons::COMMAND,
                Icon::Link => theme::icons::LINK,
                Icon::Bootstrap => theme::icons::BOOTSTRAP,
                Icon::Companion => theme::icons::COMPANION,
            }
        } else {
            match self {
                Icon::Success => theme::icons_ascii::SUCCESS,
                Icon::Error => theme::icons_ascii::ERROR,
                Icon::Warning => theme::icons_ascii::WARNING,
                Icon::Step => theme::icons_ascii::STEP,
                Icon::Skipped => theme::icons_ascii::SKIPPED,
                Icon::Arrow => theme::icons_ascii::ARROW,
                Icon::Command => theme::icons_ascii::COMMAND,
                Icon::Link => theme::icons_ascii::LINK,
                Icon::Bootstrap => theme::icons_ascii::BOOTSTRAP,
                Icon::Companion => theme::icons_ascii::COMPANION,
            }
        }
    }

    pub fn colored(&self, supports_color: bool, supports_unicode: bool) -> String {
        let s = self.render(supports_unicode);
        if !supports_color {
            return s.to_string();
        }
        let color = match self {
            Icon::Success => theme::colors::SUCCESS,
            Icon::Error => theme::colors::ERROR,
            Icon::Warning => theme::colors::WARNING,
            Icon::Skipped | Icon::Arrow | Icon::Command => theme::colors::DIM,
            Icon::Step | Icon::Link | Icon::Bootstrap | Icon::Companion => theme::colors::INFO,
        };
        format!("{}", s.with(color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_renders_ascii_when_unicode_unsupported() {
        assert_eq!(Icon::Success.render(false), theme::icons_ascii::SUCCESS);
        assert_eq!(Icon::Bootstrap.render(false), "[BOOTSTRAP]");
    }

    #[test]
    fn icon_renders_unicode_when_supported() {
        assert_eq!(Icon::Warning.render(true), theme::icons::WARNING);
    }
}
