//! Subcommand handlers

pub mod bootstrap;
pub mod companion;

use indirector::config::ConfigWarning;

use crate::ui::context::UiContext;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// Report unknown configuration keys before a command runs.
pub fn print_config_warnings(ui: &UiContext, warnings: &[ConfigWarning]) {
    for warning in warnings {
        if ui.json {
            let _ = crate::ui::json::emit(&serde_json::json!({
                "event": "config_warning",
                "key": warning.key,
                "file": warning.file.display().to_string(),
                "line": warning.line,
                "suggestion": warning.suggestion,
            }));
            continue;
        }

        let location = match warning.line {
            Some(line) => format!("{}:{}", warning.file.display(), line),
            None => warning.file.display().to_string(),
        };
        let mut message = format!("Unknown config key '{}' in {}", warning.key, location);
        if let Some(suggestion) = &warning.suggestion {
            message.push_str(&format!(" (did you mean '{}'?)", suggestion));
        }
        eprintln!(
            "{} {}",
            Icon::Warning.colored(ui.color, ui.unicode),
            ColoredText::warning(message).render(ui.color)
        );
    }
}
