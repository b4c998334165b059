use std::path::Path;

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;

pub fn render_companion_header(
    url: &str,
    snippets: Option<&Path>,
    watches: &[String],
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut header = CommandHeader::new(Icon::Companion, "Indirector Companion");
    header.add("Bridge", url);
    header.add(
        "Snippets",
        snippets
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "disabled".to_string()),
    );
    for watch in watches {
        header.add("Watch", watch.as_str());
    }
    header.render(supports_color, supports_unicode)
}
