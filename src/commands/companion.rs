use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;
use url::Url;

use indirector::companion::{parse_watch, Companion, CompanionSettings};
use indirector::config::LoadedConfig;

use crate::ui::context::UiContext;
use crate::ui::views::companion::render_companion_header;

pub fn cmd_companion(
    ui: &UiContext,
    loaded: &LoadedConfig,
    url: Option<String>,
    snippets: Option<PathBuf>,
    no_snippets: bool,
    watch: Vec<String>,
) -> Result<()> {
    let mut settings = CompanionSettings::from_config(&loaded.config.companion);
    if let Some(url) = url {
        settings.url = url;
    }
    let parsed = Url::parse(&settings.url)
        .with_context(|| format!("invalid Companion URL '{}'", settings.url))?;
    if !matches!(parsed.scheme(), "ws" | "wss") {
        bail!(
            "Companion URL must use ws:// or wss://, got '{}'",
            settings.url
        );
    }

    if no_snippets {
        settings.snippets = None;
    } else if let (Some(path), Some(target)) = (snippets, settings.snippets.as_mut()) {
        target.path = path;
    }

    let watches = watch
        .iter()
        .map(|spec| parse_watch(spec))
        .collect::<Result<Vec<_>, _>>()?;

    if ui.json {
        crate::ui::json::emit(&serde_json::json!({
            "event": "start",
            "command": "companion",
            "url": settings.url,
        }))?;
    } else {
        print!(
            "{}",
            render_companion_header(
                &settings.url,
                settings.snippets.as_ref().map(|s| s.path.as_path()),
                &watch,
                ui.color,
                ui.unicode,
            )
        );
    }
    super::print_config_warnings(ui, &loaded.warnings);

    let json = ui.json;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    runtime.block_on(async move {
        let companion = Companion::new(settings);
        for spec in watches {
            companion.on_change(spec.connection, spec.matcher, move |change| async move {
                if json {
                    crate::ui::json::emit(&serde_json::json!({
                        "event": "variable_changed",
                        "connection": change.connection,
                        "variable": change.variable,
                        "value": change.value,
                    }))?;
                } else {
                    info!(
                        connection = %change.connection,
                        variable = %change.variable,
                        value = %change.value,
                        "variable changed"
                    );
                }
                Ok::<(), anyhow::Error>(())
            });
        }
        companion.run().await;
    });

    Ok(())
}
