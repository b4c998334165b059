use std::path::Path;

use anyhow::Result;

use indirector::application::{check_environment, BootstrapReport, BootstrapRequest, Bootstrapper, HostContext};
use indirector::config::{Config, LoadedConfig};
use indirector::domain::ports::BootstrapEventSink;
use indirector::domain::value_objects::Profile;
use indirector::infrastructure::{SystemHost, SystemRunner};

use crate::ui::context::UiContext;
use crate::ui::sink::{ConsoleEventSink, JsonEventSink};
use crate::ui::views::bootstrap::{render_bootstrap_header, render_bootstrap_summary};

pub fn cmd_bootstrap(
    ui: &UiContext,
    loaded: &LoadedConfig,
    profile: Option<Profile>,
    project_dir: &Path,
) -> Result<()> {
    let config = &loaded.config;
    let profile = profile.unwrap_or(config.bootstrap.profile);
    let project_dir = project_dir
        .canonicalize()
        .unwrap_or_else(|_| project_dir.to_path_buf());

    if ui.json {
        crate::ui::json::emit(&serde_json::json!({
            "event": "start",
            "command": "bootstrap",
            "profile": profile.as_str(),
            "project_dir": project_dir.display().to_string(),
        }))?;
    } else {
        print!(
            "{}",
            render_bootstrap_header(
                profile.as_str(),
                &project_dir,
                loaded.source.as_deref(),
                ui.color,
                ui.unicode,
            )
        );
    }
    super::print_config_warnings(ui, &loaded.warnings);

    let host = check_environment(&SystemHost)?;
    let runner = if ui.json {
        SystemRunner::new(!host.is_root).stdout_to_stderr()
    } else {
        SystemRunner::new(!host.is_root)
    };
    let request = BootstrapRequest {
        profile,
        project_dir,
    };

    let report = if ui.json {
        run_with(&runner, JsonEventSink, config, &host, &request)?
    } else {
        run_with(&runner, ConsoleEventSink::new(*ui), config, &host, &request)?
    };

    if ui.json {
        crate::ui::json::emit(&summary_json(&report))?;
    } else {
        print!("{}", render_bootstrap_summary(&report, ui.color, ui.unicode));
    }
    Ok(())
}

fn run_with<S: BootstrapEventSink>(
    runner: &SystemRunner,
    sink: S,
    config: &Config,
    host: &HostContext,
    request: &BootstrapRequest,
) -> Result<BootstrapReport> {
    Ok(Bootstrapper::new(runner, sink, config).run(host, request)?)
}

fn summary_json(report: &BootstrapReport) -> serde_json::Value {
    use indirector::domain::services::TailscaleState;

    let (tailscale, login_url) = match &report.tailscale {
        None => (None, None),
        Some(TailscaleState::NotRunning) => (Some("not_running"), None),
        Some(TailscaleState::LoggedIn) => (Some("logged_in"), None),
        Some(TailscaleState::AwaitingAuth { url }) => (Some("awaiting_auth"), Some(url.as_str())),
        Some(TailscaleState::UnexpectedOutput { .. }) => (Some("unexpected_output"), None),
    };

    serde_json::json!({
        "event": "summary",
        "profile": report.profile.as_str(),
        "docker_installed": report.docker_installed,
        "services": report.services,
        "datastores": report
            .datastores
            .iter()
            .map(|d| d.path.display().to_string())
            .collect::<Vec<_>>(),
        "tailscale": tailscale,
        "login_url": login_url,
    })
}
