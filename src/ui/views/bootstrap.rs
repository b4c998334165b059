use std::path::Path;
use std::time::Duration;

use indirector::domain::services::TailscaleState;
use indirector::BootstrapReport;

use crate::ui::blocks::header::CommandHeader;
use crate::ui::blocks::summary::ResultSummary;
use crate::ui::primitives::icon::Icon;

pub fn render_bootstrap_header(
    profile: &str,
    project_dir: &Path,
    config_source: Option<&Path>,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut header = CommandHeader::new(Icon::Bootstrap, "Indirector Bootstrap");
    header.add("Profile", profile);
    header.add("Project", project_dir.display().to_string());
    if let Some(source) = config_source {
        header.add("Config", source.display().to_string());
    }
    header.render(supports_color, supports_unicode)
}

pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{:.1}s", elapsed.as_secs_f64())
    }
}

pub fn render_bootstrap_summary(
    report: &BootstrapReport,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let needs_attention = matches!(
        report.tailscale,
        Some(TailscaleState::AwaitingAuth { .. }) | Some(TailscaleState::UnexpectedOutput { .. })
    );
    let mut summary = if needs_attention {
        ResultSummary::attention("Bootstrap Needs Attention")
    } else {
        ResultSummary::success("Bootstrap Complete")
    };

    summary.add_fact("Profile", report.profile.as_str());
    summary.add_fact(
        "Docker",
        if report.docker_installed {
            "installed"
        } else {
            "already present"
        },
    );
    summary.add_fact("Services", report.services.join(", "));
    for datastore in &report.datastores {
        summary.add_fact("Datastore", datastore.path.display().to_string());
    }
    if let Some(state) = &report.tailscale {
        let status = match state {
            TailscaleState::NotRunning => "vpn container not running".to_string(),
            TailscaleState::LoggedIn => "logged in".to_string(),
            TailscaleState::AwaitingAuth { .. } => "waiting for login".to_string(),
            TailscaleState::UnexpectedOutput { .. } => "unexpected output".to_string(),
        };
        summary.add_fact("Tailscale", status);
    }

    match &report.tailscale {
        Some(TailscaleState::AwaitingAuth { url }) => {
            summary.with_next_step(format!("Open {} to finish the VPN login", url))
        }
        Some(TailscaleState::UnexpectedOutput { .. }) => {
            summary.add_warning("tailscale up printed no login URL");
            summary.with_next_step("Run `docker exec vpn tailscale up` and follow its output");
        }
        Some(TailscaleState::NotRunning) => {
            summary.add_warning("the vpn container is not running; Tailscale login skipped")
        }
        _ => {}
    }

    summary.render(supports_color, supports_unicode)
}
