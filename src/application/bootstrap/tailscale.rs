//! Post-deploy Tailscale login (`vpn` profile)
//!
//! One status check, one login attempt. The operator finishes the login in a
//! browser; nothing here waits for that.

use crate::config::TailscaleConfig;
use crate::domain::ports::{BootstrapEvent, BootstrapEventSink, CommandRunner, Invocation};
use crate::domain::services::tailscale::{classify_login_output, is_logged_in, TailscaleState};
use crate::error::IndirectorResult;

pub const STEP: &str = "Tailscale login";

fn exec(container: &str, args: &[&str]) -> Invocation {
    Invocation::new("docker")
        .arg("exec")
        .arg(container)
        .arg("tailscale")
        .args(args.iter().copied())
        .privileged()
        .captured()
}

/// True if `docker ps` lists `container` as running.
pub fn container_running(runner: &impl CommandRunner, container: &str) -> IndirectorResult<bool> {
    let ps = Invocation::new("docker")
        .args(["ps", "--filter"])
        .arg(format!("name=^{}$", container))
        .args(["--filter", "status=running", "--format", "{{.Names}}"])
        .privileged()
        .captured();
    let output = runner.run(&ps)?;
    Ok(output.is_success() && output.stdout.lines().any(|line| line.trim() == container))
}

pub fn login(
    runner: &impl CommandRunner,
    sink: &impl BootstrapEventSink,
    config: &TailscaleConfig,
) -> IndirectorResult<TailscaleState> {
    sink.on_event(BootstrapEvent::StepStarted {
        step: STEP.to_string(),
    });
    runner.pause(config.startup_delay());

    let container = config.container.as_str();
    if !container_running(runner, container)? {
        sink.on_event(BootstrapEvent::Warning {
            message: format!(
                "Container '{}' is not running; skipping Tailscale login",
                container
            ),
        });
        return Ok(TailscaleState::NotRunning);
    }

    // A logged-out node makes `tailscale status` exit non-zero; only the text matters.
    let status = runner.run(&exec(container, &["status"]))?;
    if is_logged_in(&status.combined()) {
        sink.on_event(BootstrapEvent::StepSkipped {
            step: STEP.to_string(),
            reason: "Tailscale is already logged in".to_string(),
        });
        return Ok(TailscaleState::LoggedIn);
    }

    let up = exec(container, &["up"]).timeout(config.up_timeout());
    sink.on_event(BootstrapEvent::CommandStarted {
        command: up.to_string(),
    });
    let output = runner.run(&up)?;
    if !output.is_success() && !output.timed_out {
        sink.on_event(BootstrapEvent::CommandTolerated {
            command: up.to_string(),
            code: output.code,
            note: "inspecting output for a login URL".to_string(),
        });
    }

    let state = classify_login_output(&output.combined());
    match &state {
        TailscaleState::AwaitingAuth { url } => {
            sink.on_event(BootstrapEvent::LoginUrl { url: url.clone() })
        }
        TailscaleState::UnexpectedOutput { output } => {
            sink.on_event(BootstrapEvent::UnexpectedOutput {
                output: output.clone(),
            })
        }
        TailscaleState::NotRunning | TailscaleState::LoggedIn => {}
    }
    Ok(state)
}
