//! Bootstrap pipeline scenarios against a scripted runner.
//!
//! Run with: `cargo test --test bootstrap_pipeline`

mod common;

use std::time::Duration;

use common::*;
use indirector::domain::ports::{BootstrapEvent, CommandOutput};
use indirector::domain::services::TailscaleState;
use indirector::{
    BootstrapReport, BootstrapRequest, Bootstrapper, Config, IndirectorError, IndirectorResult,
    Profile,
};
use tempfile::TempDir;

fn run(
    runner: &ScriptedRunner,
    sink: &RecordingSink,
    project: &TempDir,
    profile: Profile,
) -> IndirectorResult<BootstrapReport> {
    let home = TempDir::new().unwrap();
    run_with_home(runner, sink, project, profile, &home)
}

fn run_with_home(
    runner: &ScriptedRunner,
    sink: &RecordingSink,
    project: &TempDir,
    profile: Profile,
    home: &TempDir,
) -> IndirectorResult<BootstrapReport> {
    let config = Config::default();
    let request = BootstrapRequest {
        profile,
        project_dir: project.path().to_path_buf(),
    };
    Bootstrapper::new(runner, sink, &config).run(&host(home.path()), &request)
}

#[test]
fn installed_docker_is_not_reinstalled() {
    let project = vpn_project();
    let runner = ScriptedRunner::healthy();
    let sink = RecordingSink::new();

    let report = run(&runner, &sink, &project, Profile::Vpn).unwrap();

    assert!(!report.docker_installed);
    assert!(!runner.ran("curl", &[]));
    assert!(!runner.ran("apt-get", &["install"]));
    assert!(!runner.ran("usermod", &[]));
    assert!(sink.skipped_steps().contains(&"Docker install".to_string()));
}

#[test]
fn system_update_runs_before_docker_check() {
    let project = vpn_project();
    let runner = ScriptedRunner::healthy();
    let sink = RecordingSink::new();

    run(&runner, &sink, &project, Profile::Vpn).unwrap();

    let update = runner.position("apt-get", &["update"]).unwrap();
    let upgrade = runner.position("apt-get", &["upgrade", "-y"]).unwrap();
    let check = runner.position("docker", &["--version"]).unwrap();
    assert!(update < upgrade && upgrade < check);
}

#[test]
fn missing_docker_installs_in_order() {
    let project = vpn_project();
    let runner = ScriptedRunner::without_docker();
    let sink = RecordingSink::new();

    let report = run(&runner, &sink, &project, Profile::Vpn).unwrap();
    assert!(report.docker_installed);

    let sequence = [
        runner.position("install", &["-m", "0755", "-d", "/etc/apt/keyrings"]),
        runner.position("curl", &["https://download.docker.com/linux/ubuntu/gpg"]),
        runner.position("chmod", &["a+r", "/etc/apt/keyrings/docker.asc"]),
        runner.position("dpkg", &["--print-architecture"]),
        runner.position("tee", &["/etc/apt/sources.list.d/docker.list"]),
        runner.position("apt-get", &["install", "-y", "docker-ce"]),
        runner.position("usermod", &["-aG", "docker", "ops"]),
        runner.position("docker", &["compose", "pull"]),
    ];
    let positions: Vec<usize> = sequence.iter().map(|p| p.unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{:?}", positions);

    let tee = runner.find("tee", &[]).unwrap();
    assert_eq!(
        tee.stdin.as_deref(),
        Some("deb [arch=amd64 signed-by=/etc/apt/keyrings/docker.asc] https://download.docker.com/linux/ubuntu jammy stable\n")
    );
    assert!(tee.privileged);
}

#[test]
fn unreachable_daemon_triggers_install() {
    let project = vpn_project();
    let runner = ScriptedRunner::healthy().on(
        "docker",
        &["info"],
        CommandOutput::failure(1).with_stderr("Cannot connect to the Docker daemon\n"),
    );
    let sink = RecordingSink::new();

    let report = run(&runner, &sink, &project, Profile::Vpn).unwrap();

    assert!(report.docker_installed);
    let version = runner.position("docker", &["--version"]).unwrap();
    let info = runner.position("docker", &["info"]).unwrap();
    let install = runner.position("apt-get", &["install", "-y", "docker-ce"]).unwrap();
    assert!(version < info && info < install);
    assert!(!sink.skipped_steps().contains(&"Docker install".to_string()));
}

#[test]
fn vpn_profile_provisions_project_datastores() {
    let project = vpn_project();
    let runner = ScriptedRunner::healthy();
    let sink = RecordingSink::new();

    let report = run(&runner, &sink, &project, Profile::Vpn).unwrap();

    let companion = project.path().join("datastore").join("companion");
    let tailscale = project.path().join("datastore").join("tailscale");
    let paths: Vec<_> = report.datastores.iter().map(|d| d.path.clone()).collect();
    assert_eq!(paths, vec![companion.clone(), tailscale.clone()]);

    let companion = companion.to_string_lossy().into_owned();
    let tailscale = tailscale.to_string_lossy().into_owned();
    assert!(runner.ran("mkdir", &["-p", companion.as_str()]));
    assert!(runner.ran("chown", &["-R", "1000:1000", companion.as_str()]));
    assert!(runner.ran("chmod", &["-R", "775", companion.as_str()]));
    assert!(runner.ran("chmod", &["-R", "700", tailscale.as_str()]));
    assert!(runner.find("chown", &[]).unwrap().privileged);
}

#[test]
fn home_profile_uses_home_datastore_and_skips_tailscale() {
    let project = project_with(HOME_COMPOSE);
    let home = TempDir::new().unwrap();
    let runner = ScriptedRunner::healthy();
    let sink = RecordingSink::new();

    let report = run_with_home(&runner, &sink, &project, Profile::Home, &home).unwrap();

    let expected = home.path().join(".fcav").join("companion");
    assert_eq!(report.datastores.len(), 1);
    assert_eq!(report.datastores[0].path, expected);
    assert!(runner.ran("chown", &["-R", "ops:ops"]));
    assert!(!runner.ran("docker", &["exec"]));
    assert!(!runner.ran("docker", &["ps"]));
    assert!(runner.pauses().is_empty());
    assert_eq!(report.tailscale, None);
    assert!(sink.warnings().is_empty());
}

#[test]
fn compose_down_failure_is_tolerated() {
    let project = vpn_project();
    let runner = ScriptedRunner::healthy().on(
        "docker",
        &["compose", "down"],
        CommandOutput::failure(1).with_stderr("no configuration file provided\n"),
    );
    let sink = RecordingSink::new();

    run(&runner, &sink, &project, Profile::Vpn).unwrap();

    let down = runner.position("docker", &["compose", "down"]).unwrap();
    let pull = runner.position("docker", &["compose", "pull"]).unwrap();
    let up = runner.position("docker", &["compose", "up", "--build", "-d"]).unwrap();
    assert!(down < pull && pull < up);
    assert!(sink.events().iter().any(|e| matches!(
        e,
        BootstrapEvent::CommandTolerated { code: Some(1), .. }
    )));
}

#[test]
fn compose_commands_target_the_project() {
    let project = vpn_project();
    let runner = ScriptedRunner::healthy();
    let sink = RecordingSink::new();

    run(&runner, &sink, &project, Profile::Vpn).unwrap();

    let dir = project.path().to_string_lossy().into_owned();
    let file = project.path().join("docker-compose.yml").to_string_lossy().into_owned();
    let up = runner.find("docker", &["compose", "up"]).unwrap();
    assert!(up.matches("docker", &["compose", "--project-directory", dir.as_str(), "-f", file.as_str(), "up"]));
    assert!(up.privileged);
}

#[test]
fn failed_pull_stops_with_its_exit_code() {
    let project = vpn_project();
    let runner = ScriptedRunner::healthy().on(
        "docker",
        &["compose", "pull"],
        CommandOutput::failure(18).with_stderr("pull access denied\n"),
    );
    let sink = RecordingSink::new();

    let err = run(&runner, &sink, &project, Profile::Vpn).unwrap_err();

    match &err {
        IndirectorError::CommandFailed { step, code, .. } => {
            assert_eq!(step, "Deploy");
            assert_eq!(*code, 18);
        }
        other => panic!("expected CommandFailed, got {:?}", other),
    }
    assert_eq!(err.exit_code(), 18);
    assert!(!runner.ran("docker", &["compose", "up"]));
    assert!(!sink.events().contains(&BootstrapEvent::Completed));
}

#[test]
fn failed_upgrade_stops_before_docker() {
    let project = vpn_project();
    let runner = ScriptedRunner::healthy().on("apt-get", &["upgrade"], CommandOutput::failure(100));
    let sink = RecordingSink::new();

    let err = run(&runner, &sink, &project, Profile::Vpn).unwrap_err();

    assert_eq!(err.exit_code(), 100);
    assert!(!runner.ran("docker", &[]));
}

#[test]
fn missing_compose_file_fails_before_apt() {
    let project = TempDir::new().unwrap();
    let runner = ScriptedRunner::healthy();
    let sink = RecordingSink::new();

    let err = run(&runner, &sink, &project, Profile::Vpn).unwrap_err();

    assert!(matches!(err, IndirectorError::ComposeFileMissing { .. }));
    assert!(runner.calls().is_empty());
}

#[test]
fn logged_in_node_skips_tailscale_up() {
    let project = vpn_project();
    let runner = ScriptedRunner::healthy();
    let sink = RecordingSink::new();

    let report = run(&runner, &sink, &project, Profile::Vpn).unwrap();

    assert_eq!(report.tailscale, Some(TailscaleState::LoggedIn));
    assert!(runner.ran("docker", &["exec", "vpn", "tailscale", "status"]));
    assert!(!runner.ran("docker", &["exec", "vpn", "tailscale", "up"]));
    assert!(sink.skipped_steps().contains(&"Tailscale login".to_string()));
    assert_eq!(runner.pauses(), vec![Duration::from_secs(5)]);
}

#[test]
fn logged_out_node_reports_login_url() {
    let project = vpn_project();
    let runner = ScriptedRunner::healthy()
        .on(
            "docker",
            &["exec", "vpn", "tailscale", "status"],
            CommandOutput::failure(1).with_stdout("Logged out.\n"),
        )
        .on(
            "docker",
            &["exec", "vpn", "tailscale", "up"],
            CommandOutput {
                code: None,
                stdout: String::new(),
                stderr: "\nTo authenticate, visit:\n\n\thttps://login.tailscale.com/a/5f1e2d3c\n\n".to_string(),
                timed_out: true,
            },
        );
    let sink = RecordingSink::new();

    let report = run(&runner, &sink, &project, Profile::Vpn).unwrap();

    let url = "https://login.tailscale.com/a/5f1e2d3c".to_string();
    assert_eq!(report.tailscale, Some(TailscaleState::AwaitingAuth { url: url.clone() }));
    assert!(sink.events().contains(&BootstrapEvent::LoginUrl { url }));

    let up = runner.find("docker", &["exec", "vpn", "tailscale", "up"]).unwrap();
    assert_eq!(up.timeout, Some(Duration::from_secs(15)));
    assert!(up.capture);
}

#[test]
fn login_output_without_url_is_reported() {
    let project = vpn_project();
    let runner = ScriptedRunner::healthy()
        .on(
            "docker",
            &["exec", "vpn", "tailscale", "status"],
            CommandOutput::failure(1).with_stdout("Logged out.\n"),
        )
        .on(
            "docker",
            &["exec", "vpn", "tailscale", "up"],
            CommandOutput::failure(1).with_stderr("backend error: context deadline exceeded\n"),
        );
    let sink = RecordingSink::new();

    let report = run(&runner, &sink, &project, Profile::Vpn).unwrap();

    let output = "backend error: context deadline exceeded".to_string();
    assert_eq!(
        report.tailscale,
        Some(TailscaleState::UnexpectedOutput { output: output.clone() })
    );
    assert!(sink.events().contains(&BootstrapEvent::UnexpectedOutput { output }));
    assert!(sink.events().contains(&BootstrapEvent::Completed));
}

#[test]
fn stopped_vpn_container_skips_login() {
    let project = vpn_project();
    let runner = ScriptedRunner::healthy().on("docker", &["ps"], CommandOutput::success());
    let sink = RecordingSink::new();

    let report = run(&runner, &sink, &project, Profile::Vpn).unwrap();

    assert_eq!(report.tailscale, Some(TailscaleState::NotRunning));
    assert!(!runner.ran("docker", &["exec"]));
    assert!(sink.warnings().iter().any(|w| w.contains("not running")));
}

#[test]
fn compose_without_vpn_service_warns_up_front() {
    let project = project_with(HOME_COMPOSE);
    let runner = ScriptedRunner::healthy().on("docker", &["ps"], CommandOutput::success());
    let sink = RecordingSink::new();

    run(&runner, &sink, &project, Profile::Vpn).unwrap();

    let warnings = sink.warnings();
    assert!(warnings.iter().any(|w| w.contains("no 'vpn' container")), "{:?}", warnings);
}

#[test]
fn git_checkout_is_marked_safe() {
    let project = vpn_project();
    std::fs::create_dir(project.path().join(".git")).unwrap();
    let runner = ScriptedRunner::healthy().on("git", &["config"], CommandOutput::failure(255));
    let sink = RecordingSink::new();

    run(&runner, &sink, &project, Profile::Vpn).unwrap();

    assert!(runner.ran("git", &["config", "--global", "--add", "safe.directory"]));
    assert!(sink.events().iter().any(|e| matches!(
        e,
        BootstrapEvent::CommandTolerated { code: Some(255), .. }
    )));
}

#[test]
fn events_end_with_completed() {
    let project = vpn_project();
    let runner = ScriptedRunner::healthy();
    let sink = RecordingSink::new();

    run(&runner, &sink, &project, Profile::Vpn).unwrap();

    let events = sink.events();
    assert_eq!(events.last(), Some(&BootstrapEvent::Completed));
    let directories = events
        .iter()
        .filter(|e| matches!(e, BootstrapEvent::DirectoryReady { .. }))
        .count();
    assert_eq!(directories, 2);
}
