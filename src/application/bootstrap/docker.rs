//! Conditional Docker Engine installation
//!
//! Skipped entirely when `docker --version` and `docker info` both succeed.

use crate::domain::ports::{BootstrapEvent, BootstrapEventSink, CommandRunner, Invocation};
use crate::error::{IndirectorError, IndirectorResult};
use crate::infrastructure::OS_RELEASE_PATH;

use super::guard::HostContext;

pub const STEP: &str = "Docker install";

pub const KEYRING_DIR: &str = "/etc/apt/keyrings";
pub const KEYRING_PATH: &str = "/etc/apt/keyrings/docker.asc";
pub const SOURCE_LIST_PATH: &str = "/etc/apt/sources.list.d/docker.list";
pub const DOWNLOAD_BASE: &str = "https://download.docker.com/linux";

/// True if the Docker CLI is installed and the daemon answers.
pub fn docker_available(runner: &impl CommandRunner) -> IndirectorResult<bool> {
    let queries = [
        Invocation::new("docker").arg("--version").captured(),
        Invocation::new("docker").arg("info").privileged().captured(),
    ];
    for query in &queries {
        match runner.run(query) {
            Ok(output) if output.is_success() => {}
            Ok(_) | Err(IndirectorError::Spawn { .. }) => return Ok(false),
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}

/// The apt source line for the host's architecture and release.
pub fn source_list_entry(arch: &str, distro: &str, codename: &str) -> String {
    format!(
        "deb [arch={} signed-by={}] {}/{} {} stable\n",
        arch, KEYRING_PATH, DOWNLOAD_BASE, distro, codename
    )
}

/// Install Docker unless it is already usable. Returns true when this run
/// performed the installation.
pub fn ensure_docker(
    runner: &impl CommandRunner,
    sink: &impl BootstrapEventSink,
    host: &HostContext,
    packages: &[String],
) -> IndirectorResult<bool> {
    sink.on_event(BootstrapEvent::StepStarted {
        step: STEP.to_string(),
    });

    if docker_available(runner)? {
        sink.on_event(BootstrapEvent::StepSkipped {
            step: STEP.to_string(),
            reason: "Docker is already installed and the daemon is reachable".to_string(),
        });
        return Ok(false);
    }

    let codename = host
        .os_release
        .codename()
        .ok_or_else(|| IndirectorError::OsRelease {
            file: OS_RELEASE_PATH.into(),
            key: "VERSION_CODENAME".to_string(),
        })?
        .to_string();
    let distro = host.os_release.docker_distro().to_string();

    let checked = |invocation: Invocation| -> IndirectorResult<String> {
        sink.on_event(BootstrapEvent::CommandStarted {
            command: invocation.to_string(),
        });
        runner
            .run_checked(STEP, &invocation)
            .map(|output| output.stdout)
    };

    checked(
        Invocation::new("install")
            .args(["-m", "0755", "-d", KEYRING_DIR])
            .privileged(),
    )?;
    checked(
        Invocation::new("curl")
            .arg("-fsSL")
            .arg(format!("{}/{}/gpg", DOWNLOAD_BASE, distro))
            .args(["-o", KEYRING_PATH])
            .privileged(),
    )?;
    checked(
        Invocation::new("chmod")
            .args(["a+r", KEYRING_PATH])
            .privileged(),
    )?;

    let arch = checked(
        Invocation::new("dpkg")
            .arg("--print-architecture")
            .captured(),
    )?
    .trim()
    .to_string();

    checked(
        Invocation::new("tee")
            .arg(SOURCE_LIST_PATH)
            .privileged()
            .captured()
            .stdin(source_list_entry(&arch, &distro, &codename)),
    )?;
    checked(Invocation::new("apt-get").arg("update").privileged())?;
    checked(
        Invocation::new("apt-get")
            .args(["install", "-y"])
            .args(packages.iter().cloned())
            .privileged(),
    )?;

    let grant = Invocation::new("usermod")
        .args(["-aG", "docker"])
        .arg(&host.user)
        .privileged()
        .captured();
    sink.on_event(BootstrapEvent::CommandStarted {
        command: grant.to_string(),
    });
    match runner.run(&grant) {
        Ok(output) if output.is_success() => sink.on_event(BootstrapEvent::Info {
            message: format!(
                "Added {} to the docker group; log out and back in to use docker without sudo",
                host.user
            ),
        }),
        Ok(output) => sink.on_event(BootstrapEvent::CommandTolerated {
            command: grant.to_string(),
            code: output.code,
            note: "could not add user to the docker group".to_string(),
        }),
        Err(e) => sink.on_event(BootstrapEvent::CommandTolerated {
            command: grant.to_string(),
            code: None,
            note: e.to_string(),
        }),
    }

    Ok(true)
}
