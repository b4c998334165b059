//! Bootstrap use case
//!
//! Guard → system update → Docker install → deploy → Tailscale login.
//! Every step returns `Result`; the first error ends the run and carries the
//! failing command's exit code up to `main`.

pub mod deploy;
pub mod docker;
pub mod guard;
pub mod system;
pub mod tailscale;

use std::path::PathBuf;

use crate::config::Config;
use crate::domain::ports::{BootstrapEvent, BootstrapEventSink, CommandRunner};
use crate::domain::services::tailscale::TailscaleState;
use crate::domain::value_objects::{Datastore, Profile};
use crate::error::IndirectorResult;

pub use guard::{check_environment, HostContext};

/// What to bootstrap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapRequest {
    pub profile: Profile,
    /// Directory holding the Compose file; datastores for the `vpn` profile live here
    pub project_dir: PathBuf,
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub profile: Profile,
    /// True when this run installed Docker
    pub docker_installed: bool,
    pub datastores: Vec<Datastore>,
    pub services: Vec<String>,
    /// `None` for profiles without a VPN sidecar
    pub tailscale: Option<TailscaleState>,
}

/// Runs the bootstrap pipeline against a runner and an event sink
pub struct Bootstrapper<'a, R: CommandRunner, S: BootstrapEventSink> {
    runner: R,
    sink: S,
    config: &'a Config,
}

impl<'a, R: CommandRunner, S: BootstrapEventSink> Bootstrapper<'a, R, S> {
    pub fn new(runner: R, sink: S, config: &'a Config) -> Self {
        Self {
            runner,
            sink,
            config,
        }
    }

    pub fn run(&self, host: &HostContext, request: &BootstrapRequest) -> IndirectorResult<BootstrapReport> {
        // A missing or broken Compose file fails before apt runs.
        let project = deploy::load_compose_project(
            &request.project_dir,
            self.config.bootstrap.compose_file.as_deref(),
        )?;
        let services: Vec<String> = project
            .service_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        self.sink.on_event(BootstrapEvent::Info {
            message: format!(
                "Compose file {} defines {} service(s): {}",
                project.file.display(),
                services.len(),
                services.join(", ")
            ),
        });
        if request.profile.runs_tailscale() && !project.provides_container(&self.config.tailscale.container) {
            self.sink.on_event(BootstrapEvent::Warning {
                message: format!(
                    "Compose file has no '{}' container; the Tailscale login will be skipped",
                    self.config.tailscale.container
                ),
            });
        }

        system::update_system(&self.runner, &self.sink)?;

        let docker_installed = docker::ensure_docker(
            &self.runner,
            &self.sink,
            host,
            &self.config.bootstrap.docker_packages,
        )?;

        self.sink.on_event(BootstrapEvent::StepStarted {
            step: deploy::STEP.to_string(),
        });
        deploy::mark_safe_directory(&self.runner, &self.sink, &request.project_dir);
        let datastores = deploy::plan_datastores(
            request.profile,
            &request.project_dir,
            host,
            &self.config.datastore,
        );
        deploy::provision_datastores(&self.runner, &self.sink, &datastores)?;
        deploy::recreate_stack(&self.runner, &self.sink, &project, &request.project_dir)?;

        let tailscale = if request.profile.runs_tailscale() {
            Some(tailscale::login(&self.runner, &self.sink, &self.config.tailscale)?)
        } else {
            None
        };

        self.sink.on_event(BootstrapEvent::Completed);

        Ok(BootstrapReport {
            profile: request.profile,
            docker_installed,
            datastores,
            services,
            tailscale,
        })
    }
}
