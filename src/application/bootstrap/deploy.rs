//! Deployment: datastore provisioning and Compose stack recreation
//!
//! The stack is always torn down and rebuilt, whatever state it was in.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::DatastoreConfig;
use crate::domain::ports::{BootstrapEvent, BootstrapEventSink, CommandRunner, Invocation};
use crate::domain::value_objects::{ComposeProject, Datastore, Owner, Profile, COMPOSE_FILE_NAMES};
use crate::error::{IndirectorError, IndirectorResult};

use super::guard::HostContext;

pub const STEP: &str = "Deploy";

/// Directories the stack bind-mounts for `profile`.
pub fn plan_datastores(
    profile: Profile,
    project_dir: &Path,
    host: &HostContext,
    config: &DatastoreConfig,
) -> Vec<Datastore> {
    let container_user = Owner::Ids {
        uid: config.uid,
        gid: config.gid,
    };
    match profile {
        Profile::Vpn => vec![
            Datastore::new(
                project_dir.join("datastore").join("companion"),
                container_user.clone(),
                config.companion_mode_bits(),
            ),
            Datastore::new(
                project_dir.join("datastore").join("tailscale"),
                container_user,
                config.tailscale_mode_bits(),
            ),
        ],
        Profile::Home => vec![Datastore::new(
            host.home.join(&config.home_dir).join("companion"),
            Owner::User(host.user.clone()),
            config.companion_mode_bits(),
        )],
    }
}

/// Find the Compose file: the configured name, else the first name
/// `docker compose` itself would pick up.
pub fn locate_compose_file(project_dir: &Path, configured: Option<&str>) -> IndirectorResult<PathBuf> {
    let found = match configured {
        Some(name) => Some(project_dir.join(name)).filter(|p| p.is_file()),
        None => COMPOSE_FILE_NAMES
            .iter()
            .map(|name| project_dir.join(name))
            .find(|p| p.is_file()),
    };
    found.ok_or_else(|| IndirectorError::ComposeFileMissing {
        dir: project_dir.to_path_buf(),
    })
}

pub fn load_compose_project(project_dir: &Path, configured: Option<&str>) -> IndirectorResult<ComposeProject> {
    let file = locate_compose_file(project_dir, configured)?;
    let content = fs::read_to_string(&file)?;
    ComposeProject::parse(&file, &content)
}

/// Create each datastore and normalize ownership and permissions.
pub fn provision_datastores(
    runner: &impl CommandRunner,
    sink: &impl BootstrapEventSink,
    datastores: &[Datastore],
) -> IndirectorResult<()> {
    for datastore in datastores {
        let path = datastore.path.to_string_lossy().into_owned();
        for invocation in [
            Invocation::new("mkdir").args(["-p", path.as_str()]),
            Invocation::new("chown").args(["-R", datastore.owner.spec().as_str(), path.as_str()]),
            Invocation::new("chmod").args(["-R", datastore.mode_spec().as_str(), path.as_str()]),
        ] {
            let invocation = invocation.privileged();
            sink.on_event(BootstrapEvent::CommandStarted {
                command: invocation.to_string(),
            });
            runner.run_checked(STEP, &invocation)?;
        }
        sink.on_event(BootstrapEvent::DirectoryReady {
            path: datastore.path.clone(),
            owner: datastore.owner.spec(),
            mode: datastore.mode_spec(),
        });
    }
    Ok(())
}

/// Register the project checkout with git's safe.directory list so git
/// keeps working after ownership changes. Failure is tolerated.
pub fn mark_safe_directory(
    runner: &impl CommandRunner,
    sink: &impl BootstrapEventSink,
    project_dir: &Path,
) {
    if !project_dir.join(".git").exists() {
        return;
    }
    let invocation = Invocation::new("git")
        .args(["config", "--global", "--add", "safe.directory"])
        .arg(project_dir.to_string_lossy())
        .captured();
    match runner.run(&invocation) {
        Ok(output) if output.is_success() => {}
        Ok(output) => sink.on_event(BootstrapEvent::CommandTolerated {
            command: invocation.to_string(),
            code: output.code,
            note: "could not register the project as a safe git directory".to_string(),
        }),
        Err(e) => sink.on_event(BootstrapEvent::CommandTolerated {
            command: invocation.to_string(),
            code: None,
            note: e.to_string(),
        }),
    }
}

fn compose(project: &ComposeProject, project_dir: &Path) -> Invocation {
    Invocation::new("docker")
        .args(["compose", "--project-directory"])
        .arg(project_dir.to_string_lossy())
        .arg("-f")
        .arg(project.file.to_string_lossy())
        .privileged()
}

/// `down` (tolerated) → `pull` → `up --build -d`.
pub fn recreate_stack(
    runner: &impl CommandRunner,
    sink: &impl BootstrapEventSink,
    project: &ComposeProject,
    project_dir: &Path,
) -> IndirectorResult<()> {
    let down = compose(project, project_dir).arg("down");
    sink.on_event(BootstrapEvent::CommandStarted {
        command: down.to_string(),
    });
    let output = runner.run(&down)?;
    if !output.is_success() {
        sink.on_event(BootstrapEvent::CommandTolerated {
            command: down.to_string(),
            code: output.code,
            note: "no running stack to tear down".to_string(),
        });
    }

    for invocation in [
        compose(project, project_dir).arg("pull"),
        compose(project, project_dir).args(["up", "--build", "-d"]),
    ] {
        sink.on_event(BootstrapEvent::CommandStarted {
            command: invocation.to_string(),
        });
        runner.run_checked(STEP, &invocation)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::OsRelease;
    use tempfile::tempdir;

    fn host() -> HostContext {
        HostContext {
            user: "ops".to_string(),
            home: PathBuf::from("/home/ops"),
            os_release: OsRelease::default(),
            is_root: false,
        }
    }

    #[test]
    fn vpn_profile_uses_project_datastores_owned_by_1000() {
        let stores = plan_datastores(
            Profile::Vpn,
            Path::new("/srv/stack"),
            &host(),
            &DatastoreConfig::default(),
        );
        assert_eq!(stores.len(), 2);
        assert_eq!(stores[0].path, PathBuf::from("/srv/stack/datastore/companion"));
        assert_eq!(stores[1].path, PathBuf::from("/srv/stack/datastore/tailscale"));
        assert!(stores.iter().all(|s| s.owner.spec() == "1000:1000"));
        assert_eq!(stores[1].mode_spec(), "700");
    }

    #[test]
    fn home_profile_uses_invoking_user() {
        let stores = plan_datastores(
            Profile::Home,
            Path::new("/srv/stack"),
            &host(),
            &DatastoreConfig::default(),
        );
        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0].path, PathBuf::from("/home/ops/.fcav/companion"));
        assert_eq!(stores[0].owner, Owner::User("ops".to_string()));
    }

    #[test]
    fn compose_file_lookup_follows_docker_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("docker-compose.yml"), "services: {}\n").unwrap();
        fs::write(dir.path().join("compose.yaml"), "services: {}\n").unwrap();

        let file = locate_compose_file(dir.path(), None).unwrap();
        assert_eq!(file, dir.path().join("compose.yaml"));
    }

    #[test]
    fn configured_compose_file_must_exist() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("compose.yaml"), "services: {}\n").unwrap();

        let err = locate_compose_file(dir.path(), Some("stack.yml")).unwrap_err();
        assert!(matches!(err, IndirectorError::ComposeFileMissing { .. }));
    }
}
