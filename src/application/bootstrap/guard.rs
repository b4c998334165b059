//! Environment/privilege guard
//!
//! Fails fast with a descriptive message when the host cannot run the
//! bootstrap. Nothing here is retried.

use std::path::PathBuf;

use crate::domain::ports::HostFacts;
use crate::domain::value_objects::OsRelease;
use crate::error::{IndirectorError, IndirectorResult};
use crate::infrastructure::OS_RELEASE_PATH;

/// Executables every run needs before anything is installed
pub const REQUIRED_PROGRAMS: [&str; 3] = ["apt-get", "dpkg", "curl"];

/// Facts about the host gathered by the guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostContext {
    /// Invoking user; `SUDO_USER` when running under `sudo`
    pub user: String,
    pub home: PathBuf,
    pub os_release: OsRelease,
    pub is_root: bool,
}

/// Verify the environment and collect the host context.
pub fn check_environment(facts: &impl HostFacts) -> IndirectorResult<HostContext> {
    if facts.os() != "linux" {
        return Err(environment(format!(
            "unsupported operating system '{}'; a Debian or Ubuntu host is required",
            facts.os()
        )));
    }

    let home = non_empty(facts.env("HOME"))
        .map(PathBuf::from)
        .ok_or_else(|| environment("HOME is not set"))?;

    let is_root = facts.effective_uid() == Some(0);
    let user = if is_root {
        non_empty(facts.env("SUDO_USER")).or_else(|| non_empty(facts.env("USER")))
    } else {
        non_empty(facts.env("USER"))
    }
    .ok_or_else(|| environment("USER is not set"))?;

    let missing: Vec<&str> = REQUIRED_PROGRAMS
        .iter()
        .copied()
        .chain((!is_root).then_some("sudo"))
        .filter(|program| !facts.has_program(program))
        .collect();
    if !missing.is_empty() {
        return Err(environment(format!(
            "required programs not found on PATH: {}",
            missing.join(", ")
        )));
    }

    let os_release = facts
        .os_release()
        .map(|content| OsRelease::parse(&content))
        .map_err(|e| environment(format!("cannot read {}: {}", OS_RELEASE_PATH, e)))?;

    Ok(HostContext {
        user,
        home,
        os_release,
        is_root,
    })
}

fn environment(reason: impl Into<String>) -> IndirectorError {
    IndirectorError::Environment {
        reason: reason.into(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
