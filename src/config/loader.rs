//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::{ConfigWarning, Profile};
use crate::error::{IndirectorError, IndirectorResult};

use super::env_validator::{levenshtein, EnvVarValidator};
use super::types::Config;

/// Project-level config file name
pub const PROJECT_CONFIG_FILE: &str = "indirector.toml";

/// Where the effective configuration came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> IndirectorResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| IndirectorError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Resolve the effective configuration.
///
/// Priority: explicit `--config` file, `<project>/indirector.toml`,
/// `~/.config/indirector/config.toml`, built-in defaults. Environment
/// overrides apply on top of whichever was found. An explicit file that is
/// missing or invalid is an error; the implicit ones are only used if they
/// exist.
pub fn resolve(explicit: Option<&Path>, project_dir: &Path) -> IndirectorResult<LoadedConfig> {
    let candidate = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => [
            Some(project_dir.join(PROJECT_CONFIG_FILE)),
            dirs::config_dir().map(|d| d.join("indirector").join("config.toml")),
        ]
        .into_iter()
        .flatten()
        .find(|p| p.is_file()),
    };

    let (config, warnings) = match &candidate {
        Some(path) => load_with_warnings(path)?,
        None => (Config::default(), Vec::new()),
    };

    Ok(LoadedConfig {
        config: with_env_overrides(config),
        source: candidate,
        warnings,
    })
}

/// Apply environment variable overrides (INDIRECTOR_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    with_env_overrides_from(config, |key| std::env::var(key).ok(), &mut std::io::stderr())
}

pub(crate) fn with_env_overrides_from(
    mut config: Config,
    get_env: impl Fn(&str) -> Option<String>,
    warnings: &mut impl std::io::Write,
) -> Config {
    if let Some(value) = get_env("INDIRECTOR_PROFILE") {
        let validator = EnvVarValidator::new("INDIRECTOR_PROFILE", &["vpn", "home"]);
        config.bootstrap.profile =
            validator.parse_with_writer(&value, Profile::parse, config.bootstrap.profile, warnings);
    }

    if let Some(url) = get_env("INDIRECTOR_COMPANION_URL") {
        if !url.trim().is_empty() {
            config.companion.url = url.trim().to_string();
        }
    }

    if let Some(path) = get_env("INDIRECTOR_SNIPPETS_PATH") {
        if !path.trim().is_empty() {
            config.companion.snippets_path = PathBuf::from(path.trim());
        }
    }

    if let Some(value) = get_env("INDIRECTOR_TAILSCALE_DELAY_SECS") {
        match value.trim().parse::<u64>() {
            Ok(secs) => config.tailscale.startup_delay_secs = secs,
            Err(_) => {
                let _ = writeln!(
                    warnings,
                    "Warning: Invalid INDIRECTOR_TAILSCALE_DELAY_SECS value '{}', expected whole seconds",
                    value
                );
            }
        }
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "bootstrap",
        "profile",
        "compose_file",
        "docker_packages",
        "datastore",
        "uid",
        "gid",
        "companion_mode",
        "tailscale_mode",
        "home_dir",
        "tailscale",
        "container",
        "startup_delay_secs",
        "up_timeout_secs",
        "companion",
        "url",
        "request_timeout_ms",
        "snippets_path",
        "snippet_delay_ms",
        "surface_id",
        "output",
        "color",
        "unicode",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}
