//! Configuration type definitions

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{parse_mode, Profile};

/// Bootstrap pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default)]
    pub profile: Profile,

    /// Compose file name; autodetected when unset
    #[serde(default)]
    pub compose_file: Option<String>,

    #[serde(default = "default_docker_packages")]
    pub docker_packages: Vec<String>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            compose_file: None,
            docker_packages: default_docker_packages(),
        }
    }
}

fn default_docker_packages() -> Vec<String> {
    [
        "docker-ce",
        "docker-ce-cli",
        "containerd.io",
        "docker-buildx-plugin",
        "docker-compose-plugin",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Datastore ownership and permissions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatastoreConfig {
    #[serde(default = "default_container_id")]
    pub uid: u32,

    #[serde(default = "default_container_id")]
    pub gid: u32,

    #[serde(default = "default_companion_mode")]
    pub companion_mode: String,

    #[serde(default = "default_tailscale_mode")]
    pub tailscale_mode: String,

    /// Directory under `$HOME` used by the `home` profile
    #[serde(default = "default_home_dir")]
    pub home_dir: String,
}

impl Default for DatastoreConfig {
    fn default() -> Self {
        Self {
            uid: default_container_id(),
            gid: default_container_id(),
            companion_mode: default_companion_mode(),
            tailscale_mode: default_tailscale_mode(),
            home_dir: default_home_dir(),
        }
    }
}

impl DatastoreConfig {
    pub fn companion_mode_bits(&self) -> u32 {
        parse_mode(&self.companion_mode).unwrap_or(0o775)
    }

    pub fn tailscale_mode_bits(&self) -> u32 {
        parse_mode(&self.tailscale_mode).unwrap_or(0o700)
    }
}

fn default_container_id() -> u32 {
    1000
}

fn default_companion_mode() -> String {
    "775".to_string()
}

fn default_tailscale_mode() -> String {
    "700".to_string()
}

fn default_home_dir() -> String {
    ".fcav".to_string()
}

/// Tailscale sidecar settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailscaleConfig {
    #[serde(default = "default_container")]
    pub container: String,

    /// Wait after `compose up` before probing the container
    #[serde(default = "default_startup_delay")]
    pub startup_delay_secs: u64,

    /// `tailscale up` blocks until login completes; stop reading after this
    #[serde(default = "default_up_timeout")]
    pub up_timeout_secs: u64,
}

impl Default for TailscaleConfig {
    fn default() -> Self {
        Self {
            container: default_container(),
            startup_delay_secs: default_startup_delay(),
            up_timeout_secs: default_up_timeout(),
        }
    }
}

impl TailscaleConfig {
    pub fn startup_delay(&self) -> Duration {
        Duration::from_secs(self.startup_delay_secs)
    }

    pub fn up_timeout(&self) -> Duration {
        Duration::from_secs(self.up_timeout_secs.max(1))
    }
}

fn default_container() -> String {
    "vpn".to_string()
}

fn default_startup_delay() -> u64 {
    5
}

fn default_up_timeout() -> u64 {
    15
}

/// Companion WebSocket client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanionConfig {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_snippets_path")]
    pub snippets_path: PathBuf,

    #[serde(default = "default_snippet_delay")]
    pub snippet_delay_ms: u64,

    #[serde(default = "default_surface_id")]
    pub surface_id: String,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            request_timeout_ms: default_request_timeout(),
            snippets_path: default_snippets_path(),
            snippet_delay_ms: default_snippet_delay(),
            surface_id: default_surface_id(),
        }
    }
}

fn default_url() -> String {
    "ws://127.0.0.1:16621".to_string()
}

fn default_request_timeout() -> u64 {
    1000
}

fn default_snippets_path() -> PathBuf {
    PathBuf::from(".vscode/companion.code-snippets")
}

fn default_snippet_delay() -> u64 {
    2000
}

fn default_surface_id() -> String {
    "indirector".to_string()
}

/// Color output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Terminal output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub color: ColorMode,

    #[serde(default = "default_true")]
    pub unicode: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::default(),
            unicode: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub bootstrap: BootstrapConfig,

    #[serde(default)]
    pub datastore: DatastoreConfig,

    #[serde(default)]
    pub tailscale: TailscaleConfig,

    #[serde(default)]
    pub companion: CompanionConfig,

    #[serde(default)]
    pub output: OutputConfig,
}
