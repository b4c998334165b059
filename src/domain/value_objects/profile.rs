//! Profile value object - which deployment target the bootstrap serves

use serde::{Deserialize, Serialize};

/// Deployment profile
///
/// Profiles differ in datastore layout and in whether a Tailscale sidecar
/// needs logging in. `a`/`b` are accepted as aliases for `vpn`/`home`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Project-local datastores plus the Tailscale `vpn` sidecar
    #[default]
    Vpn,
    /// Single datastore under `$HOME/.fcav`, no VPN
    Home,
}

impl Profile {
    pub const ALL: [Profile; 2] = [Profile::Vpn, Profile::Home];

    /// Whether the post-deploy Tailscale login runs for this profile
    pub fn runs_tailscale(&self) -> bool {
        matches!(self, Profile::Vpn)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Vpn => "vpn",
            Profile::Home => "home",
        }
    }

    pub fn parse(value: &str) -> Option<Profile> {
        match value.trim().to_lowercase().as_str() {
            "vpn" | "a" => Some(Profile::Vpn),
            "home" | "b" => Some(Profile::Home),
            _ => None,
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
