//! Test fixtures - hosts, Compose files and project directories.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use indirector::domain::value_objects::OsRelease;
use indirector::HostContext;

/// Stack with the Companion service and the Tailscale sidecar
pub const VPN_COMPOSE: &str = r#"
services:
  companion:
    image: ghcr.io/bitfocus/companion/companion:latest
    volumes:
      - ./datastore/companion:/companion
  vpn:
    image: tailscale/tailscale:stable
    container_name: vpn
    volumes:
      - ./datastore/tailscale:/var/lib/tailscale
"#;

/// Companion only, no sidecar
pub const HOME_COMPOSE: &str = r#"
services:
  companion:
    image: ghcr.io/bitfocus/companion/companion:latest
"#;

pub const UBUNTU_JAMMY: &str = "NAME=\"Ubuntu\"\nID=ubuntu\nID_LIKE=debian\nVERSION_CODENAME=jammy\nUBUNTU_CODENAME=jammy\n";

/// Non-root `ops` user whose home is `home`.
pub fn host(home: &Path) -> HostContext {
    HostContext {
        user: "ops".to_string(),
        home: home.to_path_buf(),
        os_release: OsRelease::parse(UBUNTU_JAMMY),
        is_root: false,
    }
}

/// Temp project directory holding `docker-compose.yml` with `content`.
pub fn project_with(content: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("docker-compose.yml"), content).unwrap();
    dir
}

pub fn vpn_project() -> TempDir {
    project_with(VPN_COMPOSE)
}
