//! `/etc/os-release` contents needed to register the Docker apt source

use std::collections::HashMap;

/// Parsed os-release key/value pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsRelease {
    fields: HashMap<String, String>,
}

impl OsRelease {
    /// Parse the `KEY=value` format, accepting single or double quotes.
    pub fn parse(content: &str) -> Self {
        let fields = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.trim().to_string(), unquote(value.trim())))
            .collect();
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Release codename; Ubuntu derivatives carry the upstream one in
    /// `UBUNTU_CODENAME`, which wins over `VERSION_CODENAME`.
    pub fn codename(&self) -> Option<&str> {
        self.get("UBUNTU_CODENAME")
            .or_else(|| self.get("VERSION_CODENAME"))
    }

    /// Distribution path segment on download.docker.com
    pub fn docker_distro(&self) -> &str {
        match self.get("ID") {
            Some("debian") => "debian",
            Some("ubuntu") => "ubuntu",
            _ => {
                let like = self.get("ID_LIKE").unwrap_or_default();
                if like.split_whitespace().any(|id| id == "ubuntu") || self.get("UBUNTU_CODENAME").is_some() {
                    "ubuntu"
                } else if like.split_whitespace().any(|id| id == "debian") {
                    "debian"
                } else {
                    "ubuntu"
                }
            }
        }
    }
}

fn unquote(value: &str) -> String {
    let stripped = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value);
    stripped.replace("\\\"", "\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINT: &str = r#"NAME="Linux Mint"
VERSION="22 (Wilma)"
ID=linuxmint
ID_LIKE="ubuntu debian"
VERSION_CODENAME=wilma
UBUNTU_CODENAME=noble
"#;

    const DEBIAN: &str = "PRETTY_NAME=\"Debian GNU/Linux 12 (bookworm)\"\nID=debian\nVERSION_CODENAME=bookworm\n";

    #[test]
    fn ubuntu_codename_wins_over_version_codename() {
        let release = OsRelease::parse(MINT);
        assert_eq!(release.codename(), Some("noble"));
        assert_eq!(release.docker_distro(), "ubuntu");
    }

    #[test]
    fn debian_uses_version_codename() {
        let release = OsRelease::parse(DEBIAN);
        assert_eq!(release.codename(), Some("bookworm"));
        assert_eq!(release.docker_distro(), "debian");
    }

    #[test]
    fn empty_values_count_as_missing() {
        let release = OsRelease::parse("ID=ubuntu\nUBUNTU_CODENAME=\nVERSION_CODENAME=jammy\n");
        assert_eq!(release.codename(), Some("jammy"));
    }

    #[test]
    fn comments_and_single_quotes_are_handled() {
        let release = OsRelease::parse("# comment\nID='ubuntu'\n");
        assert_eq!(release.get("ID"), Some("ubuntu"));
        assert_eq!(release.codename(), None);
    }
}
