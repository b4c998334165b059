//! Host probing against the real machine

use std::fs;

use crate::domain::ports::HostFacts;

pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// HostFacts backed by the process environment, `PATH` and `/proc`
#[derive(Debug, Default)]
pub struct SystemHost;

impl HostFacts for SystemHost {
    fn os(&self) -> &str {
        std::env::consts::OS
    }

    fn env(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn has_program(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    fn os_release(&self) -> std::io::Result<String> {
        fs::read_to_string(OS_RELEASE_PATH)
    }

    fn effective_uid(&self) -> Option<u32> {
        let status = fs::read_to_string("/proc/self/status").ok()?;
        parse_effective_uid(&status)
    }
}

/// `Uid:` line of `/proc/<pid>/status` lists real, effective, saved, fs.
fn parse_effective_uid(status: &str) -> Option<u32> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("Uid:"))
        .and_then(|ids| ids.split_whitespace().nth(1))
        .and_then(|euid| euid.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_uid_is_second_field() {
        let status = "Name:\tindirector\nUid:\t1000\t0\t0\t0\nGid:\t1000\t1000\t1000\t1000\n";
        assert_eq!(parse_effective_uid(status), Some(0));
    }

    #[test]
    fn missing_uid_line() {
        assert_eq!(parse_effective_uid("Name:\tx\n"), None);
    }
}
