//! Datastore value object - a bind-mount directory with fixed ownership

use std::fmt;
use std::path::PathBuf;

/// Who owns a datastore directory after provisioning
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    /// Numeric uid/gid, the container user
    Ids { uid: u32, gid: u32 },
    /// Named user and its primary group, usually the invoking user
    User(String),
}

impl Owner {
    /// `chown` argument
    pub fn spec(&self) -> String {
        match self {
            Owner::Ids { uid, gid } => format!("{}:{}", uid, gid),
            Owner::User(name) => format!("{}:{}", name, name),
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec())
    }
}

/// A directory the Compose stack bind-mounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datastore {
    pub path: PathBuf,
    pub owner: Owner,
    /// Permission bits, e.g. `0o775`
    pub mode: u32,
}

impl Datastore {
    pub fn new(path: impl Into<PathBuf>, owner: Owner, mode: u32) -> Self {
        Self {
            path: path.into(),
            owner,
            mode,
        }
    }

    /// `chmod` argument in octal without a leading zero
    pub fn mode_spec(&self) -> String {
        format!("{:o}", self.mode)
    }
}

/// Parse an octal permission string such as `775` or `0o700`.
pub fn parse_mode(value: &str) -> Option<u32> {
    let digits = value.trim();
    let digits = digits
        .strip_prefix("0o")
        .or_else(|| digits.strip_prefix('0').filter(|d| !d.is_empty()))
        .unwrap_or(digits);
    if digits.is_empty() || digits.len() > 4 {
        return None;
    }
    u32::from_str_radix(digits, 8).ok()
}
