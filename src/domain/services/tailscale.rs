//! Tailscale login detection
//!
//! Pure text matching over `tailscale status` / `tailscale up` output.

/// Every interactive login URL starts with this.
pub const LOGIN_URL_PREFIX: &str = "https://login.tailscale.com";

/// Marker `tailscale status` prints for an authenticated node.
pub const LOGGED_IN_MARKER: &str = "Logged in as";

/// Terminal state of the post-deploy Tailscale login
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TailscaleState {
    /// The `vpn` container is not running; nothing was attempted
    NotRunning,
    /// The node is already authenticated
    LoggedIn,
    /// The operator has to open `url` to finish the login
    AwaitingAuth { url: String },
    /// `tailscale up` printed something without a login URL
    UnexpectedOutput { output: String },
}

/// True when status output shows an authenticated node.
pub fn is_logged_in(status_output: &str) -> bool {
    status_output.contains(LOGGED_IN_MARKER)
}

/// Extract the login URL: from the prefix up to the first whitespace.
pub fn extract_login_url(output: &str) -> Option<&str> {
    let start = output.find(LOGIN_URL_PREFIX)?;
    let rest = &output[start..];
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Classify the output of `tailscale up`.
pub fn classify_login_output(output: &str) -> TailscaleState {
    match extract_login_url(output) {
        Some(url) => TailscaleState::AwaitingAuth {
            url: url.to_string(),
        },
        None => TailscaleState::UnexpectedOutput {
            output: output.trim().to_string(),
        },
    }
}
