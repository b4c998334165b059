//! Domain Services
//!
//! Stateless logic that interprets external command output.

pub mod tailscale;

pub use tailscale::{
    classify_login_output, extract_login_url, is_logged_in, TailscaleState, LOGGED_IN_MARKER,
    LOGIN_URL_PREFIX,
};
