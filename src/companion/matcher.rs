//! Variable name matchers for change handlers

use regex::Regex;

use crate::error::{IndirectorError, IndirectorResult};

/// How a change handler selects variable names
#[derive(Debug, Clone)]
pub enum Matcher {
    Variable(String),
    Prefix(String),
    Suffix(String),
    /// Anchored at the start of the name, not at the end
    Regex(Regex),
}

impl Matcher {
    pub fn variable(name: impl Into<String>) -> Self {
        Matcher::Variable(name.into())
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        Matcher::Prefix(prefix.into())
    }

    pub fn suffix(suffix: impl Into<String>) -> Self {
        Matcher::Suffix(suffix.into())
    }

    pub fn regex(pattern: &str) -> IndirectorResult<Self> {
        Regex::new(&format!("^(?:{})", pattern))
            .map(Matcher::Regex)
            .map_err(|e| IndirectorError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })
    }

    pub fn matches(&self, variable: &str) -> bool {
        match self {
            Matcher::Variable(name) => variable == name,
            Matcher::Prefix(prefix) => variable.starts_with(prefix.as_str()),
            Matcher::Suffix(suffix) => variable.ends_with(suffix.as_str()),
            Matcher::Regex(regex) => regex.is_match(variable),
        }
    }
}

/// A `--watch CONNECTION/PATTERN` argument
#[derive(Debug, Clone)]
pub struct WatchSpec {
    pub connection: String,
    pub matcher: Matcher,
}

/// Parse `CONNECTION/PATTERN` where PATTERN is `name`, `prefix*`, `*suffix`
/// or `re:<regex>`.
pub fn parse_watch(spec: &str) -> IndirectorResult<WatchSpec> {
    let invalid = |message: &str| IndirectorError::InvalidPattern {
        pattern: spec.to_string(),
        message: message.to_string(),
    };

    let (connection, pattern) = spec
        .split_once('/')
        .ok_or_else(|| invalid("expected CONNECTION/PATTERN"))?;
    let connection = connection.trim();
    if connection.is_empty() {
        return Err(invalid("connection name is empty"));
    }

    let matcher = if let Some(regex) = pattern.strip_prefix("re:") {
        Matcher::regex(regex)?
    } else if let Some(prefix) = pattern.strip_suffix('*') {
        Matcher::prefix(prefix)
    } else if let Some(suffix) = pattern.strip_prefix('*') {
        Matcher::suffix(suffix)
    } else if pattern.is_empty() {
        return Err(invalid("pattern is empty"));
    } else {
        Matcher::variable(pattern)
    };

    Ok(WatchSpec {
        connection: connection.to_string(),
        matcher,
    })
}
