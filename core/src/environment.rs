//! Server environment: scheme, host and port rendered into a base URL.
//!
//! # Design
//! The three parts are concatenated verbatim. No separator is inserted, so a
//! non-empty port must carry its own leading `:` and request paths their own
//! leading `/`. The environment can be deserialized from any serde source or
//! read from process environment variables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// URL scheme of an `Environment`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

impl Scheme {
    /// The scheme followed by `://`, ready to be prefixed to a host.
    pub fn prefix(self) -> &'static str {
        match self {
            Scheme::Http => "http://",
            Scheme::Https => "https://",
        }
    }
}

impl FromStr for Scheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            _ => Err(ConfigError::InvalidScheme(s.to_string())),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => write!(f, "http"),
            Scheme::Https => write!(f, "https"),
        }
    }
}

/// Where requests built from relative descriptor paths are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default)]
    scheme: Scheme,
    host: String,
    #[serde(default)]
    port: String,
}

impl Environment {
    pub fn new(scheme: Scheme, host: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            scheme,
            host: host.into(),
            port: port.into(),
        }
    }

    /// Read `{prefix}_SCHEME`, `{prefix}_HOST` and `{prefix}_PORT` from the
    /// process environment. Only the host is required.
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_lookup(prefix, |key| std::env::var(key).ok())
    }

    /// Like `from_env`, but resolves variables through `lookup`.
    pub fn from_lookup<F>(prefix: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host_key = format!("{prefix}_HOST");
        let host = lookup(&host_key).ok_or(ConfigError::MissingVar(host_key))?;
        let scheme = match lookup(&format!("{prefix}_SCHEME")) {
            Some(raw) => raw.parse()?,
            None => Scheme::default(),
        };
        let port = lookup(&format!("{prefix}_PORT")).unwrap_or_default();
        Ok(Self::new(scheme, host, port))
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn base_url(&self) -> String {
        format!("{}{}{}", self.scheme.prefix(), self.host, self.port)
    }
}
