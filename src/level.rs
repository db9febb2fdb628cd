// SPDX-License-Identifier: MIT OR Apache-2.0

//! Severity levels and threshold resolution.

use crate::error::ScopelogError;
use std::fmt::Display;
use std::str::FromStr;

/// Name of the environment variable consulted when no explicit threshold is configured.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Ordered log importance.
///
/// The discriminants are the numeric values written into structured output.
/// [`Severity::Silent`] is only meaningful as a threshold; it suppresses everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    #[default]
    Debug = 10,
    Info = 20,
    Warn = 30,
    Error = 40,
    Fatal = 50,
    Silent = 100,
}

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
        Severity::Silent,
    ];

    /// The numeric value used in structured output.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// The case-sensitive configuration name, e.g. `"warn"`.
    pub const fn name(self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
            Severity::Silent => "silent",
        }
    }

    /// Upper-case label used by the pretty formatter.
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
            Severity::Silent => "SILENT",
        }
    }

    /**
    Resolves a threshold from an explicit setting and an environment fallback.

    This function is total: the explicit value wins when present, then the
    environment value if it names a severity exactly, and [`Severity::Debug`]
    otherwise.
    */
    pub fn resolve(explicit: Option<Severity>, env: Option<&str>) -> Severity {
        if let Some(level) = explicit {
            return level;
        }
        env.and_then(|name| name.parse().ok())
            .unwrap_or(Severity::Debug)
    }

    /// Like [`Severity::resolve`], but the explicit setting is a name that may not parse.
    pub fn resolve_name(explicit: Option<&str>, env: Option<&str>) -> Severity {
        match explicit {
            Some(name) => name.parse().unwrap_or(Severity::Debug),
            None => Severity::resolve(None, env),
        }
    }

    /// Resolves against the `LOG_LEVEL` environment variable of this process.
    pub fn from_env(explicit: Option<Severity>) -> Severity {
        let env = std::env::var(LOG_LEVEL_ENV).ok();
        Severity::resolve(explicit, env.as_deref())
    }
}

impl FromStr for Severity {
    type Err = ScopelogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|level| level.name() == s)
            .ok_or_else(|| ScopelogError::UnknownSeverity(s.to_string()))
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Severity> for u8 {
    fn from(level: Severity) -> u8 {
        level.as_u8()
    }
}
