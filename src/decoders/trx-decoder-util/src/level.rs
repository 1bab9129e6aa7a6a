// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Decoder log severity levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity of a decoder log event, most severe first.
///
/// The numeric values follow the syslog-style numbering used on the wire
/// (`fatal` = 1 … `trace` = 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Level {
    Fatal = 1,
    #[serde(alias = "crit")]
    Critical = 2,
    #[serde(alias = "err")]
    Error = 3,
    #[default]
    #[serde(alias = "warn")]
    Warning = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
    Trace = 8,
}

impl Level {
    pub const ALL: [Level; 8] = [
        Level::Fatal,
        Level::Critical,
        Level::Error,
        Level::Warning,
        Level::Notice,
        Level::Info,
        Level::Debug,
        Level::Trace,
    ];

    /// Numeric wire value, 1..=8.
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Severity rank: higher is more severe, verbose levels rank lowest.
    pub const fn severity_rank(self) -> u8 {
        9 - self as u8
    }

    /// Whether an event at `self` is forwarded by a decoder whose
    /// threshold is `threshold`. Exact matches pass.
    #[inline]
    pub const fn passes(self, threshold: Level) -> bool {
        self.severity_rank() >= threshold.severity_rank()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Fatal => "fatal",
            Level::Critical => "critical",
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Notice => "notice",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        }
    }

    pub const fn from_value(value: u8) -> Option<Level> {
        match value {
            1 => Some(Level::Fatal),
            2 => Some(Level::Critical),
            3 => Some(Level::Error),
            4 => Some(Level::Warning),
            5 => Some(Level::Notice),
            6 => Some(Level::Info),
            7 => Some(Level::Debug),
            8 => Some(Level::Trace),
            _ => None,
        }
    }

    /// Closest `tracing` level for forwarding into the process log.
    pub fn to_tracing(self) -> tracing::Level {
        match self {
            Level::Fatal | Level::Critical | Level::Error => tracing::Level::ERROR,
            Level::Warning => tracing::Level::WARN,
            Level::Notice | Level::Info => tracing::Level::INFO,
            Level::Debug => tracing::Level::DEBUG,
            Level::Trace => tracing::Level::TRACE,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    /// Accepts level names, the short aliases `crit`, `err`, `warn`, or the
    /// numeric value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(value) = s.parse::<u8>() {
            return Level::from_value(value).ok_or_else(|| format!("invalid level {}", value));
        }
        match s.to_ascii_lowercase().as_str() {
            "fatal" => Ok(Level::Fatal),
            "critical" | "crit" => Ok(Level::Critical),
            "error" | "err" => Ok(Level::Error),
            "warning" | "warn" => Ok(Level::Warning),
            "notice" => Ok(Level::Notice),
            "info" => Ok(Level::Info),
            "debug" => Ok(Level::Debug),
            "trace" => Ok(Level::Trace),
            other => Err(format!("unknown level '{}'", other)),
        }
    }
}
