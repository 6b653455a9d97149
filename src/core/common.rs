use std::fmt::Display;
use std::num::NonZeroUsize;

use clap::ValueEnum;
use serde_derive::{Deserialize, Serialize};

use crate::core::konst::{
    CURRENT_DIR, LOGFILE_NAME, LOGGING_JSON, LOGGING_QUIET, LOOKUP_PARALLELISM, LOOKUP_TIMEOUT,
};

#[derive(ValueEnum, Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    #[default]
    System,
    Hickory,
}

impl Display for ResolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolverKind::System => write!(f, "system"),
            ResolverKind::Hickory => write!(f, "hickory"),
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LookupOptions {
    /// Concurrent lookups. 0 uses the number of available processing units.
    pub parallelism: usize,
    /// Per lookup deadline in milliseconds.
    pub timeout: u64,
    pub resolver: ResolverKind,
    /// Nameserver socket address used by the hickory resolver.
    pub nameserver: Option<String>,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            parallelism: LOOKUP_PARALLELISM,
            timeout: LOOKUP_TIMEOUT,
            resolver: ResolverKind::default(),
            nameserver: None,
        }
    }
}

impl LookupOptions {
    /// Resolve the configured parallelism to a usable worker count.
    pub fn workers(&self) -> usize {
        match self.parallelism {
            0 => default_parallelism(),
            n => n,
        }
    }
}

/// Number of available processing units, 1 if it cannot be determined.
pub fn default_parallelism() -> usize {
    std::thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1)
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingOptions {
    pub dir: String,
    pub file: String,
    pub json: bool,
    pub quiet: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            dir: CURRENT_DIR.to_owned(),
            file: LOGFILE_NAME.to_owned(),
            json: LOGGING_JSON,
            quiet: LOGGING_QUIET,
        }
    }
}
