//! Domain models for patch requests and their outcomes.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How many occurrences of the needle a patch rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum ReplaceMode {
    /// Only the first occurrence.
    First,
    /// Every non-overlapping occurrence.
    #[default]
    All,
}

impl ReplaceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplaceMode::First => "first",
            ReplaceMode::All => "all",
        }
    }
}

impl FromStr for ReplaceMode {
    type Err = ParseSettingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "first" | "once" => Ok(ReplaceMode::First),
            "all" | "every" => Ok(ReplaceMode::All),
            other => Err(ParseSettingError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for ReplaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when the needle does not occur in the target text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum NoMatchPolicy {
    /// Treat as success without comment.
    Ignore,
    /// Log a warning and leave the file unchanged.
    #[default]
    Warn,
    /// Fail the patch.
    Error,
}

impl NoMatchPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoMatchPolicy::Ignore => "ignore",
            NoMatchPolicy::Warn => "warn",
            NoMatchPolicy::Error => "error",
        }
    }
}

impl FromStr for NoMatchPolicy {
    type Err = ParseSettingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ignore" | "silent" => Ok(NoMatchPolicy::Ignore),
            "warn" | "warning" => Ok(NoMatchPolicy::Warn),
            "error" | "fail" => Ok(NoMatchPolicy::Error),
            other => Err(ParseSettingError::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for NoMatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a setting string does not name a known variant.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ParseSettingError {
    #[error("unknown replace mode '{0}' (expected 'first' or 'all')")]
    UnknownMode(String),
    #[error("unknown no-match policy '{0}' (expected 'ignore', 'warn' or 'error')")]
    UnknownPolicy(String),
}

/// A single literal substitution to perform on one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchSpec {
    pub source_path: PathBuf,
    pub needle: String,
    pub replacement: String,
    pub mode: ReplaceMode,
    pub on_no_match: NoMatchPolicy,
}

impl PatchSpec {
    /// Build a spec with default mode and no-match policy.
    pub fn new(
        source_path: impl Into<PathBuf>,
        needle: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            needle: needle.into(),
            replacement: replacement.into(),
            mode: ReplaceMode::default(),
            on_no_match: NoMatchPolicy::default(),
        }
    }

    pub fn with_mode(mut self, mode: ReplaceMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_no_match(mut self, policy: NoMatchPolicy) -> Self {
        self.on_no_match = policy;
        self
    }
}

/// What a patch did to its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchOutcome {
    pub path: PathBuf,
    pub occurrences: usize,
    pub written: bool,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<PathBuf>,
}

impl PatchOutcome {
    /// True only when at least one occurrence of the needle was replaced.
    pub fn replaced(&self) -> bool {
        self.occurrences > 0
    }
}
