//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use serde::{Deserialize, Serialize};

use crate::domain::model::{NoMatchPolicy, ReplaceMode};
use crate::infra::fs::WriteOptions;

const DEFAULT_CONFIG: &str = include_str!("../../assets/default-config.toml");
const DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".textpatch/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default = "Defaults::unset")]
    pub defaults: Defaults,
    #[serde(default = "Write::unset")]
    pub write: Write,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default)]
    mode: Option<ReplaceMode>,
    #[serde(default)]
    on_no_match: Option<NoMatchPolicy>,
}

impl Defaults {
    /// A layer that sets nothing, used when a file omits `[defaults]`.
    fn unset() -> Self {
        Self {
            mode: None,
            on_no_match: None,
        }
    }

    pub fn mode(&self) -> ReplaceMode {
        self.mode.unwrap_or_default()
    }

    pub fn on_no_match(&self) -> NoMatchPolicy {
        self.on_no_match.unwrap_or_default()
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            mode: Some(ReplaceMode::default()),
            on_no_match: Some(NoMatchPolicy::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Write {
    #[serde(default)]
    atomic: Option<bool>,
    #[serde(default)]
    backup: Option<bool>,
    #[serde(default)]
    backup_suffix: Option<String>,
}

impl Write {
    /// A layer that sets nothing, used when a file omits `[write]`.
    fn unset() -> Self {
        Self {
            atomic: None,
            backup: None,
            backup_suffix: None,
        }
    }

    fn default_atomic() -> bool {
        true
    }

    fn default_backup() -> bool {
        false
    }

    fn default_backup_suffix() -> &'static str {
        "bak"
    }

    pub fn atomic(&self) -> bool {
        self.atomic.unwrap_or_else(Self::default_atomic)
    }

    pub fn backup(&self) -> bool {
        self.backup.unwrap_or_else(Self::default_backup)
    }

    pub fn backup_suffix(&self) -> String {
        self.backup_suffix
            .clone()
            .unwrap_or_else(|| Self::default_backup_suffix().to_owned())
    }

    /// Resolve into the options a file resource writes with.
    pub fn options(&self) -> WriteOptions {
        WriteOptions {
            atomic: self.atomic(),
            backup: self.backup(),
            backup_suffix: self.backup_suffix(),
        }
    }
}

impl Default for Write {
    fn default() -> Self {
        Self {
            atomic: Some(Self::default_atomic()),
            backup: Some(Self::default_backup()),
            backup_suffix: Some(Self::default_backup_suffix().to_owned()),
        }
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    mode: Option<String>,
    on_no_match: Option<String>,
    backup: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            mode: env::var("TEXTPATCH_MODE").ok(),
            on_no_match: env::var("TEXTPATCH_ON_NO_MATCH").ok(),
            backup: env::var("TEXTPATCH_BACKUP").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(mode: &str, on_no_match: &str, backup: &str) -> Self {
        Self {
            mode: Some(mode.to_owned()),
            on_no_match: Some(on_no_match.to_owned()),
            backup: Some(backup.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            tracing::debug!(path = %global_path.display(), "loading user config");
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            tracing::debug!(path = %workspace_path.display(), "loading workspace config");
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            defaults: merge_defaults(self.defaults, other.defaults),
            write: merge_write(self.write, other.write),
        }
    }
}

fn merge_defaults(mut base: Defaults, overlay: Defaults) -> Defaults {
    if let Some(value) = overlay.mode {
        base.mode = Some(value);
    }
    if let Some(value) = overlay.on_no_match {
        base.on_no_match = Some(value);
    }
    base
}

fn merge_write(mut base: Write, overlay: Write) -> Write {
    if let Some(value) = overlay.atomic {
        base.atomic = Some(value);
    }
    if let Some(value) = overlay.backup {
        base.backup = Some(value);
    }
    if let Some(value) = overlay.backup_suffix {
        base.backup_suffix = Some(value);
    }
    base
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("textpatch/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(raw) = env.mode {
        match raw.parse() {
            Ok(mode) => config.defaults.mode = Some(mode),
            Err(err) => tracing::warn!(error = %err, "ignoring TEXTPATCH_MODE"),
        }
    }
    if let Some(raw) = env.on_no_match {
        match raw.parse() {
            Ok(policy) => config.defaults.on_no_match = Some(policy),
            Err(err) => tracing::warn!(error = %err, "ignoring TEXTPATCH_ON_NO_MATCH"),
        }
    }
    if let Some(raw) = env.backup {
        match parse_flag(&raw) {
            Some(flag) => config.write.backup = Some(flag),
            None => tracing::warn!(value = %raw, "ignoring TEXTPATCH_BACKUP"),
        }
    }
    config
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
