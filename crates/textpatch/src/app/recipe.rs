//! Recipe files listing patches to apply in order.
//!
//! ```toml
//! [[patch]]
//! path = "components/Home.tsx"
//! needle_file = "avatar-old.tsx"
//! replacement_file = "avatar-new.tsx"
//! on_no_match = "error"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};

use crate::domain::model::{NoMatchPolicy, PatchSpec, ReplaceMode};
use crate::infra::config::Config;

/// Parsed recipe document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Recipe {
    #[serde(default, rename = "patch")]
    pub patches: Vec<RecipeEntry>,
}

/// One patch as written in a recipe. Needle and replacement each come either
/// inline or from a file, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeEntry {
    pub path: PathBuf,
    #[serde(default)]
    pub needle: Option<String>,
    #[serde(default)]
    pub needle_file: Option<PathBuf>,
    #[serde(default)]
    pub replacement: Option<String>,
    #[serde(default)]
    pub replacement_file: Option<PathBuf>,
    #[serde(default)]
    pub mode: Option<ReplaceMode>,
    #[serde(default)]
    pub on_no_match: Option<NoMatchPolicy>,
}

/// Recipe serialization formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeFormat {
    Toml,
    Yaml,
}

impl RecipeFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("toml") => Ok(RecipeFormat::Toml),
            Some("yaml") | Some("yml") => Ok(RecipeFormat::Yaml),
            _ => Err(anyhow!(
                "unsupported recipe format for {} (expected .toml, .yaml or .yml)",
                path.display()
            )),
        }
    }
}

/// A recipe together with the directory its relative paths resolve against.
#[derive(Debug, Clone)]
pub struct LoadedRecipe {
    pub recipe: Recipe,
    pub base_dir: PathBuf,
}

impl Recipe {
    /// Load a recipe file, detecting its format from the extension.
    pub fn load(path: &Path) -> Result<LoadedRecipe> {
        let format = RecipeFormat::from_path(path)?;
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read recipe: {}", path.display()))?;
        let recipe = Self::parse(&data, format)
            .with_context(|| format!("invalid recipe: {}", path.display()))?;
        let base_dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        tracing::debug!(
            recipe = %path.display(),
            patches = recipe.patches.len(),
            "loaded recipe"
        );
        Ok(LoadedRecipe { recipe, base_dir })
    }

    pub fn parse(contents: &str, format: RecipeFormat) -> Result<Self> {
        match format {
            RecipeFormat::Toml => toml::from_str(contents).context("failed to parse TOML recipe"),
            RecipeFormat::Yaml => {
                serde_yaml::from_str(contents).context("failed to parse YAML recipe")
            }
        }
    }
}

impl LoadedRecipe {
    /// Resolve every entry into a [`PatchSpec`], filling unset settings from `config`.
    pub fn specs(&self, config: &Config) -> Result<Vec<PatchSpec>> {
        self.recipe
            .patches
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                entry
                    .to_spec(&self.base_dir, config)
                    .with_context(|| format!("recipe entry #{}", index + 1))
            })
            .collect()
    }
}

impl RecipeEntry {
    fn to_spec(&self, base_dir: &Path, config: &Config) -> Result<PatchSpec> {
        let needle = resolve_text(
            "needle",
            self.needle.as_deref(),
            self.needle_file.as_deref(),
            base_dir,
        )?;
        let replacement = resolve_text(
            "replacement",
            self.replacement.as_deref(),
            self.replacement_file.as_deref(),
            base_dir,
        )?;
        Ok(PatchSpec {
            source_path: base_dir.join(&self.path),
            needle,
            replacement,
            mode: self.mode.unwrap_or(config.defaults.mode()),
            on_no_match: self.on_no_match.unwrap_or(config.defaults.on_no_match()),
        })
    }
}

/// Pick literal text given either inline or as a file. File contents are
/// used verbatim, trailing newline included.
pub fn resolve_text(
    label: &str,
    inline: Option<&str>,
    file: Option<&Path>,
    base_dir: &Path,
) -> Result<String> {
    match (inline, file) {
        (Some(text), None) => Ok(text.to_owned()),
        (None, Some(file)) => {
            let path = base_dir.join(file);
            fs::read_to_string(&path)
                .with_context(|| format!("failed to read {label} file: {}", path.display()))
        }
        (Some(_), Some(_)) => bail!("{label} is given both inline and as {label}_file"),
        (None, None) => bail!("missing {label} (set {label} or {label}_file)"),
    }
}
