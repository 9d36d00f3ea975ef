//! Optional TOML configuration.
//!
//! Read from `<root>/.agentprotocol/protocol.toml` unless `--config` points
//! elsewhere. Every key has a default matching the stock templates, so a
//! missing file is the same as an empty one.

use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::path::Path;

/// Name of the protocol directory under the workspace root.
pub const PROTOCOL_DIR_NAME: &str = ".agentprotocol";

/// Default config file name inside the protocol directory.
pub const CONFIG_FILE_NAME: &str = "protocol.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub headings: HeadingsConfig,
    #[serde(default)]
    pub reindex: ReindexConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LayoutConfig {
    #[serde(default = "default_open_dir")]
    pub open_dir: String,
    #[serde(default = "default_archive_dir")]
    pub archive_dir: String,
    #[serde(default = "default_readme")]
    pub readme: String,
    #[serde(default = "default_plan_file")]
    pub plan_file: String,
    #[serde(default = "default_build_file")]
    pub build_file: String,
    #[serde(default = "default_build_dir")]
    pub build_dir: String,
    /// Globs (matched against the file name) selecting build sub-files.
    #[serde(default = "default_build_file_globs")]
    pub build_file_globs: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            open_dir: default_open_dir(),
            archive_dir: default_archive_dir(),
            readme: default_readme(),
            plan_file: default_plan_file(),
            build_file: default_build_file(),
            build_dir: default_build_dir(),
            build_file_globs: default_build_file_globs(),
        }
    }
}

fn default_open_dir() -> String {
    "open".to_string()
}
fn default_archive_dir() -> String {
    "archive".to_string()
}
fn default_readme() -> String {
    "README.md".to_string()
}
fn default_plan_file() -> String {
    "plan.md".to_string()
}
fn default_build_file() -> String {
    "build.md".to_string()
}
fn default_build_dir() -> String {
    "build".to_string()
}
fn default_build_file_globs() -> Vec<String> {
    vec!["*.md".to_string()]
}

/// Exact heading lines the extractor looks for.
#[derive(Debug, Deserialize, Clone)]
pub struct HeadingsConfig {
    #[serde(default = "default_context_heading")]
    pub context: String,
    #[serde(default = "default_summary_heading")]
    pub summary: String,
    #[serde(default = "default_task_plan_heading")]
    pub task_plan: String,
    #[serde(default = "default_open_questions_heading")]
    pub open_questions: String,
}

impl Default for HeadingsConfig {
    fn default() -> Self {
        Self {
            context: default_context_heading(),
            summary: default_summary_heading(),
            task_plan: default_task_plan_heading(),
            open_questions: default_open_questions_heading(),
        }
    }
}

fn default_context_heading() -> String {
    "## Context".to_string()
}
fn default_summary_heading() -> String {
    "## Summary".to_string()
}
fn default_task_plan_heading() -> String {
    "## Task Plan".to_string()
}
fn default_open_questions_heading() -> String {
    "## Open Questions".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReindexConfig {
    /// Append the next open task to every row, as if `--next` were passed.
    #[serde(default)]
    pub include_next: bool,
}

impl LayoutConfig {
    pub fn build_file_matcher(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.build_file_globs {
            builder.add(
                Glob::new(pattern)
                    .with_context(|| format!("Invalid build file glob: {}", pattern))?,
            );
        }
        Ok(builder.build()?)
    }
}

/// Load `path` if it exists, otherwise fall back to defaults.
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::default())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate layout
    let layout = &config.layout;
    for (key, value) in [
        ("layout.open_dir", &layout.open_dir),
        ("layout.archive_dir", &layout.archive_dir),
        ("layout.readme", &layout.readme),
        ("layout.plan_file", &layout.plan_file),
        ("layout.build_file", &layout.build_file),
        ("layout.build_dir", &layout.build_dir),
    ] {
        if value.trim().is_empty() {
            bail!("{} must not be empty", key);
        }
        if value.contains('/') || value.contains('\\') {
            bail!("{} must be a plain name, got '{}'", key, value);
        }
    }
    if layout.build_file_globs.is_empty() {
        bail!("layout.build_file_globs must contain at least one pattern");
    }
    layout.build_file_matcher()?;

    // Validate headings
    let headings = &config.headings;
    for (key, value) in [
        ("headings.context", &headings.context),
        ("headings.summary", &headings.summary),
        ("headings.task_plan", &headings.task_plan),
        ("headings.open_questions", &headings.open_questions),
    ] {
        if !value.trim_start().starts_with('#') {
            bail!("{} must be a Markdown heading, got '{}'", key, value);
        }
    }

    Ok(config)
}
