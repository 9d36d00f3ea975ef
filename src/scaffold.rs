//! Scaffolding for new protocol trees and work items.
//!
//! `init` lays out `.agentprotocol/` with an example item; `create` adds one
//! item folder. Both finish with a reindex so the README reflects the new
//! state immediately.

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;

use crate::config::Config;
use crate::id::{generate_id, now_rfc3339};
use crate::layout::Layout;
use crate::reindex::{run_reindex, ReindexOptions};
use crate::report::ReindexReporter;

const README_TEMPLATE: &str = include_str!("../assets/readme-template.md");
const TODO_TEMPLATE: &str = include_str!("../assets/todo-template.md");
const PLAN_TEMPLATE: &str = include_str!("../assets/plan-template.md");
const BUILD_TEMPLATE: &str = include_str!("../assets/build-template.md");

const EXAMPLE_SLUG: &str = "example";
const EXAMPLE_TITLE: &str = "Example";
const FALLBACK_SLUG: &str = "work";

/// Lowercase `value` and join its ASCII alphanumeric runs with single dashes.
/// Falls back to `work` when nothing remains.
pub fn slugify(value: &str) -> String {
    let lowered = value.to_lowercase();
    let slug = lowered
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Replace every `{{KEY}}` occurrence for each entry of `values`.
pub fn replace_placeholders(template: &str, values: &HashMap<&str, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in values {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

fn item_values(id: &str, title: &str, now: &str) -> HashMap<&'static str, String> {
    HashMap::from([
        ("ID", id.to_string()),
        ("TITLE", title.to_string()),
        ("RFC3339", now.to_string()),
    ])
}

fn render_plan(id: &str, title: &str, now: &str) -> String {
    replace_placeholders(PLAN_TEMPLATE, &item_values(id, title, now))
}

fn render_build(id: &str, title: &str, now: &str, with_plan: bool) -> String {
    let mut values = item_values(id, title, now);
    let plan_id_line = if with_plan {
        format!("plan_id: PLAN-{}", id)
    } else {
        String::new()
    };
    values.insert("PLAN_ID_LINE", plan_id_line);
    let rendered = replace_placeholders(BUILD_TEMPLATE, &values);
    if with_plan {
        rendered
    } else {
        // Drop the line left empty by PLAN_ID_LINE so the frontmatter stays contiguous
        rendered.replacen("\n\ncreated:", "\ncreated:", 1)
    }
}

/// What `init` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// The protocol directory was already there; nothing was touched.
    AlreadyInitialized,
    Created { example_item: String },
}

pub async fn init(
    layout: &Layout,
    config: &Config,
    reporter: &dyn ReindexReporter,
) -> Result<InitOutcome> {
    let protocol_dir = layout.protocol_dir();
    if protocol_dir.exists() {
        return Ok(InitOutcome::AlreadyInitialized);
    }

    create_dir(&layout.open_dir()).await?;
    create_dir(&layout.archive_dir()).await?;

    let id = generate_id();
    let now = now_rfc3339();
    let item_name = format!("{}-{}", id, EXAMPLE_SLUG);
    let item_dir = layout.open_dir().join(&item_name);
    create_dir(&item_dir).await?;

    let readme = replace_placeholders(README_TEMPLATE, &HashMap::from([("ID", id.clone())]));
    write(&layout.readme_path(), &readme).await?;
    write(&protocol_dir.join("TODO.md"), TODO_TEMPLATE).await?;
    write(&layout.plan_path(&item_dir), &render_plan(&id, EXAMPLE_TITLE, &now)).await?;
    write(
        &layout.build_path(&item_dir),
        &render_build(&id, EXAMPLE_TITLE, &now, true),
    )
    .await?;

    run_reindex(layout, config, ReindexOptions::default(), reporter).await?;

    Ok(InitOutcome::Created {
        example_item: item_name,
    })
}

/// Arguments for [`create`].
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub title: String,
    /// Also write a `plan.md`.
    pub plan: bool,
    /// Slug source overriding the title.
    pub slug: Option<String>,
}

/// Create a work item folder and return its name (`<id>-<slug>`).
pub async fn create(
    layout: &Layout,
    config: &Config,
    options: &CreateOptions,
    reporter: &dyn ReindexReporter,
) -> Result<String> {
    let title = options.title.trim();
    if title.is_empty() {
        bail!("A work item title is required");
    }

    let protocol_dir = layout.protocol_dir();
    if !protocol_dir.exists() {
        bail!(
            "{} not found. Run `agentproto init` first.",
            protocol_dir.display()
        );
    }
    create_dir(&layout.open_dir()).await?;

    let id = generate_id();
    let now = now_rfc3339();
    let slug = slugify(options.slug.as_deref().unwrap_or(title));
    let item_name = format!("{}-{}", id, slug);
    let item_dir = layout.open_dir().join(&item_name);
    if item_dir.exists() {
        bail!("Work item already exists: {}", item_name);
    }
    create_dir(&item_dir).await?;

    if options.plan {
        write(&layout.plan_path(&item_dir), &render_plan(&id, title, &now)).await?;
    }
    write(
        &layout.build_path(&item_dir),
        &render_build(&id, title, &now, options.plan),
    )
    .await?;

    run_reindex(layout, config, ReindexOptions::default(), reporter).await?;

    Ok(item_name)
}

async fn create_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

async fn write(path: &Path, content: &str) -> Result<()> {
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
