//! Index rewriting.
//!
//! Regenerates the active work index in the protocol `README.md` and, for
//! every item with a `build/` folder, the build file index in that item's
//! `build.md`. Each target document is handled independently: a missing
//! document or missing markers skips that document only and is recorded in
//! the returned [`ReindexReport`].
//!
//! Items are visited one at a time in directory-name order. An item's build
//! index is written before the next item is read, and the README is written
//! last.

use anyhow::Result;
use globset::GlobSet;
use std::path::{Path, PathBuf};

use crate::config::{Config, HeadingsConfig};
use crate::extract::{
    escape_table_cell, first_heading_or_line, first_line_under_heading, first_unchecked_item,
    parse_frontmatter,
};
use crate::layout::{read_document, read_file_if_exists, Layout};
use crate::markers::{MarkerPair, SpliceError, ACTIVE_WORK_INDEX, BUILD_FILE_INDEX};
use crate::models::{IndexRow, ItemSummary, WorkItem};
use crate::report::ReindexReporter;
use crate::table;

const MISSING_STATUS: &str = "-";

#[derive(Debug, Clone, Copy, Default)]
pub struct ReindexOptions {
    /// Append each item's next open task to its row.
    pub include_next: bool,
}

/// Which generated index a [`TargetOutcome`] refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexTarget {
    ActiveWork,
    BuildFiles { item: String },
}

/// Why a target document was left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The document that should carry the index does not exist.
    TargetMissing,
    /// An item has a `build/` folder but no `build.md`.
    BuildDocumentMissing,
    Markers(SpliceError),
    Io(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    Updated { rows: usize },
    /// The regenerated document was byte-identical; nothing was written.
    Unchanged { rows: usize },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    pub target: IndexTarget,
    pub path: PathBuf,
    pub outcome: IndexOutcome,
}

impl TargetOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, IndexOutcome::Skipped(_))
    }
}

/// Result of one reindex run.
#[derive(Debug, Clone, Default)]
pub struct ReindexReport {
    /// One summary per open item, in row order.
    pub items: Vec<ItemSummary>,
    /// Build file indexes first (item order), then the active work index.
    pub outcomes: Vec<TargetOutcome>,
}

impl ReindexReport {
    pub fn active_index(&self) -> Option<&TargetOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.target == IndexTarget::ActiveWork)
    }

    pub fn build_index(&self, item: &str) -> Option<&TargetOutcome> {
        self.outcomes.iter().find(|o| match &o.target {
            IndexTarget::BuildFiles { item: name } => name == item,
            IndexTarget::ActiveWork => false,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = &TargetOutcome> {
        self.outcomes.iter().filter(|o| o.is_skipped())
    }
}

/// Derive an item's row content from its plan and build documents.
///
/// Title falls back from plan `title` to build `title` to the folder slug to
/// the folder name. The description comes from the build context, then the
/// plan summary.
pub fn summarize_item(
    item: &WorkItem,
    headings: &HeadingsConfig,
    include_next: bool,
) -> ItemSummary {
    let plan = item.plan.as_deref();
    let build = item.build.as_deref();
    let plan_fm = plan.map(parse_frontmatter).unwrap_or_default();
    let build_fm = build.map(parse_frontmatter).unwrap_or_default();

    let non_empty = |value: Option<&String>| value.filter(|v| !v.is_empty()).cloned();

    let title = non_empty(plan_fm.get("title"))
        .or_else(|| non_empty(build_fm.get("title")))
        .or_else(|| Some(item.slug().to_string()).filter(|s| !s.is_empty()))
        .unwrap_or_else(|| item.dir_name.clone());
    let plan_status =
        non_empty(plan_fm.get("status")).unwrap_or_else(|| MISSING_STATUS.to_string());
    let build_status =
        non_empty(build_fm.get("status")).unwrap_or_else(|| MISSING_STATUS.to_string());

    let description = build
        .and_then(|text| first_line_under_heading(text, &headings.context))
        .filter(|s| !s.is_empty())
        .or_else(|| plan.and_then(|text| first_line_under_heading(text, &headings.summary)))
        .unwrap_or_default();

    let next_action = if include_next {
        build
            .and_then(|text| first_unchecked_item(text, &headings.task_plan))
            .filter(|s| !s.is_empty())
            .or_else(|| {
                plan.and_then(|text| first_unchecked_item(text, &headings.open_questions))
            })
            .filter(|s| !s.is_empty())
    } else {
        None
    };

    ItemSummary {
        dir_name: item.dir_name.clone(),
        title,
        plan_status,
        build_status,
        description,
        next_action,
    }
}

/// Row for the active work index: `open/<dir>/` and the escaped description.
pub fn active_row(open_dir_name: &str, summary: &ItemSummary) -> IndexRow {
    IndexRow {
        path: format!("{}/{}/", open_dir_name, summary.dir_name),
        description: escape_table_cell(&summary.compose()),
    }
}

/// Regenerate every index under `layout`.
///
/// Returns an error only when the `open/` directory exists but cannot be
/// listed; every per-document problem is reported through `reporter` and
/// recorded in the report instead.
pub async fn run_reindex(
    layout: &Layout,
    config: &Config,
    options: ReindexOptions,
    reporter: &dyn ReindexReporter,
) -> Result<ReindexReport> {
    let include_next = options.include_next || config.reindex.include_next;
    let matcher = layout.build_file_matcher()?;
    let mut report = ReindexReport::default();
    let mut rows = Vec::new();

    for dir_name in layout.list_item_dirs()? {
        let item = layout.load_item(&dir_name).await;
        let summary = summarize_item(&item, &config.headings, include_next);
        rows.push(active_row(layout.open_dir_name(), &summary));
        report.items.push(summary);

        if let Some(outcome) = update_build_file_index(layout, &item, &matcher).await {
            reporter.report(&outcome);
            report.outcomes.push(outcome);
        }
    }

    let outcome = update_active_index(layout, &rows).await;
    reporter.report(&outcome);
    report.outcomes.push(outcome);

    Ok(report)
}

async fn update_active_index(layout: &Layout, rows: &[IndexRow]) -> TargetOutcome {
    let path = layout.readme_path();
    let outcome = match read_document(&path).await {
        Ok(Some(content)) => write_index(&path, &content, ACTIVE_WORK_INDEX, rows).await,
        Ok(None) => IndexOutcome::Skipped(SkipReason::TargetMissing),
        Err(e) => IndexOutcome::Skipped(SkipReason::Io(e.to_string())),
    };
    TargetOutcome {
        target: IndexTarget::ActiveWork,
        path,
        outcome,
    }
}

/// `None` when the item has no build folder.
async fn update_build_file_index(
    layout: &Layout,
    item: &WorkItem,
    matcher: &GlobSet,
) -> Option<TargetOutcome> {
    let build_dir = layout.build_dir(&item.dir);
    if !build_dir.is_dir() {
        return None;
    }

    let path = layout.build_path(&item.dir);
    let target = IndexTarget::BuildFiles {
        item: item.dir_name.clone(),
    };

    let Some(content) = item.build.as_deref() else {
        // Loading tolerates unreadable documents; tell those apart from absent ones here
        let reason = match read_document(&path).await {
            Err(e) => SkipReason::Io(e.to_string()),
            Ok(_) => SkipReason::BuildDocumentMissing,
        };
        return Some(TargetOutcome {
            target,
            path,
            outcome: IndexOutcome::Skipped(reason),
        });
    };

    let outcome = match build_file_rows(layout, &build_dir, matcher).await {
        Ok(rows) => write_index(&path, content, BUILD_FILE_INDEX, &rows).await,
        Err(e) => IndexOutcome::Skipped(SkipReason::Io(format!("{:#}", e))),
    };
    Some(TargetOutcome {
        target,
        path,
        outcome,
    })
}

async fn build_file_rows(
    layout: &Layout,
    build_dir: &Path,
    matcher: &GlobSet,
) -> Result<Vec<IndexRow>> {
    let mut rows = Vec::new();
    for file_name in layout.list_build_files(build_dir, matcher)? {
        let description = read_file_if_exists(&build_dir.join(&file_name))
            .await
            .and_then(|text| first_heading_or_line(&text))
            .map(|line| escape_table_cell(&line))
            .unwrap_or_default();
        rows.push(IndexRow {
            path: format!("{}/{}", layout.build_dir_name(), file_name),
            description,
        });
    }
    Ok(rows)
}

/// Splice `rows` into `content` and write it back only if it changed.
async fn write_index(
    path: &Path,
    content: &str,
    pair: MarkerPair,
    rows: &[IndexRow],
) -> IndexOutcome {
    let updated = match pair.splice(content, &table::render(rows)) {
        Ok(updated) => updated,
        Err(e) => return IndexOutcome::Skipped(SkipReason::Markers(e)),
    };

    if updated == content {
        return IndexOutcome::Unchanged { rows: rows.len() };
    }

    match tokio::fs::write(path, updated).await {
        Ok(()) => IndexOutcome::Updated { rows: rows.len() },
        Err(e) => IndexOutcome::Skipped(SkipReason::Io(e.to_string())),
    }
}
