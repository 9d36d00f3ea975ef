//! Core data types shared by the extractor and the index rewriter.
//!
//! A work item is only ever read: the engine derives an [`ItemSummary`] from
//! it and renders that as an [`IndexRow`]. Nothing here is persisted between
//! runs.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Flat key/value preamble at the top of a document.
pub type Frontmatter = BTreeMap<String, String>;

/// A work item folder (`<id>-<slug>`) and the documents found in it.
#[derive(Debug, Clone)]
pub struct WorkItem {
    /// Folder name, e.g. `01JC3Z...-fix-login`.
    pub dir_name: String,
    pub dir: PathBuf,
    /// Contents of `plan.md`, when present and readable.
    pub plan: Option<String>,
    /// Contents of `build.md`, when present and readable.
    pub build: Option<String>,
}

impl WorkItem {
    /// Text after the first `-` of the folder name, or the whole name when
    /// the name has no dash.
    pub fn slug(&self) -> &str {
        match self.dir_name.find('-') {
            Some(idx) => &self.dir_name[idx + 1..],
            None => &self.dir_name,
        }
    }
}

/// Everything the active work index shows about one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSummary {
    pub dir_name: String,
    pub title: String,
    pub plan_status: String,
    pub build_status: String,
    /// First line of the build context or plan summary; empty when neither exists.
    pub description: String,
    /// First open task, only populated when next actions are requested.
    pub next_action: Option<String>,
}

impl ItemSummary {
    /// Compose the unescaped description cell:
    /// `<title> (plan:<s>, build:<s>)[ - <description>][ - next: <action>]`.
    pub fn compose(&self) -> String {
        let mut out = format!(
            "{} (plan:{}, build:{})",
            self.title, self.plan_status, self.build_status
        );
        if !self.description.is_empty() {
            out.push_str(" - ");
            out.push_str(&self.description);
        }
        if let Some(next) = &self.next_action {
            out.push_str(" - next: ");
            out.push_str(next);
        }
        out
    }
}

/// One row of a generated `Path | Description` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    /// Path relative to the table's document, rendered as inline code.
    pub path: String,
    /// Already escaped for a table cell.
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> WorkItem {
        WorkItem {
            dir_name: name.to_string(),
            dir: PathBuf::from(name),
            plan: None,
            build: None,
        }
    }

    #[test]
    fn slug_is_text_after_first_dash() {
        assert_eq!(item("01ABC-fix-login-flow").slug(), "fix-login-flow");
        assert_eq!(item("nodash").slug(), "nodash");
        assert_eq!(item("01ABC-").slug(), "");
    }

    #[test]
    fn compose_includes_optional_parts() {
        let mut summary = ItemSummary {
            dir_name: "01-x".to_string(),
            title: "Fix login".to_string(),
            plan_status: "-".to_string(),
            build_status: "doing".to_string(),
            description: String::new(),
            next_action: None,
        };
        assert_eq!(summary.compose(), "Fix login (plan:-, build:doing)");

        summary.description = "Users get logged out".to_string();
        summary.next_action = Some("write test".to_string());
        assert_eq!(
            summary.compose(),
            "Fix login (plan:-, build:doing) - Users get logged out - next: write test"
        );
    }
}
