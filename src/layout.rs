//! Paths and directory listings for a protocol tree.
//!
//! All locations derive from an explicit workspace root; nothing here reads
//! the process working directory.

use anyhow::Result;
use globset::GlobSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{Config, LayoutConfig, PROTOCOL_DIR_NAME};
use crate::models::WorkItem;

/// Resolved locations of one `.agentprotocol/` tree.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
    names: LayoutConfig,
}

impl Layout {
    /// `root` is the workspace directory that contains `.agentprotocol/`.
    pub fn new(root: impl Into<PathBuf>, config: &Config) -> Self {
        Self {
            root: root.into(),
            names: config.layout.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn protocol_dir(&self) -> PathBuf {
        self.root.join(PROTOCOL_DIR_NAME)
    }

    pub fn readme_path(&self) -> PathBuf {
        self.protocol_dir().join(&self.names.readme)
    }

    pub fn open_dir(&self) -> PathBuf {
        self.protocol_dir().join(&self.names.open_dir)
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.protocol_dir().join(&self.names.archive_dir)
    }

    pub fn open_dir_name(&self) -> &str {
        &self.names.open_dir
    }

    pub fn build_dir_name(&self) -> &str {
        &self.names.build_dir
    }

    pub fn plan_path(&self, item_dir: &Path) -> PathBuf {
        item_dir.join(&self.names.plan_file)
    }

    pub fn build_path(&self, item_dir: &Path) -> PathBuf {
        item_dir.join(&self.names.build_file)
    }

    pub fn build_dir(&self, item_dir: &Path) -> PathBuf {
        item_dir.join(&self.names.build_dir)
    }

    pub fn build_file_matcher(&self) -> Result<GlobSet> {
        self.names.build_file_matcher()
    }

    /// Names of the immediate subdirectories of `open/`, sorted by byte
    /// order. A missing `open/` directory has no items.
    pub fn list_item_dirs(&self) -> Result<Vec<String>> {
        let open_dir = self.open_dir();
        if !open_dir.is_dir() {
            return Ok(Vec::new());
        }
        list_children(&open_dir, |entry| entry.file_type().is_dir())
    }

    /// File names in `dir` matching `matcher`, sorted by byte order, so
    /// `Z.md` lists before `a.md` (no locale-aware collation).
    pub fn list_build_files(&self, dir: &Path, matcher: &GlobSet) -> Result<Vec<String>> {
        list_children(dir, |entry| {
            entry.file_type().is_file() && matcher.is_match(entry.file_name())
        })
    }

    /// Load an item folder, tolerating a missing plan or build document.
    pub async fn load_item(&self, dir_name: &str) -> WorkItem {
        let dir = self.open_dir().join(dir_name);
        let plan = read_file_if_exists(&self.plan_path(&dir)).await;
        let build = read_file_if_exists(&self.build_path(&dir)).await;
        WorkItem {
            dir_name: dir_name.to_string(),
            dir,
            plan,
            build,
        }
    }
}

fn list_children(dir: &Path, keep: impl Fn(&walkdir::DirEntry) -> bool) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let walker = WalkDir::new(dir).min_depth(1).max_depth(1);
    for entry in walker {
        let entry = entry?;
        if !keep(&entry) {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().to_string());
    }
    // Sort for deterministic ordering
    names.sort();
    Ok(names)
}

/// Contents of `path` with invalid UTF-8 replaced, or `Ok(None)` when the
/// file does not exist. Other I/O errors are returned.
pub async fn read_document(path: &Path) -> std::io::Result<Option<String>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Like [`read_document`], treating any read error as absence.
pub async fn read_file_if_exists(path: &Path) -> Option<String> {
    read_document(path).await.ok().flatten()
}
