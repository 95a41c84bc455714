//! Create-if-absent file writes
//!
//! Never overwrites. An existing target is a skip, a failed write is an
//! error outcome; neither stops the run.

use std::fs;
use std::path::{Path, PathBuf};

use crate::report::{Action, RunReport};

pub struct FileWriter {
    root: PathBuf,
    dry_run: bool,
}

impl FileWriter {
    pub fn new(root: &Path, dry_run: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            dry_run,
        }
    }

    /// Write `content` to `rel_path` under the root unless it already exists
    pub fn write(&self, rel_path: &Path, content: &str, report: &mut RunReport) {
        let target = self.root.join(rel_path);

        if target.exists() {
            report.record(Action::Skip, rel_path, Some("already exists".to_string()));
            return;
        }

        if self.dry_run {
            report.record(Action::Create, rel_path, Some("dry run".to_string()));
            return;
        }

        match Self::create(&target, content) {
            Ok(()) => report.record(Action::Create, rel_path, None),
            Err(e) => report.record(Action::Error, rel_path, Some(e.to_string())),
        }
    }

    fn create(target: &Path, content: &str) -> std::io::Result<()> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, content)
    }
}
