//! Anchor-based registry patching
//!
//! The aggregator files are hand-edited, so they are never parsed. A new line
//! goes right after the last existing line of the same shape; a file with no
//! such line is left alone and reported. Re-applying a patch is a no-op.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::report::{Action, RunReport};
use crate::templates::RegistryLines;

/// Which aggregator a patch targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    Links,
    Glossary,
}

impl RegistryKind {
    /// Export-name suffix shared by every module folded into this aggregator
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Links => "Links",
            Self::Glossary => "Terms",
        }
    }

    /// `import { fooLinks } from './fooLinks';`
    pub fn declaration_pattern(&self) -> Regex {
        let pattern = format!(
            r#"^\s*import\s*\{{\s*\w+{}\s*\}}\s*from\s*['"][^'"]+['"]\s*;?\s*$"#,
            regex::escape(self.suffix())
        );
        Regex::new(&pattern).expect("declaration pattern is valid")
    }

    /// `  ...fooLinks,`
    pub fn spread_pattern(&self) -> Regex {
        let pattern = format!(r"^\s*\.\.\.\w+{}\s*,?\s*$", regex::escape(self.suffix()));
        Regex::new(&pattern).expect("spread pattern is valid")
    }
}

/// Outcome of one in-memory insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchResult {
    /// The exact line is already in the text
    AlreadyPresent,
    /// New text with the line spliced in
    Inserted(String),
    /// No line matched the anchor pattern
    NoAnchor,
}

/// Insert `line` after the last line matching `anchor`
///
/// Every other byte of `text` is kept as is, including line endings.
pub fn insert_after_last_match(text: &str, line: &str, anchor: &Regex) -> PatchResult {
    let eol = if text.contains("\r\n") { "\r\n" } else { "\n" };

    let mut offset = 0;
    let mut insert_at = None;

    for chunk in text.split_inclusive('\n') {
        let content = chunk.trim_end_matches('\n').trim_end_matches('\r');
        if content == line {
            return PatchResult::AlreadyPresent;
        }
        offset += chunk.len();
        if anchor.is_match(content) {
            insert_at = Some((offset, chunk.ends_with('\n')));
        }
    }

    let Some((at, terminated)) = insert_at else {
        return PatchResult::NoAnchor;
    };
    tracing::debug!(at, line, "inserting after anchor");

    let mut out = String::with_capacity(text.len() + line.len() + eol.len());
    out.push_str(&text[..at]);
    if terminated {
        out.push_str(line);
        out.push_str(eol);
    } else {
        // Anchor was the final, unterminated line
        out.push_str(eol);
        out.push_str(line);
    }
    out.push_str(&text[at..]);

    PatchResult::Inserted(out)
}

/// Both insertions for one aggregator file
#[derive(Debug, Clone)]
pub struct RegistryPatch {
    pub kind: RegistryKind,
    /// Aggregator path relative to the repository root
    pub path: PathBuf,
    pub lines: RegistryLines,
}

/// Apply a patch to its aggregator, recording one outcome per insertion
pub fn patch_registry(root: &Path, patch: &RegistryPatch, dry_run: bool, report: &mut RunReport) {
    let target = root.join(&patch.path);

    let original = match fs::read_to_string(&target) {
        Ok(text) => text,
        Err(e) => {
            for label in ["declaration", "spread"] {
                report.record(
                    Action::Error,
                    &patch.path,
                    Some(format!("{}: cannot read registry: {}", label, e)),
                );
            }
            return;
        }
    };

    let steps = [
        ("declaration", &patch.lines.declaration, patch.kind.declaration_pattern()),
        ("spread", &patch.lines.spread, patch.kind.spread_pattern()),
    ];

    let mut text = original.clone();
    let mut results = Vec::with_capacity(steps.len());
    for (label, line, anchor) in &steps {
        let result = insert_after_last_match(&text, line, anchor);
        if let PatchResult::Inserted(updated) = &result {
            text = updated.clone();
        }
        results.push((*label, result));
    }

    let write_error = if text != original && !dry_run {
        fs::write(&target, &text).err()
    } else {
        None
    };

    for (label, result) in results {
        match result {
            PatchResult::AlreadyPresent => {
                report.record(Action::Skip, &patch.path, Some(format!("{} already present", label)))
            }
            PatchResult::NoAnchor => report.record(
                Action::Error,
                &patch.path,
                Some(format!("no {} anchor for *{} entries", label, patch.kind.suffix())),
            ),
            PatchResult::Inserted(_) => match &write_error {
                Some(e) => report.record(
                    Action::Error,
                    &patch.path,
                    Some(format!("{}: write failed: {}", label, e)),
                ),
                None if dry_run => {
                    report.record(Action::Update, &patch.path, Some(format!("{} (dry run)", label)))
                }
                None => report.record(Action::Update, &patch.path, Some(label.to_string())),
            },
        }
    }
}
