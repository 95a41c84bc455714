//! Duplicate link id detection
//!
//! Advisory only. Collects every `id: '...'` across the per-guide link
//! registries and sorts the requested ids into duplicates and fresh ones.

use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions of registry source files
const REGISTRY_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "mjs"];

/// An id that is already taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateLink {
    pub id: String,
    /// First registry file (by name) that declares it
    pub found_in: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkCheck {
    pub duplicates: Vec<DuplicateLink>,
    pub fresh: Vec<String>,
}

fn id_pattern() -> Regex {
    Regex::new(r#"\bid\s*:\s*(?:'([^']*)'|"([^"]*)")"#).expect("id pattern is valid")
}

/// All ids declared in a registry source
pub fn extract_ids(source: &str) -> Vec<String> {
    id_pattern()
        .captures_iter(source)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Registry files in `links_dir`, excluding the aggregator, sorted by name
fn registry_files(links_dir: &Path, aggregator: &Path) -> Vec<PathBuf> {
    WalkDir::new(links_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.as_path() != aggregator)
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| REGISTRY_EXTENSIONS.contains(&ext))
                .unwrap_or(false)
        })
        .collect()
}

fn read_registry(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable registry");
            None
        }
    }
}

/// First file declaring `id`
fn find_source(files: &[PathBuf], id: &str) -> Option<PathBuf> {
    files.iter().find_map(|path| {
        let text = read_registry(path)?;
        extract_ids(&text)
            .iter()
            .any(|known| known == id)
            .then(|| path.clone())
    })
}

/// Check `candidates` against every per-guide link registry
///
/// `aggregator` must be given on the same base as `links_dir` to be excluded.
/// The second pass over the files only runs for duplicates.
pub fn check_links(links_dir: &Path, aggregator: &Path, candidates: &BTreeSet<String>) -> LinkCheck {
    let files = registry_files(links_dir, aggregator);

    let mut known = HashSet::new();
    for path in &files {
        if let Some(text) = read_registry(path) {
            known.extend(extract_ids(&text));
        }
    }
    tracing::debug!(files = files.len(), ids = known.len(), "scanned link registries");

    let mut check = LinkCheck::default();
    for id in candidates {
        if known.contains(id) {
            check.duplicates.push(DuplicateLink {
                id: id.clone(),
                found_in: find_source(&files, id),
            });
        } else {
            check.fresh.push(id.clone());
        }
    }
    check
}
