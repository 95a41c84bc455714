//! Page list parsing
//!
//! `--pages` takes `group:pageId:title` entries separated by commas.
//! The title keeps any further colons.

use std::collections::HashSet;

use crate::error::ScaffoldError;

/// One content page of a guide
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSpec {
    pub group: String,
    pub page_id: String,
    pub title: String,
}

impl PageSpec {
    pub fn new(group: &str, page_id: &str, title: &str) -> Self {
        Self {
            group: group.to_string(),
            page_id: page_id.to_string(),
            title: title.to_string(),
        }
    }
}

/// Parse a single `group:pageId:title` entry
fn parse_entry(entry: &str) -> Result<PageSpec, ScaffoldError> {
    let parts: Vec<&str> = entry.split(':').collect();
    if parts.len() < 3 {
        return Err(ScaffoldError::MalformedPage(entry.to_string()));
    }

    let group = parts[0].trim();
    let page_id = parts[1].trim();
    let title = parts[2..].join(":");
    let title = title.trim();

    if group.is_empty() || page_id.is_empty() {
        return Err(ScaffoldError::MalformedPage(entry.to_string()));
    }

    Ok(PageSpec::new(group, page_id, title))
}

/// Parse the full comma-separated page list, failing on the first bad entry
pub fn parse_pages(spec: &str) -> Result<Vec<PageSpec>, ScaffoldError> {
    let mut pages = Vec::new();
    let mut seen = HashSet::new();

    for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let page = parse_entry(entry)?;
        if !seen.insert(page.page_id.clone()) {
            return Err(ScaffoldError::DuplicatePage(page.page_id));
        }
        pages.push(page);
    }

    Ok(pages)
}
