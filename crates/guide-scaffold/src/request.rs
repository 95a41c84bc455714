//! Scaffold request validation
//!
//! Builds the immutable [`GuideScaffoldRequest`] from the parsed flags.
//! Every missing required field is reported in one go.

use std::collections::BTreeSet;

use crate::args::FlagMap;
use crate::error::ScaffoldError;
use crate::pages::{parse_pages, PageSpec};

/// Required flags, in the order they are reported
pub const REQUIRED_FLAGS: &[&str] = &["id", "title", "icon", "desc", "prefix", "camel", "start"];

/// Everything needed to scaffold one guide
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideScaffoldRequest {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub description: String,
    /// Upper-case prefix for generated constants
    pub prefix: String,
    /// Base for generated file and module names
    pub camel_name: String,
    pub start_page_id: String,
    pub single_page: bool,
    pub pages: Vec<PageSpec>,
    /// Link ids to check against the existing registries
    pub check_links: BTreeSet<String>,
}

impl GuideScaffoldRequest {
    /// Validate the flags and build a request
    pub fn from_flags(flags: &FlagMap) -> Result<Self, ScaffoldError> {
        let pages = match flags.text("pages") {
            Some(spec) => parse_pages(spec)?,
            None => Vec::new(),
        };

        let missing: Vec<String> = REQUIRED_FLAGS
            .iter()
            .filter(|name| flags.text(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ScaffoldError::MissingFields(missing));
        }

        // All present past this point
        let field = |name: &str| flags.text(name).unwrap_or_default().to_string();

        let request = Self {
            id: field("id"),
            title: field("title"),
            icon: field("icon"),
            description: field("desc"),
            prefix: field("prefix").to_uppercase(),
            camel_name: field("camel"),
            start_page_id: field("start"),
            single_page: flags.is_set("single-page"),
            pages,
            check_links: flags
                .text("check-links")
                .map(|list| {
                    list.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        };

        request.check_shapes()?;
        Ok(request)
    }

    fn check_shapes(&self) -> Result<(), ScaffoldError> {
        let mut problems = Vec::new();

        if !is_path_safe(&self.id) {
            problems.push(format!("id '{}' is not usable in a path", self.id));
        }
        if !is_identifier(&self.camel_name) {
            problems.push(format!("camel '{}' must be an identifier", self.camel_name));
        }
        if !is_identifier(&self.prefix) {
            problems.push(format!("prefix '{}' must be an identifier", self.prefix));
        }
        if !is_path_safe(&self.start_page_id) {
            problems.push(format!("start '{}' is not usable in a path", self.start_page_id));
        }
        for page in &self.pages {
            if !is_path_safe(&page.page_id) {
                problems.push(format!("page id '{}' is not usable in a path", page.page_id));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ScaffoldError::InvalidFields(problems))
        }
    }
}

/// Ids become file names; they must not escape their directory
fn is_path_safe(s: &str) -> bool {
    !s.is_empty() && !s.contains(['/', '\\']) && !s.contains("..")
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
