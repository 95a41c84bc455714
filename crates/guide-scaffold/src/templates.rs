//! Guide artifact templates
//!
//! Pure functions from a [`GuideScaffoldRequest`] to file contents. The date
//! is passed in so two runs of the same request differ only there.

use crate::request::GuideScaffoldRequest;

/// One entry of a guide's section list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionGroup {
    /// `None` for the leading start-page group
    pub label: Option<String>,
    pub ids: Vec<String>,
}

/// Declaration and spread lines folding a module into an aggregator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryLines {
    pub declaration: String,
    pub spread: String,
}

/// Escape a value for embedding in a literal delimited by `quote`
pub fn escape_literal(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

/// Single-quoted TypeScript literal
fn ts(value: &str) -> String {
    format!("'{}'", escape_literal(value, '\''))
}

/// Double-quoted front-matter value
fn fm(value: &str) -> String {
    format!("\"{}\"", escape_literal(value, '"'))
}

/// Text safe inside a `//` comment: no line terminator may end it early
fn line_comment(value: &str) -> String {
    value.replace(['\n', '\r', '\u{2028}', '\u{2029}'], " ")
}

/// Group pages into sections, start page first
pub fn section_groups(request: &GuideScaffoldRequest) -> Vec<SectionGroup> {
    let mut groups = vec![SectionGroup {
        label: None,
        ids: vec![request.start_page_id.clone()],
    }];

    for page in &request.pages {
        // Index 0 is the unlabeled start group and never matches
        match groups
            .iter_mut()
            .skip(1)
            .find(|g| g.label.as_deref() == Some(page.group.as_str()))
        {
            Some(group) => group.ids.push(page.page_id.clone()),
            None => groups.push(SectionGroup {
                label: Some(page.group.clone()),
                ids: vec![page.page_id.clone()],
            }),
        }
    }

    groups
}

/// Exported constant holding the section list
pub fn sections_const(request: &GuideScaffoldRequest) -> String {
    format!("{}_SECTIONS", request.prefix)
}

/// Exported manifest name, picked up by discovery through the `Manifest` suffix
pub fn manifest_name(request: &GuideScaffoldRequest) -> String {
    format!("{}Manifest", request.camel_name)
}

pub fn link_export(request: &GuideScaffoldRequest) -> String {
    format!("{}Links", request.camel_name)
}

pub fn glossary_export(request: &GuideScaffoldRequest) -> String {
    format!("{}Terms", request.camel_name)
}

/// The guide's data module: sections, optional start page data and manifest
pub fn data_module(request: &GuideScaffoldRequest, today: &str) -> String {
    let sections = sections_const(request);

    let mut out = String::new();
    out.push_str(&format!(
        "// Data for the {} guide. Generated by guide-scaffold on {}.\n",
        line_comment(&request.title),
        today
    ));
    out.push_str("import type { GuideManifest, SectionGroup } from '../types';\n\n");

    out.push_str(&format!("export const {sections}: SectionGroup[] = [\n"));
    for group in section_groups(request) {
        let label = match &group.label {
            Some(label) => ts(label),
            None => "null".to_string(),
        };
        let ids: Vec<String> = group.ids.iter().map(|id| ts(id)).collect();
        out.push_str(&format!("  {{ label: {}, ids: [{}] }},\n", label, ids.join(", ")));
    }
    out.push_str("];\n\n");

    if request.single_page {
        out.push_str(&format!(
            r#"export const {prefix}_START_PAGE = {{
  id: {id},
  title: {title},
  description: {description},
}};

"#,
            prefix = request.prefix,
            id = ts(&request.start_page_id),
            title = ts(&request.title),
            description = ts(&request.description),
        ));
    }

    out.push_str(&format!(
        r#"export const {manifest}: GuideManifest = {{
  id: {id},
  icon: {icon},
  title: {title},
  startPageId: {start},
  description: {description},
  dateCreated: {today},
  dateModified: {today},
  sections: {sections},
}};
"#,
        manifest = manifest_name(request),
        id = ts(&request.id),
        icon = ts(&request.icon),
        title = ts(&request.title),
        start = ts(&request.start_page_id),
        description = ts(&request.description),
        today = ts(today),
        sections = sections,
    ));

    out
}

fn front_matter(fields: &[(&str, &str)]) -> String {
    let mut out = String::from("---\n");
    for (key, value) in fields {
        out.push_str(&format!("{}: {}\n", key, fm(value)));
    }
    out.push_str("---\n");
    out
}

/// Start page content stub
pub fn start_page(request: &GuideScaffoldRequest) -> String {
    let header = front_matter(&[
        ("id", request.start_page_id.as_str()),
        ("title", request.title.as_str()),
        ("guide", request.id.as_str()),
    ]);

    if request.single_page {
        return format!(
            r#"{header}
# {icon} {title}

{description}

## Overview

_Summarize what the reader will accomplish._

## Steps

_Walk through the material in order._

## Reference

_Tables, commands and links worth keeping at hand._
"#,
            header = header,
            icon = request.icon,
            title = request.title,
            description = request.description,
        );
    }

    let mut contents = String::new();
    for group in section_groups(request).iter().skip(1) {
        contents.push_str(&format!("\n### {}\n\n", group.label.as_deref().unwrap_or_default()));
        for id in &group.ids {
            let title = request
                .pages
                .iter()
                .find(|p| &p.page_id == id)
                .map(|p| p.title.as_str())
                .unwrap_or(id.as_str());
            contents.push_str(&format!("- {} (`{}`)\n", title, id));
        }
    }
    if contents.is_empty() {
        contents.push_str("\n_No pages yet._\n");
    }

    format!(
        r#"{header}
# {icon} {title}

{description}

## Contents
{contents}"#,
        header = header,
        icon = request.icon,
        title = request.title,
        description = request.description,
        contents = contents,
    )
}

/// Content stub for one page
pub fn content_page(request: &GuideScaffoldRequest, page: &crate::pages::PageSpec) -> String {
    format!(
        r#"{header}
# {title}

_Write the {title} page._
"#,
        header = front_matter(&[
            ("id", page.page_id.as_str()),
            ("title", page.title.as_str()),
            ("guide", request.id.as_str()),
            ("group", page.group.as_str()),
        ]),
        title = page.title,
    )
}

/// Guide-level documentation stub
pub fn guide_doc(request: &GuideScaffoldRequest, today: &str) -> String {
    format!(
        r#"# {title}

Guide id: `{id}` | Created: {today}

## Audience and purpose

_Who is this guide for, and what should they be able to do afterwards?_

## Capabilities

| Capability | Page | Notes |
|------------|------|-------|

## Conventions

_Terminology, tone and linking conventions specific to this guide._
"#,
        title = request.title,
        id = request.id,
        today = today,
    )
}

/// Link registry stub for the guide
pub fn link_registry(request: &GuideScaffoldRequest) -> String {
    format!(
        r#"import type {{ ExternalLink }} from './types';

// External links for the {title} guide.
// Ids follow '{id}-<resource>' in kebab case and must be unique across every
// registry in this directory. Tag every entry with guide: '{id}'.
export const {export}: ExternalLink[] = [];
"#,
        title = line_comment(&request.title),
        id = request.id,
        export = link_export(request),
    )
}

/// Glossary terms stub for the guide
pub fn glossary_terms(request: &GuideScaffoldRequest) -> String {
    format!(
        r#"import type {{ GlossaryTerm }} from './types';

// Glossary terms for the {title} guide.
// Entry shape: {{ term, definition, guide: '{id}', seeAlso?: string[] }}
export const {export}: GlossaryTerm[] = [];
"#,
        title = line_comment(&request.title),
        id = request.id,
        export = glossary_export(request),
    )
}

fn registry_lines(export: &str, module: &str) -> RegistryLines {
    RegistryLines {
        declaration: format!("import {{ {} }} from {};", export, ts(module)),
        spread: format!("  ...{},", export),
    }
}

/// Lines for the link aggregator; `module` is the import specifier
pub fn link_registry_lines(request: &GuideScaffoldRequest, module: &str) -> RegistryLines {
    registry_lines(&link_export(request), module)
}

/// Lines for the glossary aggregator; `module` is the import specifier
pub fn glossary_registry_lines(request: &GuideScaffoldRequest, module: &str) -> RegistryLines {
    registry_lines(&glossary_export(request), module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::parse_flags;
    use crate::pages::PageSpec;

    fn request(extra: &[&str]) -> GuideScaffoldRequest {
        let mut tokens = vec![
            "--id", "kb", "--title", "Keyboards", "--icon", "K", "--desc", "All about keys",
            "--prefix", "kb", "--camel", "keyboards", "--start", "s0",
        ];
        tokens.extend_from_slice(extra);
        GuideScaffoldRequest::from_flags(&parse_flags(&tokens)).unwrap()
    }

    #[test]
    fn test_section_grouping_order() {
        let req = request(&["--pages", "A:p1:T1,B:p2:T2,A:p3:T3"]);
        assert_eq!(
            section_groups(&req),
            vec![
                SectionGroup { label: None, ids: vec!["s0".into()] },
                SectionGroup { label: Some("A".into()), ids: vec!["p1".into(), "p3".into()] },
                SectionGroup { label: Some("B".into()), ids: vec!["p2".into()] },
            ]
        );
    }

    #[test]
    fn test_start_group_never_merged() {
        let mut req = request(&[]);
        req.pages = vec![PageSpec::new("Intro", "s0", "Same id")];
        let groups = section_groups(&req);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].ids, vec!["s0".to_string()]);
        assert_eq!(groups[1].label.as_deref(), Some("Intro"));
    }

    #[test]
    fn test_escape_literal() {
        assert_eq!(escape_literal("Rust's guide", '\''), "Rust\\'s guide");
        assert_eq!(escape_literal("say \"hi\"", '"'), "say \\\"hi\\\"");
        assert_eq!(escape_literal("a\\b", '\''), "a\\\\b");
        assert_eq!(escape_literal("it's", '"'), "it's");
    }

    #[test]
    fn test_apostrophe_title_is_escaped() {
        let mut req = request(&[]);
        req.title = "Maker's Guide".into();
        let data = data_module(&req, "2026-01-02");
        assert!(data.contains("title: 'Maker\\'s Guide',"));
        assert!(!data.contains("'Maker's"));
    }

    #[test]
    fn test_title_line_breaks_stay_in_comments() {
        let mut req = request(&[]);
        req.title = "One\rTwo\u{2028}Three\u{2029}Four\nFive".into();

        for generated in [data_module(&req, "2026-01-02"), link_registry(&req), glossary_terms(&req)] {
            let comment = generated
                .lines()
                .find(|line| line.contains("One"))
                .unwrap();
            assert!(comment.starts_with("//"));
            assert!(comment.contains("One Two Three Four Five"));
        }
    }

    #[test]
    fn test_data_module_contents() {
        let req = request(&["--pages", "A:p1:T1"]);
        let data = data_module(&req, "2026-01-02");

        assert!(data.contains("export const KB_SECTIONS: SectionGroup[] = ["));
        assert!(data.contains("  { label: null, ids: ['s0'] },"));
        assert!(data.contains("  { label: 'A', ids: ['p1'] },"));
        assert!(data.contains("export const keyboardsManifest: GuideManifest = {"));
        assert!(data.contains("dateCreated: '2026-01-02',"));
        assert!(data.contains("sections: KB_SECTIONS,"));
        assert!(!data.contains("KB_START_PAGE"));
    }

    #[test]
    fn test_single_page_adds_start_page_data() {
        let req = request(&["--single-page"]);
        let data = data_module(&req, "2026-01-02");
        assert!(data.contains("export const KB_START_PAGE = {"));

        let page = start_page(&req);
        assert!(page.contains("## Steps"));
        assert!(!page.contains("## Contents"));
    }

    #[test]
    fn test_multi_page_start_lists_sections() {
        let req = request(&["--pages", "Basics:p1:First Page,Basics:p2:Second"]);
        let page = start_page(&req);
        assert!(page.starts_with("---\nid: \"s0\"\n"));
        assert!(page.contains("### Basics"));
        assert!(page.contains("- First Page (`p1`)"));
        assert!(page.contains("- Second (`p2`)"));
    }

    #[test]
    fn test_content_page_front_matter() {
        let req = request(&[]);
        let page = PageSpec::new("Ops", "deploy", "Deploy \"safely\"");
        let stub = content_page(&req, &page);
        assert!(stub.contains("id: \"deploy\"\n"));
        assert!(stub.contains("title: \"Deploy \\\"safely\\\"\"\n"));
        assert!(stub.contains("guide: \"kb\"\n"));
        assert!(stub.contains("group: \"Ops\"\n"));
    }

    #[test]
    fn test_registry_stubs() {
        let req = request(&[]);
        assert!(link_registry(&req).contains("export const keyboardsLinks: ExternalLink[] = [];"));
        assert!(glossary_terms(&req).contains("export const keyboardsTerms: GlossaryTerm[] = [];"));
        assert!(guide_doc(&req, "2026-01-02").contains("| Capability | Page | Notes |"));
    }

    #[test]
    fn test_registry_lines() {
        let req = request(&[]);
        let lines = link_registry_lines(&req, "./keyboardsLinks");
        assert_eq!(lines.declaration, "import { keyboardsLinks } from './keyboardsLinks';");
        assert_eq!(lines.spread, "  ...keyboardsLinks,");
    }
}
