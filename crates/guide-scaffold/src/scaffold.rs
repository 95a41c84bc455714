//! The scaffold pipeline
//!
//! Parse -> Validate -> Preflight -> Generate & Write -> Patch -> Link check.
//! Fatal errors come back as [`ScaffoldError`] before anything is written;
//! everything after preflight is recorded in the [`RunReport`] instead.

use std::path::{Component, Path, PathBuf};

use crate::args::{parse_flags, FlagMap};
use crate::error::ScaffoldError;
use crate::layout::Layout;
use crate::links::{check_links, LinkCheck};
use crate::registry::{patch_registry, RegistryKind, RegistryPatch};
use crate::report::RunReport;
use crate::request::GuideScaffoldRequest;
use crate::templates;
use crate::writer::FileWriter;

/// Tool-level options; only valid before the first guide flag
pub const TOOL_OPTIONS: &[&str] = &["root", "config", "dry-run"];

/// Settings for one invocation
#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    /// Repository root every layout path is relative to
    pub root: PathBuf,
    pub layout: Layout,
    pub dry_run: bool,
    /// Date stamped into generated artifacts (YYYY-MM-DD)
    pub today: String,
}

impl ScaffoldOptions {
    pub fn new(root: &Path, layout: Layout) -> Self {
        Self {
            root: root.to_path_buf(),
            layout,
            dry_run: false,
            today: chrono::Local::now().format("%Y-%m-%d").to_string(),
        }
    }
}

/// Result of a run that got past preflight
#[derive(Debug)]
pub struct ScaffoldRun {
    pub request: GuideScaffoldRequest,
    pub report: RunReport,
    /// Present when link ids were given
    pub links: Option<LinkCheck>,
}

impl ScaffoldRun {
    pub fn succeeded(&self) -> bool {
        !self.report.has_errors()
    }
}

/// Run the whole pipeline from raw guide flags
pub fn run<S: AsRef<str>>(tokens: &[S], options: &ScaffoldOptions) -> Result<ScaffoldRun, ScaffoldError> {
    let flags = parse_flags(tokens);
    reject_tool_options(&flags)?;
    let request = GuideScaffoldRequest::from_flags(&flags)?;
    scaffold(request, options)
}

/// Fail on tool options that ended up among the guide flags
fn reject_tool_options(flags: &FlagMap) -> Result<(), ScaffoldError> {
    match TOOL_OPTIONS.iter().find(|name| flags.is_set(name)) {
        Some(name) => Err(ScaffoldError::MisplacedOption(name.to_string())),
        None => Ok(()),
    }
}

/// Scaffold a validated request
pub fn scaffold(request: GuideScaffoldRequest, options: &ScaffoldOptions) -> Result<ScaffoldRun, ScaffoldError> {
    preflight(&request, options)?;

    let mut report = RunReport::new();

    let writer = FileWriter::new(&options.root, options.dry_run);
    for (path, content) in artifacts(&request, &options.layout, &options.today) {
        writer.write(&path, &content, &mut report);
    }

    for patch in registry_patches(&request, &options.layout) {
        patch_registry(&options.root, &patch, options.dry_run, &mut report);
    }

    let links = if request.check_links.is_empty() {
        None
    } else {
        Some(check_links(
            &options.root.join(options.layout.links_dir()),
            &options.root.join(options.layout.link_aggregator_path()),
            &request.check_links,
        ))
    };

    Ok(ScaffoldRun {
        request,
        report,
        links,
    })
}

/// Abort if the data module already exists
pub fn preflight(request: &GuideScaffoldRequest, options: &ScaffoldOptions) -> Result<(), ScaffoldError> {
    let data_module = options.layout.data_module_path(request);
    if options.root.join(&data_module).exists() {
        return Err(ScaffoldError::AlreadyScaffolded(data_module));
    }
    Ok(())
}

/// Every file to create, in write order
pub fn artifacts(request: &GuideScaffoldRequest, layout: &Layout, today: &str) -> Vec<(PathBuf, String)> {
    let mut files = vec![
        (layout.data_module_path(request), templates::data_module(request, today)),
        (
            layout.content_page_path(request, &request.start_page_id),
            templates::start_page(request),
        ),
    ];

    for page in &request.pages {
        files.push((
            layout.content_page_path(request, &page.page_id),
            templates::content_page(request, page),
        ));
    }

    files.push((layout.guide_doc_path(request), templates::guide_doc(request, today)));
    files.push((layout.link_registry_path(request), templates::link_registry(request)));
    files.push((layout.glossary_terms_path(request), templates::glossary_terms(request)));

    files
}

/// The two aggregator patches
pub fn registry_patches(request: &GuideScaffoldRequest, layout: &Layout) -> Vec<RegistryPatch> {
    let link_aggregator = layout.link_aggregator_path();
    let glossary_aggregator = layout.glossary_aggregator_path();

    let link_module = module_specifier(&link_aggregator, &layout.link_registry_path(request));
    let glossary_module = module_specifier(&glossary_aggregator, &layout.glossary_terms_path(request));

    vec![
        RegistryPatch {
            kind: RegistryKind::Links,
            lines: templates::link_registry_lines(request, &link_module),
            path: link_aggregator,
        },
        RegistryPatch {
            kind: RegistryKind::Glossary,
            lines: templates::glossary_registry_lines(request, &glossary_module),
            path: glossary_aggregator,
        },
    ]
}

/// Relative import specifier from an aggregator to a module, without extension
pub fn module_specifier(aggregator: &Path, module: &Path) -> String {
    let from: Vec<Component> = aggregator
        .parent()
        .map(|p| p.components().collect())
        .unwrap_or_default();
    let target = module.with_extension("");
    let to: Vec<Component> = target.components().collect();

    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<String> = Vec::new();
    if common == from.len() {
        parts.push(".".to_string());
    } else {
        parts.extend(std::iter::repeat("..".to_string()).take(from.len() - common));
    }
    parts.extend(
        to[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    parts.join("/")
}

/// Checklist printed after a run
pub fn next_steps(request: &GuideScaffoldRequest, layout: &Layout) -> Vec<String> {
    vec![
        format!(
            "Fill in the start page: {}",
            layout
                .content_page_path(request, &request.start_page_id)
                .display()
        ),
        format!("Review sections and manifest in {}", layout.data_module_path(request).display()),
        format!("Write the guide doc: {}", layout.guide_doc_path(request).display()),
        format!(
            "Add links to {} (ids '{}-<resource>')",
            layout.link_registry_path(request).display(),
            request.id
        ),
        format!("Add glossary terms to {}", layout.glossary_terms_path(request).display()),
        format!(
            "Check that {} is picked up by guide discovery",
            templates::manifest_name(request)
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Action;
    use std::fs;
    use tempfile::TempDir;

    const LINKS_INDEX: &str = "\
import { gitLinks } from './gitLinks';

export const allLinks = [
  ...gitLinks,
];
";

    const GLOSSARY_INDEX: &str = "\
import { gitTerms } from './gitTerms';

export const allTerms = [
  ...gitTerms,
];
";

    fn tokens() -> Vec<&'static str> {
        vec![
            "--id", "kb", "--title", "Keyboard's Guide", "--icon", "K", "--desc", "Keys",
            "--prefix", "kb", "--camel", "keyboards", "--start", "s0", "--pages",
            "A:p1:One,B:p2:Two,A:p3:Three",
        ]
    }

    fn repo() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let links = tmp.path().join("src/data/links");
        let glossary = tmp.path().join("src/data/glossary");
        fs::create_dir_all(&links).unwrap();
        fs::create_dir_all(&glossary).unwrap();
        fs::write(links.join("index.ts"), LINKS_INDEX).unwrap();
        fs::write(links.join("gitLinks.ts"), "export const gitLinks = [{ id: 'git-book' }];\n").unwrap();
        fs::write(glossary.join("index.ts"), GLOSSARY_INDEX).unwrap();
        tmp
    }

    fn options(root: &Path) -> ScaffoldOptions {
        let mut options = ScaffoldOptions::new(root, Layout::default());
        options.today = "2026-01-02".to_string();
        options
    }

    /// Every file under `root` with its bytes, sorted by path
    fn snapshot(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
        let mut files: Vec<_> = walkdir::WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| (e.path().to_path_buf(), fs::read(e.path()).unwrap()))
            .collect();
        files.sort();
        files
    }

    #[test]
    fn test_fresh_run_creates_everything() {
        let tmp = repo();
        let run = run(&tokens(), &options(tmp.path())).unwrap();

        // data module, start page, 3 pages, doc, links stub, glossary stub
        assert_eq!(run.report.created, 8);
        assert_eq!(run.report.updated, 4);
        assert_eq!(run.report.skipped, 0);
        assert_eq!(run.report.errors, 0);
        assert!(run.succeeded());

        let root = tmp.path();
        assert!(root.join("src/guides/kb/keyboardsData.ts").exists());
        assert!(root.join("src/content/guides/kb/p3.md").exists());
        assert!(root.join("docs/guides/kb.md").exists());

        let data = fs::read_to_string(root.join("src/guides/kb/keyboardsData.ts")).unwrap();
        assert!(data.contains("title: 'Keyboard\\'s Guide',"));
        assert!(data.contains("{ label: 'A', ids: ['p1', 'p3'] },"));

        let links = fs::read_to_string(root.join("src/data/links/index.ts")).unwrap();
        assert!(links.contains(
            "import { gitLinks } from './gitLinks';\nimport { keyboardsLinks } from './keyboardsLinks';\n"
        ));
        assert!(links.contains("  ...gitLinks,\n  ...keyboardsLinks,\n];"));

        let glossary = fs::read_to_string(root.join("src/data/glossary/index.ts")).unwrap();
        assert!(glossary.contains("  ...keyboardsTerms,"));
    }

    #[test]
    fn test_second_run_aborts_without_mutation() {
        let tmp = repo();
        run(&tokens(), &options(tmp.path())).unwrap();
        let before = snapshot(tmp.path());

        let err = run(&tokens(), &options(tmp.path())).unwrap_err();

        assert_eq!(
            err,
            ScaffoldError::AlreadyScaffolded(PathBuf::from("src/guides/kb/keyboardsData.ts"))
        );
        assert_eq!(snapshot(tmp.path()), before);
    }

    #[test]
    fn test_missing_fields_abort_before_writing() {
        let tmp = repo();
        let before = snapshot(tmp.path());

        let err = run(&["--id", "kb"], &options(tmp.path())).unwrap_err();

        assert!(matches!(err, ScaffoldError::MissingFields(ref f) if f.len() == 6));
        assert_eq!(snapshot(tmp.path()), before);
    }

    #[test]
    fn test_missing_anchor_does_not_stop_pipeline() {
        let tmp = repo();
        fs::write(tmp.path().join("src/data/glossary/index.ts"), "export const allTerms = [];\n").unwrap();

        let run = run(&tokens(), &options(tmp.path())).unwrap();

        assert_eq!(run.report.errors, 2);
        assert_eq!(run.report.created, 8);
        assert_eq!(run.report.updated, 2);
        assert!(!run.succeeded());
        let glossary = Path::new("src/data/glossary/index.ts");
        assert!(run
            .report
            .for_path(glossary)
            .all(|o| o.action == Action::Error));
    }

    #[test]
    fn test_existing_stub_is_skipped() {
        let tmp = repo();
        let doc = tmp.path().join("docs/guides/kb.md");
        fs::create_dir_all(doc.parent().unwrap()).unwrap();
        fs::write(&doc, "hand written").unwrap();

        let run = run(&tokens(), &options(tmp.path())).unwrap();

        assert_eq!(run.report.skipped, 1);
        assert!(run.succeeded());
        assert_eq!(fs::read_to_string(&doc).unwrap(), "hand written");
    }

    #[test]
    fn test_link_check_runs_when_requested() {
        let tmp = repo();
        let mut tokens = tokens();
        tokens.extend(["--check-links", "git-book,kb-manual"]);

        let run = run(&tokens, &options(tmp.path())).unwrap();

        let links = run.links.as_ref().expect("link check");
        assert_eq!(links.duplicates.len(), 1);
        assert_eq!(links.duplicates[0].id, "git-book");
        assert_eq!(
            links.duplicates[0].found_in,
            Some(tmp.path().join("src/data/links/gitLinks.ts"))
        );
        assert_eq!(links.fresh, vec!["kb-manual".to_string()]);
        assert!(run.succeeded());
    }

    #[test]
    fn test_trailing_tool_option_aborts_before_writing() {
        let tmp = repo();
        let before = snapshot(tmp.path());
        let mut tokens = tokens();
        tokens.push("--dry-run");

        let err = run(&tokens, &options(tmp.path())).unwrap_err();

        assert_eq!(err, ScaffoldError::MisplacedOption("dry-run".to_string()));
        assert_eq!(snapshot(tmp.path()), before);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let tmp = repo();
        let before = snapshot(tmp.path());
        let mut options = options(tmp.path());
        options.dry_run = true;

        let run = run(&tokens(), &options).unwrap();

        assert_eq!(run.report.created, 8);
        assert_eq!(snapshot(tmp.path()), before);
    }

    #[test]
    fn test_module_specifier() {
        assert_eq!(
            module_specifier(Path::new("src/data/links/index.ts"), Path::new("src/data/links/aLinks.ts")),
            "./aLinks"
        );
        assert_eq!(
            module_specifier(Path::new("src/data/links/index.ts"), Path::new("src/data/links/guides/aLinks.ts")),
            "./guides/aLinks"
        );
        assert_eq!(
            module_specifier(Path::new("src/data/index.ts"), Path::new("src/links/aLinks.ts")),
            "../links/aLinks"
        );
    }

    #[test]
    fn test_artifact_order_starts_with_data_module() {
        let flags = parse_flags(&tokens());
        let request = GuideScaffoldRequest::from_flags(&flags).unwrap();
        let files = artifacts(&request, &Layout::default(), "2026-01-02");
        assert_eq!(files[0].0, PathBuf::from("src/guides/kb/keyboardsData.ts"));
        assert_eq!(files.len(), 8);
        assert_eq!(next_steps(&request, &Layout::default()).len(), 6);
    }
}
