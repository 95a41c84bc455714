//! guide-scaffold - Stub out a new guide in one step
//!
//! Creates the data module, content stubs, doc stub and empty registries for a
//! guide, then folds the registries into the shared link and glossary
//! aggregators.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use guide_scaffold::links::LinkCheck;
use guide_scaffold::request::REQUIRED_FLAGS;
use guide_scaffold::scaffold::{self, next_steps, ScaffoldOptions};
use guide_scaffold::{Layout, RunReport, ScaffoldError};

#[derive(Parser)]
#[command(name = "guide-scaffold")]
#[command(about = "Scaffold a new guide and register it with the shared link and glossary registries")]
#[command(version)]
#[command(after_help = r#"GUIDE FLAGS (after any tool options):
    --id <ID>               Guide id                               (required)
    --title <TEXT>          Guide title                            (required)
    --icon <GLYPH>          Display icon                           (required)
    --desc <TEXT>           Short description                      (required)
    --prefix <NAME>         Prefix for generated constants         (required)
    --camel <NAME>          Base name for generated modules        (required)
    --start <PAGE>          Start page id                          (required)
    --single-page           Single-page guide
    --pages <LIST>          group:pageId:title,...
    --check-links <IDS>     Link ids to check for duplicates

EXAMPLES:
    guide-scaffold --id git --title "Git" --icon G --desc "Version control" \
        --prefix git --camel gitGuide --start overview \
        --pages "Basics:commits:Commits,Basics:branches:Branches,Teams:review:Code review"

    guide-scaffold --dry-run --id notes --title "Notes" --icon N --desc "Quick notes" \
        --prefix notes --camel notes --start notes --single-page

EXIT STATUS:
    0  all operations succeeded (skips included)
    1  missing/invalid fields, malformed pages, guide already scaffolded,
       or any write/patch error
"#)]
struct Cli {
    /// Repository root (default: current directory)
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Layout config (default: <root>/.guide-scaffold.yaml if present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Report what would change without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Guide flags, see below
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "FLAGS")]
    flags: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cmd_scaffold(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Run the scaffold; `Ok(false)` means the run finished but must exit nonzero
fn cmd_scaffold(cli: &Cli) -> Result<bool> {
    let root = match &cli.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };

    let layout = match Layout::load(&root, cli.config.as_deref()) {
        Ok(layout) => layout,
        Err(e) => {
            print_fatal(&e);
            return Ok(false);
        }
    };

    let mut options = ScaffoldOptions::new(&root, layout);
    options.dry_run = cli.dry_run;

    let run = match scaffold::run(&cli.flags, &options) {
        Ok(run) => run,
        Err(e) => {
            print_fatal(&e);
            return Ok(false);
        }
    };

    let mode = if cli.dry_run { " (dry run)" } else { "" };
    println!(
        "info: Scaffolding guide {} {}{}",
        run.request.id.bold(),
        run.request.title,
        mode
    );
    println!();

    print_outcomes(&run.report);

    if let Some(links) = &run.links {
        print_link_check(links, &root);
    }

    run.report.print_summary();

    println!();
    println!("Next steps:");
    for step in next_steps(&run.request, &options.layout) {
        println!("  [ ] {}", step);
    }

    if run.succeeded() {
        println!();
        println!("{} Guide scaffolded: {}", "success:".green(), run.request.id);
    }

    Ok(run.succeeded())
}

fn print_fatal(error: &ScaffoldError) {
    eprintln!("{} [{}] {}", "error:".red().bold(), error.stage(), error);

    match error {
        ScaffoldError::MissingFields(_) => {
            let usage: Vec<String> = REQUIRED_FLAGS.iter().map(|f| format!("--{}", f)).collect();
            eprintln!("Required flags: {}", usage.join(" "));
        }
        ScaffoldError::AlreadyScaffolded(_) => {
            eprintln!("Nothing was changed. Pick a different id/camel name or remove the guide first.");
        }
        _ => {}
    }
}

fn print_outcomes(report: &RunReport) {
    for outcome in report.outcomes() {
        RunReport::print_outcome(outcome);
    }
}

fn print_link_check(check: &LinkCheck, root: &std::path::Path) {
    println!();
    println!("{}", "Link ids:".bold());

    for dup in &check.duplicates {
        let source = dup
            .found_in
            .as_ref()
            .map(|p| p.strip_prefix(root).unwrap_or(p).display().to_string())
            .unwrap_or_else(|| "unknown file".to_string());
        println!(
            "  {} {} already exists in {}",
            "warning:".yellow(),
            dup.id,
            source
        );
    }

    for id in &check.fresh {
        println!("  {} {} is new", "ok:".green(), id);
    }
}
