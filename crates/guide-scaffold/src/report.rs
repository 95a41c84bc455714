//! Per-run outcome log and counters

use colored::*;
use std::fmt;
use std::path::{Path, PathBuf};

/// What happened to one artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Skip,
    Error,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Skip => "SKIP",
            Self::Error => "ERROR",
        }
    }

    fn colored_tag(&self) -> ColoredString {
        let tag = format!("{:<6}", self.as_str());
        match self {
            Self::Create => tag.green(),
            Self::Update => tag.cyan(),
            Self::Skip => tag.dimmed(),
            Self::Error => tag.red().bold(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One logged operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub action: Action,
    /// Path relative to the repository root
    pub path: PathBuf,
    pub detail: Option<String>,
}

/// Counters and log for a single invocation
#[derive(Debug, Default)]
pub struct RunReport {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: usize,
    outcomes: Vec<Outcome>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome, bumping the matching counter
    pub fn record(&mut self, action: Action, path: &Path, detail: Option<String>) {
        match action {
            Action::Create => self.created += 1,
            Action::Update => self.updated += 1,
            Action::Skip => self.skipped += 1,
            Action::Error => self.errors += 1,
        }
        tracing::debug!(%action, path = %path.display(), ?detail, "recorded outcome");
        self.outcomes.push(Outcome {
            action,
            path: path.to_path_buf(),
            detail,
        });
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Outcomes recorded for a path, in order
    pub fn for_path<'a>(&'a self, path: &'a Path) -> impl Iterator<Item = &'a Outcome> + 'a {
        self.outcomes.iter().filter(move |o| o.path == path)
    }

    /// Print one line for an outcome
    pub fn print_outcome(outcome: &Outcome) {
        match &outcome.detail {
            Some(detail) => println!(
                "  {} {} {}",
                outcome.action.colored_tag(),
                outcome.path.display(),
                format!("({})", detail).dimmed()
            ),
            None => println!("  {} {}", outcome.action.colored_tag(), outcome.path.display()),
        }
    }

    /// Print the counters
    pub fn print_summary(&self) {
        println!();
        println!(
            "{} {} created, {} updated, {} skipped, {} errors",
            "Summary:".bold(),
            self.created,
            self.updated,
            self.skipped,
            self.errors
        );
    }
}
