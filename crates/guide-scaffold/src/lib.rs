//! guide-scaffold - Stub out a new guide in one step
//!
//! A guide needs a data module with its manifest, a content stub per page, a
//! doc stub, and empty link and glossary registries that the shared
//! aggregators fold in. Doing this by hand means editing two shared files that
//! every other guide also touches.
//!
//! The tool only ever creates files that do not exist yet, and only ever adds
//! lines to the aggregators, right after the last entry of the same kind.
//! Running it twice for the same guide stops before touching anything.

pub mod args;
pub mod error;
pub mod layout;
pub mod links;
pub mod pages;
pub mod registry;
pub mod report;
pub mod request;
pub mod scaffold;
pub mod templates;
pub mod writer;

pub use error::ScaffoldError;
pub use layout::Layout;
pub use report::{Action, RunReport};
pub use request::GuideScaffoldRequest;
pub use scaffold::{run, ScaffoldOptions, ScaffoldRun};
