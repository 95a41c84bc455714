//! Repository layout configuration
//!
//! Where each generated artifact lives, relative to the repository root.
//! Paths are templates: `{id}` is the guide id, `{camel}` the camel name and
//! `{page}` a page id. A `.guide-scaffold.yaml` at the root overrides any of
//! the defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ScaffoldError;
use crate::request::GuideScaffoldRequest;

/// Default config file name, looked up at the repository root
pub const CONFIG_FILE: &str = ".guide-scaffold.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub data_module: String,
    pub content_page: String,
    pub guide_doc: String,
    pub link_registry: String,
    pub glossary_terms: String,
    /// Aggregator every link registry is folded into
    pub link_aggregator: String,
    /// Aggregator every glossary module is folded into
    pub glossary_aggregator: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            data_module: "src/guides/{id}/{camel}Data.ts".to_string(),
            content_page: "src/content/guides/{id}/{page}.md".to_string(),
            guide_doc: "docs/guides/{id}.md".to_string(),
            link_registry: "src/data/links/{camel}Links.ts".to_string(),
            glossary_terms: "src/data/glossary/{camel}Terms.ts".to_string(),
            link_aggregator: "src/data/links/index.ts".to_string(),
            glossary_aggregator: "src/data/glossary/index.ts".to_string(),
        }
    }
}

impl Layout {
    /// Load the layout for a repository
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self, ScaffoldError> {
        let (path, required) = match explicit {
            Some(p) => (p.to_path_buf(), true),
            None => (root.join(CONFIG_FILE), false),
        };

        if !path.exists() {
            if required {
                return Err(ScaffoldError::Config {
                    path,
                    message: "file not found".to_string(),
                });
            }
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| ScaffoldError::Config {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let layout: Layout = serde_yaml::from_str(&content).map_err(|e| ScaffoldError::Config {
            path: path.clone(),
            message: e.to_string(),
        })?;

        tracing::debug!(path = %path.display(), "loaded layout config");
        Ok(layout)
    }

    fn expand(template: &str, request: &GuideScaffoldRequest, page: Option<&str>) -> PathBuf {
        let mut path = template
            .replace("{id}", &request.id)
            .replace("{camel}", &request.camel_name);
        if let Some(page) = page {
            path = path.replace("{page}", page);
        }
        PathBuf::from(path)
    }

    /// The primary artifact; its existence means the guide is already scaffolded
    pub fn data_module_path(&self, request: &GuideScaffoldRequest) -> PathBuf {
        Self::expand(&self.data_module, request, None)
    }

    pub fn content_page_path(&self, request: &GuideScaffoldRequest, page_id: &str) -> PathBuf {
        Self::expand(&self.content_page, request, Some(page_id))
    }

    pub fn guide_doc_path(&self, request: &GuideScaffoldRequest) -> PathBuf {
        Self::expand(&self.guide_doc, request, None)
    }

    pub fn link_registry_path(&self, request: &GuideScaffoldRequest) -> PathBuf {
        Self::expand(&self.link_registry, request, None)
    }

    pub fn glossary_terms_path(&self, request: &GuideScaffoldRequest) -> PathBuf {
        Self::expand(&self.glossary_terms, request, None)
    }

    pub fn link_aggregator_path(&self) -> PathBuf {
        PathBuf::from(&self.link_aggregator)
    }

    pub fn glossary_aggregator_path(&self) -> PathBuf {
        PathBuf::from(&self.glossary_aggregator)
    }

    /// Directory holding the per-guide link registries
    pub fn links_dir(&self) -> PathBuf {
        self.link_aggregator_path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }
}
