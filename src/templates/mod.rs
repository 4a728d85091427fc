//! Template cache.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     <dir>/pages/*.tmpl
//!     → one Tera instance per page (base.tmpl + partials/*.tmpl + page)
//!     → helper filters registered from functions::HELPERS
//!     → TemplateCache (immutable, shared via Arc)
//!
//! Request:
//!     render(page, data) → String → response body
//! ```
//!
//! # Design Decisions
//! - Built exactly once; any missing file or parse error aborts startup
//! - Read-only after construction, so no locking on the render path
//! - Rendering targets a buffer, so a failed render never leaves a half-written body

pub mod data;
pub mod functions;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

pub use data::TemplateData;

/// Name of the layout every page extends.
pub const BASE_TEMPLATE: &str = "base.tmpl";

/// Errors raised while building or rendering templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("required template file is missing: {0}")]
    MissingFile(PathBuf),

    #[error("no page templates found in {0}")]
    NoPages(PathBuf),

    #[error("template '{0}' is not in the cache")]
    NotCached(String),

    #[error("invalid template glob: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("failed to list templates: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("template data could not be serialized: {0}")]
    Context(String),

    #[error("template error: {0}")]
    Tera(#[from] tera::Error),
}

/// Immutable mapping from page name (e.g. `home.tmpl`) to its composed template set.
#[derive(Debug)]
pub struct TemplateCache {
    pages: HashMap<String, Tera>,
}

impl TemplateCache {
    /// Parse every page under `dir/pages`, each bound to the layout and partials.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let dir = dir.as_ref();

        let base = dir.join(BASE_TEMPLATE);
        if !base.is_file() {
            return Err(TemplateError::MissingFile(base));
        }

        let partials = list(&dir.join("partials"))?;
        let page_files = list(&dir.join("pages"))?;
        if page_files.is_empty() {
            return Err(TemplateError::NoPages(dir.join("pages")));
        }

        let mut pages = HashMap::with_capacity(page_files.len());
        for page in page_files {
            let name = file_name(&page);

            let mut files = Vec::with_capacity(partials.len() + 2);
            files.push((base.clone(), Some(BASE_TEMPLATE.to_string())));
            for partial in &partials {
                files.push((partial.clone(), Some(format!("partials/{}", file_name(partial)))));
            }
            files.push((page.clone(), Some(name.clone())));

            let mut tera = Tera::default();
            tera.autoescape_on(vec![".tmpl"]);
            functions::register(&mut tera);
            tera.add_template_files(files)?;

            tracing::debug!(page = %name, "Template compiled");
            pages.insert(name, tera);
        }

        tracing::info!(dir = %dir.display(), pages = pages.len(), "Template cache built");
        Ok(Self { pages })
    }

    /// Render a cached page. A page missing from the cache is a server defect.
    pub fn render<T: Serialize>(&self, page: &str, data: &T) -> Result<String, TemplateError> {
        let tera = self
            .pages
            .get(page)
            .ok_or_else(|| TemplateError::NotCached(page.to_string()))?;
        let context = Context::from_serialize(data)?;
        Ok(tera.render(page, &context)?)
    }

    pub fn contains(&self, page: &str) -> bool {
        self.pages.contains_key(page)
    }
}

fn list(dir: &Path) -> Result<Vec<PathBuf>, TemplateError> {
    let pattern = dir.join("*.tmpl");
    let mut files = glob::glob(&pattern.to_string_lossy())?.collect::<Result<Vec<_>, _>>()?;
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, rel: &str, body: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    fn scaffold() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "base.tmpl",
            "<title>{% block title %}{% endblock title %}</title>{% include \"partials/nav.tmpl\" %}{% block main %}{% endblock main %}",
        );
        write(dir.path(), "partials/nav.tmpl", "<nav>nav</nav>");
        write(
            dir.path(),
            "pages/home.tmpl",
            "{% extends \"base.tmpl\" %}{% block title %}Home{% endblock title %}{% block main %}<p>{{ flash }}</p>{% endblock main %}",
        );
        dir
    }

    #[test]
    fn test_builds_and_renders_composed_page() {
        let dir = scaffold();
        let cache = TemplateCache::new(dir.path()).unwrap();
        assert!(cache.contains("home.tmpl"));

        let data = TemplateData {
            flash: Some("<b>hi</b>".into()),
            ..TemplateData::default()
        };
        let html = cache.render("home.tmpl", &data).unwrap();
        assert!(html.contains("<title>Home</title>"));
        assert!(html.contains("<nav>nav</nav>"));
        // Autoescaped.
        assert!(html.contains("&lt;b&gt;hi&lt;&#x2F;b&gt;"));
    }

    #[test]
    fn test_missing_base_fails_fast() {
        let dir = scaffold();
        fs::remove_file(dir.path().join("base.tmpl")).unwrap();
        assert!(matches!(
            TemplateCache::new(dir.path()),
            Err(TemplateError::MissingFile(_))
        ));
    }

    #[test]
    fn test_no_pages_fails_fast() {
        let dir = scaffold();
        fs::remove_file(dir.path().join("pages/home.tmpl")).unwrap();
        assert!(matches!(TemplateCache::new(dir.path()), Err(TemplateError::NoPages(_))));
    }

    #[test]
    fn test_parse_error_fails_fast() {
        let dir = scaffold();
        write(dir.path(), "pages/broken.tmpl", "{% extends \"base.tmpl\" %}{% block main %}{{ oops");
        assert!(matches!(TemplateCache::new(dir.path()), Err(TemplateError::Tera(_))));
    }

    #[test]
    fn test_unknown_page_is_an_error() {
        let dir = scaffold();
        let cache = TemplateCache::new(dir.path()).unwrap();
        assert!(matches!(
            cache.render("nope.tmpl", &TemplateData::default()),
            Err(TemplateError::NotCached(_))
        ));
    }
}
