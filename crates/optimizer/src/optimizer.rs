// ABOUTME: Optimizer pipeline that runs the configured transformers over a document.
// ABOUTME: Offers both in-place Document transformation and an HTML string in/out convenience.

use serde::Serialize;

use crate::dom::Document;
use crate::error::Result;
use crate::options::{OptimizerBuilder, Options};
use crate::transformers::server_side_rendering::{LAYOUT_MARKER, NO_BOILERPLATE_MARKER};
use crate::transformers::{ServerSideRendering, Transformer};

/// Runs an ordered list of transformers. Holds no per-document state, so a
/// single instance can be shared across threads.
pub struct Optimizer {
    opts: Options,
    transformers: Vec<Box<dyn Transformer>>,
}

impl std::fmt::Debug for Optimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.transformers.iter().map(|t| t.name()).collect();
        f.debug_struct("Optimizer")
            .field("opts", &self.opts)
            .field("transformers", &names)
            .finish()
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Optimizer {
    pub fn new(opts: Options) -> Self {
        let mut transformers: Vec<Box<dyn Transformer>> = Vec::new();
        if opts.server_side_rendering {
            transformers.push(Box::new(ServerSideRendering::from_options(&opts)));
        }
        Self { opts, transformers }
    }

    pub fn builder() -> OptimizerBuilder {
        OptimizerBuilder::new()
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Names of the transformers in the order they run.
    pub fn transformer_names(&self) -> Vec<&'static str> {
        self.transformers.iter().map(|t| t.name()).collect()
    }

    /// Run every transformer over the document, stopping at the first error.
    pub fn transform(&self, doc: &mut Document) -> Result<()> {
        for transformer in &self.transformers {
            tracing::debug!(transformer = transformer.name(), "running transformer");
            transformer.transform(doc)?;
        }
        Ok(())
    }

    /// Parse, transform and serialize an HTML document.
    pub fn transform_html(&self, html: &str) -> Result<String> {
        Ok(self.transform_html_with_report(html)?.html)
    }

    /// Like [`Optimizer::transform_html`] but also reports what the passes did.
    pub fn transform_html_with_report(&self, html: &str) -> Result<Report> {
        let mut doc = Document::parse(html);
        self.transform(&mut doc)?;
        Ok(Report::from_document(&doc))
    }
}

/// Outcome of optimizing one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub html: String,
    pub layout_applied: bool,
    pub boilerplate_removed: bool,
}

impl Report {
    pub fn from_document(doc: &Document) -> Self {
        let html_el = doc.html().and_then(|id| doc.element(id));
        Self {
            html: doc.to_html(),
            layout_applied: html_el.is_some_and(|el| el.has_attr(LAYOUT_MARKER)),
            boilerplate_removed: html_el.is_some_and(|el| el.has_attr(NO_BOILERPLATE_MARKER)),
        }
    }
}
