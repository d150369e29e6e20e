// ABOUTME: Server-side rendering pass: applies static layout to AMP elements and drops the boilerplate.
// ABOUTME: The boilerplate is removed only when no element or head script still needs the runtime.

use crate::dom::{Document, NodeId};
use crate::error::{OptimizeError, Result};
use crate::extensions::{Extensions, CUSTOM_ELEMENT_ATTR};
use crate::layout::apply_layout;
use crate::options::Options;

use super::Transformer;

/// Set on `<html>` once the pass has run.
pub const LAYOUT_MARKER: &str = "i-amphtml-layout";
/// Set on `<html>` when the boilerplate was removed.
pub const NO_BOILERPLATE_MARKER: &str = "i-amphtml-no-boilerplate";
/// Boolean attribute on the `<style>` inserted at the top of `<head>`.
pub const RUNTIME_STYLE_MARKER: &str = "amp-runtime";
/// Boolean attribute identifying the boilerplate `<style>`.
pub const BOILERPLATE_STYLE_MARKER: &str = "amp-boilerplate";

const AMP_EXPERIMENT: &str = "amp-experiment";
const AMP_AUDIO: &str = "amp-audio";

// Attributes whose behaviour depends on the viewport and so on the runtime.
const RESPONSIVE_ATTRS: &[&str] = &["heights", "media", "sizes"];

/// Whether the boilerplate may still be removed. Starts removable and can
/// only ever be downgraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    removable: bool,
}

impl Default for Verdict {
    fn default() -> Self {
        Self::removable()
    }
}

impl Verdict {
    pub fn removable() -> Self {
        Self { removable: true }
    }

    pub fn is_removable(&self) -> bool {
        self.removable
    }

    #[must_use]
    fn disqualify(self, tag: &str, reason: &str) -> Self {
        tracing::debug!(tag, reason, "boilerplate must be kept");
        Self { removable: false }
    }
}

pub struct ServerSideRendering {
    extensions: Extensions,
}

impl Default for ServerSideRendering {
    fn default() -> Self {
        Self::new(Extensions::default())
    }
}

impl ServerSideRendering {
    pub fn new(extensions: Extensions) -> Self {
        Self { extensions }
    }

    pub fn from_options(opts: &Options) -> Self {
        Self::new(Extensions::from_options(opts))
    }

    /// Walk the body in document order, applying layout to every live custom
    /// element and folding each reason to keep the boilerplate into `verdict`.
    pub fn scan_body(&self, doc: &mut Document, body: NodeId, mut verdict: Verdict) -> Verdict {
        let mut next = Some(body);
        while let Some(node) = next {
            verdict = self.visit(doc, node, verdict);
            next = doc.next_node_within(node, body);
        }
        verdict
    }

    fn visit(&self, doc: &mut Document, node: NodeId, mut verdict: Verdict) -> Verdict {
        let Some(el) = doc.element(node) else {
            return verdict;
        };
        if !self.extensions.is_custom_element(el) {
            return verdict;
        }
        // Template contents are inert markup.
        if has_ancestor_with_tag(doc, node, "template") {
            return verdict;
        }

        let tag = el.name().to_string();
        if RESPONSIVE_ATTRS.iter().any(|attr| el.has_attr(attr)) {
            verdict = verdict.disqualify(&tag, "uses heights, media or sizes");
        }
        // amp-experiment delays rendering iff the tag is used, so the tag
        // counts here and its script is skipped in scan_head.
        if tag == AMP_EXPERIMENT {
            verdict = verdict.disqualify(&tag, "experiment in use");
        }
        // amp-audio needs the browser's dimensions; leave its layout alone.
        if tag == AMP_AUDIO {
            return verdict.disqualify(&tag, "audio element");
        }
        if !apply_layout(doc, node) {
            verdict = verdict.disqualify(&tag, "layout not statically resolvable");
        }
        verdict
    }

    /// Check the direct children of `<head>` for render-delaying extensions.
    pub fn scan_head(&self, doc: &Document, head: NodeId, mut verdict: Verdict) -> Verdict {
        let mut next = doc.first_child(head);
        while let Some(node) = next {
            if let Some(el) = doc.element(node) {
                let experiment_script = el.name() == "script"
                    && el.attr(CUSTOM_ELEMENT_ATTR) == Some(AMP_EXPERIMENT);
                if !experiment_script && self.extensions.is_render_delaying_extension(el) {
                    let ext = el.attr(CUSTOM_ELEMENT_ATTR).unwrap_or_default();
                    verdict = verdict.disqualify(ext, "render-delaying extension");
                }
            }
            next = doc.next_sibling(node);
        }
        verdict
    }
}

impl Transformer for ServerSideRendering {
    fn name(&self) -> &'static str {
        "server-side-rendering"
    }

    #[tracing::instrument(skip_all)]
    fn transform(&self, doc: &mut Document) -> Result<()> {
        let html = doc
            .html()
            .ok_or_else(|| OptimizeError::malformed_document(self.name(), "html"))?;
        let head = doc
            .first_child_by_tag(html, "head")
            .ok_or_else(|| OptimizeError::malformed_document(self.name(), "head"))?;
        let body = doc
            .first_child_by_tag(html, "body")
            .ok_or_else(|| OptimizeError::malformed_document(self.name(), "body"))?;

        if doc.element(html).is_some_and(|el| el.has_attr(LAYOUT_MARKER)) {
            tracing::debug!("document already rendered server-side");
            return Ok(());
        }
        doc.set_attr(html, LAYOUT_MARKER, "");

        let verdict = self.scan_body(doc, body, Verdict::removable());

        insert_runtime_style(doc, head);

        let verdict = self.scan_head(doc, head, verdict);
        if !verdict.is_removable() {
            return Ok(());
        }

        doc.set_attr(html, NO_BOILERPLATE_MARKER, "");
        let removed = remove_boilerplate(doc, head);
        tracing::debug!(removed, "removed boilerplate");
        Ok(())
    }
}

fn has_ancestor_with_tag(doc: &Document, node: NodeId, tag: &str) -> bool {
    let mut parent = doc.parent(node);
    while let Some(p) = parent {
        if doc.tag_name(p) == Some(tag) {
            return true;
        }
        parent = doc.parent(p);
    }
    false
}

fn insert_runtime_style(doc: &mut Document, head: NodeId) {
    let style = doc.create_element("style");
    doc.set_attr(style, RUNTIME_STYLE_MARKER, "");
    let first = doc.first_child(head);
    doc.insert_before(head, style, first);
}

/// Remove `<noscript>` and `<style amp-boilerplate>` children of `<head>`.
/// Assumes `<noscript>` in the head only ever holds boilerplate.
fn remove_boilerplate(doc: &mut Document, head: NodeId) -> usize {
    let doomed: Vec<NodeId> = doc
        .children(head)
        .into_iter()
        .filter(|&node| {
            doc.element(node).is_some_and(|el| {
                el.name() == "noscript"
                    || (el.name() == "style" && el.has_attr(BOILERPLATE_STYLE_MARKER))
            })
        })
        .collect();
    for &node in &doomed {
        doc.remove(node);
    }
    doomed.len()
}
