// ABOUTME: Classifiers for AMP custom elements and render-delaying extension scripts.
// ABOUTME: Extensions carries the configured tag prefix and render-delaying extension names.

use crate::dom::Element;
use crate::options::Options;

/// Tag prefix shared by all AMP custom elements.
pub const DEFAULT_CUSTOM_ELEMENT_PREFIX: &str = "amp-";

/// Extensions that block first paint until their script has loaded.
pub const DEFAULT_RENDER_DELAYING_EXTENSIONS: &[&str] =
    &["amp-dynamic-css-classes", "amp-experiment", "amp-story"];

/// Attribute on a `<script>` naming the extension it declares.
pub const CUSTOM_ELEMENT_ATTR: &str = "custom-element";

#[derive(Debug, Clone)]
pub struct Extensions {
    custom_element_prefix: String,
    render_delaying: Vec<String>,
}

impl Default for Extensions {
    fn default() -> Self {
        Self::from_options(&Options::default())
    }
}

impl Extensions {
    pub fn from_options(opts: &Options) -> Self {
        Self {
            custom_element_prefix: opts.custom_element_prefix.clone(),
            render_delaying: opts.render_delaying_extensions.clone(),
        }
    }

    /// True iff the element's tag follows the custom element naming convention.
    pub fn is_custom_element(&self, element: &Element) -> bool {
        !self.custom_element_prefix.is_empty()
            && element.name().starts_with(&self.custom_element_prefix)
    }

    /// True iff the element is a `<script>` declaring a render-delaying extension.
    pub fn is_render_delaying_extension(&self, element: &Element) -> bool {
        if element.name() != "script" {
            return false;
        }
        match element.attr(CUSTOM_ELEMENT_ATTR) {
            Some(name) => self.render_delaying.iter().any(|ext| ext == name),
            None => false,
        }
    }
}
