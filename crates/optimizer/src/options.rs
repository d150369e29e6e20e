// ABOUTME: Configuration options for the optimizer including Options and OptimizerBuilder.
// ABOUTME: OptimizerBuilder provides a fluent API for constructing Optimizer instances with custom settings.

use serde::{Deserialize, Serialize};

use crate::error::{OptimizeError, Result};
use crate::extensions::{DEFAULT_CUSTOM_ELEMENT_PREFIX, DEFAULT_RENDER_DELAYING_EXTENSIONS};
use crate::optimizer::Optimizer;

/// Configuration options for the optimizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Run the server-side rendering pass.
    pub server_side_rendering: bool,
    /// Tag prefix identifying custom elements.
    pub custom_element_prefix: String,
    /// Extension names whose script declaration delays first render.
    pub render_delaying_extensions: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            server_side_rendering: true,
            custom_element_prefix: DEFAULT_CUSTOM_ELEMENT_PREFIX.to_string(),
            render_delaying_extensions: DEFAULT_RENDER_DELAYING_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Options {
    /// Parse options from a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| OptimizeError::config("parse options", Some(e.into())))
    }
}

/// Builder for constructing Optimizer instances with custom configuration.
#[derive(Debug, Clone)]
pub struct OptimizerBuilder {
    opts: Options,
}

impl OptimizerBuilder {
    /// Create a new OptimizerBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Replace all options at once.
    pub fn options(mut self, opts: Options) -> Self {
        self.opts = opts;
        self
    }

    /// Enable or disable the server-side rendering pass.
    pub fn server_side_rendering(mut self, enabled: bool) -> Self {
        self.opts.server_side_rendering = enabled;
        self
    }

    /// Set the tag prefix identifying custom elements.
    pub fn custom_element_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.opts.custom_element_prefix = prefix.into();
        self
    }

    /// Add an extension to the render-delaying set.
    pub fn render_delaying_extension(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.opts.render_delaying_extensions.contains(&name) {
            self.opts.render_delaying_extensions.push(name);
        }
        self
    }

    /// Build the Optimizer with the configured options.
    pub fn build(self) -> Optimizer {
        Optimizer::new(self.opts)
    }
}

impl Default for OptimizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
