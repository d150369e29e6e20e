// ABOUTME: Main library entry point for the AMP optimizer.
// ABOUTME: Re-exports the public API: Optimizer, Options, Document, the transformers and error types.

//! AMP optimizer - server-side rendering for AMP documents.
//!
//! Parses an AMP page, writes statically resolvable layout onto its custom
//! elements and, when nothing in the page still needs the runtime to lay it
//! out, removes the AMP boilerplate so the page renders without waiting for
//! JavaScript.
//!
//! # Example
//!
//! ```
//! use amp_optimizer::{Optimizer, OptimizeError};
//!
//! fn main() -> Result<(), OptimizeError> {
//!     let optimizer = Optimizer::builder().build();
//!     let html = optimizer.transform_html(
//!         "<html ⚡><head></head><body><amp-img width=1 height=1></amp-img></body></html>",
//!     )?;
//!     assert!(html.contains("i-amphtml-no-boilerplate"));
//!     Ok(())
//! }
//! ```

pub mod dom;
pub mod error;
pub mod extensions;
pub mod layout;
pub mod optimizer;
pub mod options;
pub mod transformers;

pub use crate::dom::{Doctype, Document, Element, Node, NodeId};
pub use crate::error::{ErrorCode, OptimizeError, Result};
pub use crate::extensions::Extensions;
pub use crate::layout::{apply_layout, Layout, UnknownLayout};
pub use crate::optimizer::{Optimizer, Report};
pub use crate::options::{OptimizerBuilder, Options};
pub use crate::transformers::{ServerSideRendering, Transformer, Verdict};
