// ABOUTME: Transformer trait implemented by every document rewriting pass.
// ABOUTME: Passes mutate a Document in place and are run in order by the Optimizer.

pub mod server_side_rendering;

pub use server_side_rendering::{ServerSideRendering, Verdict};

use crate::dom::Document;
use crate::error::Result;

/// A single rewriting pass over a parsed document.
pub trait Transformer: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Rewrite the document in place.
    fn transform(&self, doc: &mut Document) -> Result<()>;
}
