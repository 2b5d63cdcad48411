use crate::{async_trait, doc::DocumentStream, Result};

use std::fmt::Debug;

/// Capability interface over the document-oriented store being backed up.
///
/// Connection failures are fatal to the whole run; retry policy, if any,
/// belongs to the adapter, not the engine.
#[async_trait]
pub trait Source: Debug + Send + Sync + 'static {
    async fn connect(&mut self) -> Result<()>;

    /// Streams every document in the named collection, in store order.
    /// The stream is finite and single-pass; an empty stream is a valid,
    /// non-error result.
    async fn fetch(&self, collection: &str) -> Result<DocumentStream>;
}
