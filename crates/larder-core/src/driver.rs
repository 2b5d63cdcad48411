pub mod operation;
pub use operation::Operation;

mod response;
pub use response::Response;

mod source;
pub use source::Source;

use crate::{async_trait, Result};

use std::fmt::Debug;

/// Factory for destination connections. Implemented once per relational
/// backend; the pool calls [`connect`](Driver::connect) whenever it needs
/// a fresh connection.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    async fn connect(&self) -> Result<Box<dyn Connection>>;

    /// Maximum number of connections the backend supports, if bounded.
    fn max_connections(&self) -> Option<usize> {
        None
    }
}

/// A single destination connection capable of executing driver
/// operations.
#[async_trait]
pub trait Connection: Debug + Send + Sync + 'static {
    async fn exec(&mut self, op: Operation) -> Result<Response>;
}
