mod error;
pub use error::Error;

pub mod doc;

pub mod driver;
pub use driver::{Connection, Driver, Source};

pub mod schema;
pub use schema::Schema;

/// A Result type alias that uses Larder's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
