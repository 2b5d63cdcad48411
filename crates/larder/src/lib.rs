mod backup;
pub use backup::{Backup, Builder};

pub mod db;
pub use db::{Pool, PoolConnection};

mod engine;
pub use engine::Row;

pub mod migrate;
pub use migrate::{Migration, MigrationRecord};

mod report;
pub use report::{MigrationReport, RunReport, SkipReason, TableReport};

pub mod source;

mod transform;
pub use transform::{TransformContext, TransformFn, TransformRegistry};

pub use larder_core::{async_trait, bail, doc, driver, err, schema, Error, Result};

pub use tokio_util::sync::CancellationToken;
