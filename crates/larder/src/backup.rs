use crate::{
    db::Pool,
    engine::{dependency_order, BackupEngine},
    migrate::{self, Migration},
    report::{MigrationReport, RunReport},
    transform::{TransformContext, TransformRegistry},
};

use larder_core::{
    doc::Value,
    schema::{Schema, TableDef, TableId},
    Result, Source,
};

use std::{fmt, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Registers tables, transforms, and migrations, then compiles them into
/// a [`Backup`]. All schema validation happens in [`build`](Builder::build),
/// before any I/O.
#[derive(Default)]
pub struct Builder {
    tables: Vec<TableDef>,
    transforms: TransformRegistry,
    migrations: Vec<Box<dyn Migration>>,
}

impl Builder {
    /// Registers one (collection, schema, options) triple.
    pub fn table(&mut self, def: TableDef) -> &mut Self {
        self.tables.push(def);
        self
    }

    /// Registers a transform overriding how `table`.`column` is computed.
    pub fn transform<F>(&mut self, table: &str, column: &str, transform: F) -> &mut Self
    where
        F: Fn(&TransformContext<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.transforms.register(table, column, transform);
        self
    }

    /// Appends a migration to run, in declaration order, after backup
    /// completes.
    pub fn migration(&mut self, migration: impl Migration + 'static) -> &mut Self {
        self.migrations.push(Box::new(migration));
        self
    }

    /// Compiles the registered tables into an immutable schema and fixes
    /// the table processing order. Schema and cycle errors surface here.
    pub fn build(&mut self) -> Result<Backup> {
        let defs = std::mem::take(&mut self.tables);
        let transforms = std::mem::take(&mut self.transforms);
        let migrations = std::mem::take(&mut self.migrations);

        let schema = Arc::new(Schema::build(defs, &transforms.columns())?);
        let order = dependency_order(&schema)?;

        Ok(Backup {
            schema,
            order,
            transforms,
            migrations,
        })
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("tables", &self.tables.len())
            .field("transforms", &self.transforms)
            .field("migrations", &self.migrations.len())
            .finish()
    }
}

/// A compiled backup run: fetches each registered collection from the
/// source, writes rows into the destination in foreign-key order, then
/// applies pending migrations.
pub struct Backup {
    schema: Arc<Schema>,
    order: Vec<TableId>,
    transforms: TransformRegistry,
    migrations: Vec<Box<dyn Migration>>,
}

impl Backup {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Destination table names in the order they will be processed.
    pub fn table_order(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|id| self.schema.table(*id).name.as_str())
    }

    /// Backs up every registered table, then applies pending migrations.
    pub async fn run(&self, source: &mut dyn Source, pool: &Pool) -> Result<RunReport> {
        self.run_with_cancel(source, pool, &CancellationToken::new())
            .await
    }

    /// Like [`run`](Backup::run), but checks the token between tables and
    /// between documents. A cancelled run stops before its next unit of
    /// work, reports what completed, and does not attempt migrations.
    pub async fn run_with_cancel(
        &self,
        source: &mut dyn Source,
        pool: &Pool,
        cancel: &CancellationToken,
    ) -> Result<RunReport> {
        let engine = BackupEngine {
            schema: &self.schema,
            order: &self.order,
            transforms: &self.transforms,
            pool,
            cancel,
        };

        let (tables, cancelled) = engine.run(source).await?;

        if cancelled {
            info!("run cancelled; migrations not attempted");
            return Ok(RunReport {
                tables,
                migrations: MigrationReport::default(),
                cancelled: true,
            });
        }

        let migrations = migrate::run(pool, &self.migrations).await?;

        Ok(RunReport {
            tables,
            migrations,
            cancelled: false,
        })
    }
}

impl fmt::Debug for Backup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backup")
            .field("schema", &self.schema)
            .field("order", &self.order)
            .field("migrations", &self.migrations.len())
            .finish()
    }
}
