use crate::{db::Pool, report::MigrationReport};

use larder_core::{
    async_trait,
    doc::{Type, Value},
    driver::operation::{CreateTable, Insert, Select},
    err,
    schema::{ColumnDef, Schema, TableDef, TableSchema},
    Error, Result,
};

use std::{
    collections::HashSet,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::{debug, info};

/// A named, one-time schema or data change applied to the destination
/// after backup completes. A migration is never re-applied once recorded;
/// a change that must run again is re-declared under a new id.
#[async_trait]
pub trait Migration: Send + Sync {
    /// Stable identifier recorded in the tracking table.
    fn id(&self) -> &str;

    async fn apply(&self, pool: &Pool) -> Result<()>;
}

/// One row of the migration-tracking table. Append-only; never deleted by
/// this engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRecord {
    pub id: String,
    pub applied_at: i64,
}

pub(crate) const TRACKING_TABLE: &str = "_larder_migrations";

fn tracking_table() -> Arc<TableSchema> {
    // Compiled through the regular schema compiler so every destination,
    // test fakes included, sees an ordinary table.
    let schema = Schema::build(
        vec![TableDef::new(TRACKING_TABLE)
            .column(ColumnDef::new("id", Type::String).unique())
            .column(ColumnDef::new("applied_at", Type::I64).required())],
        &HashSet::new(),
    )
    .expect("tracking table schema is valid");

    schema
        .table_by_name(TRACKING_TABLE)
        .expect("tracking table was just compiled")
        .clone()
}

/// Applies every not-yet-recorded migration, strictly in declared order,
/// recording each id after its `apply` succeeds. A failure aborts the
/// remaining sequence and leaves the tracking table exactly as of the last
/// successfully recorded migration.
pub async fn run(pool: &Pool, migrations: &[Box<dyn Migration>]) -> Result<MigrationReport> {
    let mut report = MigrationReport::default();
    if migrations.is_empty() {
        return Ok(report);
    }

    let table = tracking_table();
    pool.exec(CreateTable {
        table: table.clone(),
    })
    .await?;

    let applied = applied_ids(pool, &table).await?;

    for migration in migrations {
        let id = migration.id();

        if applied.contains(id) {
            debug!(migration = id, "already applied");
            continue;
        }

        info!(migration = id, "applying migration");
        migration
            .apply(pool)
            .await
            .map_err(|err| err.context(Error::migration(id)))?;

        record(pool, &table, id)
            .await
            .map_err(|err| err.context(Error::migration(id)))?;
        report.applied.push(id.to_string());
    }

    Ok(report)
}

/// Every recorded migration, in insertion order. Creates the tracking
/// table if this destination has never run migrations.
pub async fn applied_records(pool: &Pool) -> Result<Vec<MigrationRecord>> {
    let table = tracking_table();
    pool.exec(CreateTable {
        table: table.clone(),
    })
    .await?;

    let rows = pool
        .exec(Select {
            table,
            columns: vec!["id".to_string(), "applied_at".to_string()],
        })
        .await?
        .into_rows()?;

    rows.into_iter()
        .map(|row| match &row[..] {
            [Value::String(id), Value::I64(applied_at)] => Ok(MigrationRecord {
                id: id.clone(),
                applied_at: *applied_at,
            }),
            other => Err(err!("malformed migration record: {other:?}")),
        })
        .collect()
}

async fn applied_ids(pool: &Pool, table: &Arc<TableSchema>) -> Result<HashSet<String>> {
    let rows = pool
        .exec(Select {
            table: table.clone(),
            columns: vec!["id".to_string()],
        })
        .await?
        .into_rows()?;

    rows.into_iter()
        .map(|row| match &row[..] {
            [Value::String(id)] => Ok(id.clone()),
            other => Err(err!("malformed migration id row: {other:?}")),
        })
        .collect()
}

async fn record(pool: &Pool, table: &Arc<TableSchema>, id: &str) -> Result<()> {
    pool.exec(Insert {
        table: table.clone(),
        columns: vec!["id".to_string(), "applied_at".to_string()],
        rows: vec![vec![
            Value::String(id.to_string()),
            Value::I64(unix_timestamp()),
        ]],
        // append-only; a duplicate id here is a bug worth surfacing
        conflict: None,
    })
    .await?;
    Ok(())
}

fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}
