mod order;
pub(crate) use order::dependency_order;

mod row;
pub use row::Row;

use crate::{
    db::Pool,
    report::{SkipReason, TableReport},
    transform::{TransformContext, TransformRegistry},
};

use larder_core::{
    doc::{Document, Value},
    driver::operation::{CreateTable, Insert},
    err,
    schema::{Schema, TableId, TableSchema},
    Error, Result, Source,
};

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Drives one backup run: tables strictly sequentially in dependency
/// order, documents strictly sequentially within a table. The pool is the
/// only shared resource and this engine is its only writer.
pub(crate) struct BackupEngine<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) order: &'a [TableId],
    pub(crate) transforms: &'a TransformRegistry,
    pub(crate) pool: &'a Pool,
    pub(crate) cancel: &'a CancellationToken,
}

impl BackupEngine<'_> {
    /// Backs up every table. Returns the per-table reports and whether the
    /// run was cancelled before completing.
    pub(crate) async fn run(&self, source: &mut dyn Source) -> Result<(Vec<TableReport>, bool)> {
        source
            .connect()
            .await
            .map_err(|err| err.context(err!("failed to connect to source")))?;

        let mut reports = Vec::with_capacity(self.order.len());

        for &id in self.order {
            if self.cancel.is_cancelled() {
                info!("backup cancelled between tables");
                return Ok((reports, true));
            }

            let table = self.schema.table(id);
            let (report, cancelled) = self
                .backup_table(source, table)
                .await
                .map_err(|err| err.context(err!("backing up table `{}`", table.name)))?;
            reports.push(report);

            if cancelled {
                return Ok((reports, true));
            }
        }

        Ok((reports, false))
    }

    async fn backup_table(
        &self,
        source: &mut dyn Source,
        table: &Arc<TableSchema>,
    ) -> Result<(TableReport, bool)> {
        debug!(
            table = %table.name,
            collection = %table.collection,
            "ensuring destination relation"
        );
        self.pool
            .exec(CreateTable {
                table: table.clone(),
            })
            .await?;

        let mut documents = source.fetch(&table.collection).await?;
        let conflict = table.unique_column().map(|column| column.name.clone());
        let mut report = TableReport::new(&table.name);

        while let Some(next) = documents.next().await {
            if self.cancel.is_cancelled() {
                info!(table = %table.name, "backup cancelled between documents");
                return Ok((report, true));
            }

            let document = next?;

            let row = match self.build_row(table, &document) {
                Ok(row) => row,
                Err(err) if err.is_document_fault() => {
                    let reason =
                        SkipReason::classify(&err).expect("document faults always classify");
                    warn!(table = %table.name, error = %err, "skipping document");
                    report.record_skip(reason);
                    continue;
                }
                Err(err) => return Err(err),
            };

            match self.write_row(table, row, conflict.clone()).await {
                Ok(()) => report.record_written(),
                Err(err) if err.is_constraint() => {
                    warn!(table = %table.name, error = %err, "row rejected by destination");
                    report.record_skip(SkipReason::Constraint);
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            table = %table.name,
            rows_written = report.rows_written,
            rows_skipped = report.rows_skipped,
            "table backed up"
        );
        Ok((report, false))
    }

    /// Builds the destination row for one document. Per column: a
    /// registered transform overrides the source; otherwise the source
    /// field is read; an absent or empty value falls back to the declared
    /// default, and otherwise passes through raw (possibly null).
    fn build_row(&self, table: &TableSchema, document: &Document) -> Result<Row> {
        let mut row = Row::new();

        for column in &table.columns {
            let mut value = if column.has_transform {
                let transform = self
                    .transforms
                    .lookup(&table.name, &column.name)
                    .expect("schema marks transformed columns only when registered");
                let cx = TransformContext {
                    table: &table.name,
                    column: &column.name,
                    row: &row,
                };
                transform(&cx)
                    .map_err(|err| err.context(Error::transform(&table.name, &column.name)))?
            } else {
                document
                    .get(&column.source_field)
                    .cloned()
                    .unwrap_or(Value::Null)
            };

            if value.is_empty() {
                if let Some(default) = &column.default {
                    value = default.clone();
                }
            }

            if value.is_null() && column.required {
                return Err(Error::missing_field(
                    &table.name,
                    &column.name,
                    &column.source_field,
                ));
            }

            row.insert(column.name.clone(), value.coerce(column.ty)?);
        }

        Ok(row)
    }

    async fn write_row(
        &self,
        table: &Arc<TableSchema>,
        row: Row,
        conflict: Option<String>,
    ) -> Result<()> {
        let (columns, values) = row.into_parts();
        self.pool
            .exec(Insert {
                table: table.clone(),
                columns,
                rows: vec![values],
                conflict,
            })
            .await?;
        Ok(())
    }
}
