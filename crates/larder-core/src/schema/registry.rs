use super::{ColumnSpec, ForeignKeyRef, ForeignKeyTarget, TableDef, TableId, TableSchema};
use crate::{doc::Value, Error, Result};

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

/// The compiled schema for a whole backup run: every registered table,
/// validated and frozen. Built once at configuration time.
#[derive(Debug, Default)]
pub struct Schema {
    tables: Vec<Arc<TableSchema>>,
    by_name: HashMap<String, TableId>,
}

impl Schema {
    /// Compiles declared table definitions into an immutable schema.
    ///
    /// `transformed` lists the (table, column) pairs a transform is
    /// registered for; those columns are marked so the engine knows to
    /// invoke the registry instead of reading the source document.
    ///
    /// Fails with a schema error when two columns of a table share a
    /// destination name, more than one column is marked unique, a foreign
    /// key references an unknown table or a non-key column, two tables
    /// resolve to the same destination name, or a transform names an
    /// unknown table or column.
    pub fn build(defs: Vec<TableDef>, transformed: &HashSet<(String, String)>) -> Result<Schema> {
        let mut by_name = HashMap::new();
        for (index, def) in defs.iter().enumerate() {
            let name = def.dest_name().to_string();
            if by_name.insert(name.clone(), TableId(index)).is_some() {
                return Err(Error::schema(format!(
                    "two tables resolve to destination name `{name}`"
                )));
            }
        }

        let mut tables = Vec::with_capacity(defs.len());
        for (index, def) in defs.iter().enumerate() {
            tables.push(Arc::new(compile_table(
                TableId(index),
                def,
                &by_name,
                &defs,
                transformed,
            )?));
        }

        for (table, column) in transformed {
            let Some(id) = by_name.get(table) else {
                return Err(Error::schema(format!(
                    "transform registered for unknown table `{table}`"
                )));
            };
            if tables[id.0].column(column).is_none() {
                return Err(Error::schema(format!(
                    "transform registered for unknown column `{table}.{column}`"
                )));
            }
        }

        Ok(Schema { tables, by_name })
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn table(&self, id: TableId) -> &Arc<TableSchema> {
        &self.tables[id.0]
    }

    pub fn table_by_name(&self, name: &str) -> Option<&Arc<TableSchema>> {
        self.by_name.get(name).map(|id| &self.tables[id.0])
    }

    pub fn tables(&self) -> impl Iterator<Item = &Arc<TableSchema>> {
        self.tables.iter()
    }

    /// Every declared foreign key, resolved to table ids. Used to build
    /// the write-ordering dependency graph.
    pub fn foreign_keys(&self) -> Vec<ForeignKeyRef> {
        let mut refs = Vec::new();
        for table in &self.tables {
            for column in &table.columns {
                if let Some(target) = &column.foreign_key {
                    refs.push(ForeignKeyRef {
                        from_table: table.id,
                        from_column: column.name.clone(),
                        to_table: self.by_name[&target.table],
                        to_column: target.column.clone(),
                    });
                }
            }
        }
        refs
    }
}

fn compile_table(
    id: TableId,
    def: &TableDef,
    by_name: &HashMap<String, TableId>,
    defs: &[TableDef],
    transformed: &HashSet<(String, String)>,
) -> Result<TableSchema> {
    let dest_name = def.dest_name();
    let mut seen = HashSet::new();
    let mut unique = None;
    let mut columns = Vec::with_capacity(def.columns.len());

    for column in &def.columns {
        if !seen.insert(column.name.clone()) {
            return Err(Error::schema(format!(
                "table `{dest_name}` declares destination column `{}` twice",
                column.name
            )));
        }

        if column.unique {
            if let Some(previous) = unique.replace(column.name.clone()) {
                return Err(Error::schema(format!(
                    "table `{dest_name}` declares two unique columns, `{previous}` and `{}`; \
                     at most one may be the upsert key",
                    column.name
                )));
            }
        }

        let foreign_key = match &column.references {
            Some((table, target_column)) => {
                let Some(target_id) = by_name.get(table) else {
                    return Err(Error::schema(format!(
                        "column `{dest_name}.{}` references unknown table `{table}`",
                        column.name
                    )));
                };
                let target = &defs[target_id.0];
                let Some(target_def) = target.columns.iter().find(|c| &c.name == target_column)
                else {
                    return Err(Error::schema(format!(
                        "column `{dest_name}.{}` references unknown column `{table}.{target_column}`",
                        column.name
                    )));
                };
                if !target_def.unique {
                    return Err(Error::schema(format!(
                        "column `{dest_name}.{}` references `{table}.{target_column}`, \
                         which is not that table's unique key",
                        column.name
                    )));
                }
                Some(ForeignKeyTarget {
                    table: table.clone(),
                    column: target_column.clone(),
                })
            }
            None => None,
        };

        columns.push(ColumnSpec {
            name: column.name.clone(),
            source_field: column
                .source
                .clone()
                .unwrap_or_else(|| column.name.clone()),
            ty: column.ty,
            unique: column.unique,
            // the upsert key is always required
            required: column.required || column.unique,
            default: column.default.as_deref().map(Value::from_literal),
            foreign_key,
            has_transform: transformed
                .contains(&(dest_name.to_string(), column.name.clone())),
        });
    }

    Ok(TableSchema {
        id,
        name: dest_name.to_string(),
        collection: def.collection.clone(),
        columns,
    })
}
