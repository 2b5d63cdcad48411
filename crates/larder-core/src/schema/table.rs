use super::ColumnSpec;

use std::fmt;

/// Declared description of one backed-up table: the source collection,
/// an optional destination rename, and the ordered column declarations.
#[derive(Debug, Clone)]
pub struct TableDef {
    pub(crate) collection: String,
    pub(crate) rename_to: Option<String>,
    pub(crate) columns: Vec<super::ColumnDef>,
}

impl TableDef {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            rename_to: None,
            columns: Vec::new(),
        }
    }

    /// Destination relation name, when it differs from the source
    /// collection name.
    pub fn rename_to(mut self, name: impl Into<String>) -> Self {
        self.rename_to = Some(name.into());
        self
    }

    pub fn column(mut self, column: super::ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub(crate) fn dest_name(&self) -> &str {
        self.rename_to.as_deref().unwrap_or(&self.collection)
    }
}

/// Uniquely identifies a table within a compiled [`Schema`](crate::Schema).
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct TableId(pub usize);

impl fmt::Debug for TableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableId({})", self.0)
    }
}

/// Compiled, immutable schema for one destination table. Built once at
/// configuration time and shared for the process lifetime.
#[derive(Debug, PartialEq)]
pub struct TableSchema {
    /// Uniquely identifies the table in the schema.
    pub id: TableId,

    /// Name of the destination relation.
    pub name: String,

    /// Name of the source collection documents are fetched from. Not
    /// necessarily equal to `name`.
    pub collection: String,

    /// The table's columns, in declaration order.
    pub columns: Vec<ColumnSpec>,
}

impl TableSchema {
    /// The column used as the natural key for upsert, if one is declared.
    pub fn unique_column(&self) -> Option<&ColumnSpec> {
        self.columns.iter().find(|column| column.unique)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }
}
