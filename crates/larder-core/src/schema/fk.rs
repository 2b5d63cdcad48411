use super::TableId;

/// A resolved foreign-key edge between two tables in a compiled
/// [`Schema`](crate::Schema). The referencing table must be written after
/// the referenced table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRef {
    pub from_table: TableId,
    pub from_column: String,
    pub to_table: TableId,
    pub to_column: String,
}
