use super::Operation;
use crate::{doc::Value, schema::TableSchema};

use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Insert {
    pub table: Arc<TableSchema>,

    /// Column names, in row-value order.
    pub columns: Vec<String>,

    /// One entry per row; each row has one value per column.
    pub rows: Vec<Vec<Value>>,

    /// When set, upsert keyed on this column: an existing row with the
    /// same key value has its other columns overwritten.
    pub conflict: Option<String>,
}

impl From<Insert> for Operation {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
