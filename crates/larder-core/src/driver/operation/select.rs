use super::Operation;
use crate::schema::TableSchema;

use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Select {
    pub table: Arc<TableSchema>,

    /// Columns to project, in result order.
    pub columns: Vec<String>,
}

impl From<Select> for Operation {
    fn from(value: Select) -> Self {
        Self::Select(value)
    }
}
