use super::Operation;
use crate::schema::TableSchema;

use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct CreateTable {
    /// The compiled table to ensure exists, including its unique
    /// constraint and foreign-key references.
    pub table: Arc<TableSchema>,
}

impl From<CreateTable> for Operation {
    fn from(value: CreateTable) -> Self {
        Self::CreateTable(value)
    }
}
