use std::fmt;

#[derive(Debug)]
pub(crate) struct TransformError {
    table: String,
    column: String,
}

impl TransformError {
    pub(crate) fn new(table: &str, column: &str) -> Self {
        Self {
            table: table.to_string(),
            column: column.to_string(),
        }
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transform failed for column `{}.{}`",
            self.table, self.column
        )
    }
}
