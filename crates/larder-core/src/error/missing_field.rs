use std::fmt;

#[derive(Debug)]
pub(crate) struct MissingFieldError {
    table: String,
    column: String,
    field: String,
}

impl MissingFieldError {
    pub(crate) fn new(table: &str, column: &str, field: &str) -> Self {
        Self {
            table: table.to_string(),
            column: column.to_string(),
            field: field.to_string(),
        }
    }
}

impl fmt::Display for MissingFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "missing required field `{}` for column `{}.{}`",
            self.field, self.table, self.column
        )
    }
}
