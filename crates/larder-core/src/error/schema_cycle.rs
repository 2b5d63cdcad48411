use std::fmt;

#[derive(Debug)]
pub(crate) struct SchemaCycleError {
    tables: Vec<String>,
}

impl SchemaCycleError {
    pub(crate) fn new(tables: impl IntoIterator<Item = String>) -> Self {
        Self {
            tables: tables.into_iter().collect(),
        }
    }
}

impl fmt::Display for SchemaCycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "foreign key cycle involving tables: {}",
            self.tables.join(", ")
        )
    }
}
