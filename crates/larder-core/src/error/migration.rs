use std::fmt;

#[derive(Debug)]
pub(crate) struct MigrationError {
    id: String,
}

impl MigrationError {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl fmt::Display for MigrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "migration `{}` failed", self.id)
    }
}
