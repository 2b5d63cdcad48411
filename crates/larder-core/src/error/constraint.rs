use std::fmt;

#[derive(Debug)]
pub(crate) struct ConstraintError {
    message: String,
}

impl ConstraintError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ConstraintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "constraint violation: {}", self.message)
    }
}
