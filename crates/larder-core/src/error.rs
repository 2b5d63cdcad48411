mod adhoc;
mod connection;
mod constraint;
mod migration;
mod missing_field;
mod schema;
mod schema_cycle;
mod transform;
mod type_conversion;

use adhoc::AdhocError;
use connection::ConnectionError;
use constraint::ConstraintError;
use migration::MigrationError;
use missing_field::MissingFieldError;
use schema::SchemaError;
use schema_cycle::SchemaCycleError;
use std::sync::Arc;
use transform::TransformError;
use type_conversion::TypeConversionError;

/// Returns an ad-hoc [`Error`] from the enclosing function.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Creates an ad-hoc [`Error`] from format arguments.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur while backing up or migrating.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    Connection(ConnectionError),
    Schema(SchemaError),
    SchemaCycle(SchemaCycleError),
    MissingField(MissingFieldError),
    Transform(TransformError),
    TypeConversion(TypeConversionError),
    Constraint(ConstraintError),
    Migration(MigrationError),
    Unknown,
}

impl Error {
    pub fn from_args(args: core::fmt::Arguments<'_>) -> Error {
        ErrorKind::Adhoc(AdhocError::new(args.to_string())).into()
    }

    /// A failure establishing or keeping a source/destination connection.
    /// Fatal to the whole run.
    pub fn connection(message: impl Into<String>) -> Error {
        ErrorKind::Connection(ConnectionError::new(message)).into()
    }

    /// A misconfigured schema declaration. Surfaces before any I/O.
    pub fn schema(message: impl Into<String>) -> Error {
        ErrorKind::Schema(SchemaError::new(message)).into()
    }

    /// The foreign-key graph contains a cycle.
    pub fn schema_cycle(tables: impl IntoIterator<Item = String>) -> Error {
        ErrorKind::SchemaCycle(SchemaCycleError::new(tables)).into()
    }

    /// A required source field was absent and no default literal is
    /// declared. Skips one document.
    pub fn missing_field(table: &str, column: &str, field: &str) -> Error {
        ErrorKind::MissingField(MissingFieldError::new(table, column, field)).into()
    }

    /// A transform failed for one document. Used as context around the
    /// transform's own error.
    pub fn transform(table: &str, column: &str) -> Error {
        ErrorKind::Transform(TransformError::new(table, column)).into()
    }

    /// A computed value does not fit the declared column type.
    pub fn type_conversion(value: &crate::doc::Value, ty: crate::doc::Type) -> Error {
        ErrorKind::TypeConversion(TypeConversionError::new(value.variant_name(), ty)).into()
    }

    /// The destination rejected a row for violating a constraint.
    /// Recoverable per row.
    pub fn constraint(message: impl Into<String>) -> Error {
        ErrorKind::Constraint(ConstraintError::new(message)).into()
    }

    /// A migration failed to apply. Aborts the remaining migrations.
    pub fn migration(id: impl Into<String>) -> Error {
        ErrorKind::Migration(MigrationError::new(id)).into()
    }

    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added
    /// context is shown first, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: Error) -> Error {
        self.context_impl(consequent)
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let mut err = consequent;
        if err.inner.is_none() {
            err = Error::from(ErrorKind::Unknown);
        }
        let inner = err.inner.as_mut().unwrap();
        assert!(
            inner.cause.is_none(),
            "consequent error must not already have a cause"
        );
        Arc::get_mut(inner).unwrap().cause = Some(self);
        err
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }

    pub fn is_connection(&self) -> bool {
        self.chain()
            .any(|err| matches!(err.kind(), ErrorKind::Connection(_)))
    }

    pub fn is_schema(&self) -> bool {
        self.chain()
            .any(|err| matches!(err.kind(), ErrorKind::Schema(_)))
    }

    pub fn is_schema_cycle(&self) -> bool {
        self.chain()
            .any(|err| matches!(err.kind(), ErrorKind::SchemaCycle(_)))
    }

    pub fn is_missing_field(&self) -> bool {
        self.chain()
            .any(|err| matches!(err.kind(), ErrorKind::MissingField(_)))
    }

    pub fn is_transform(&self) -> bool {
        self.chain()
            .any(|err| matches!(err.kind(), ErrorKind::Transform(_)))
    }

    pub fn is_type_conversion(&self) -> bool {
        self.chain()
            .any(|err| matches!(err.kind(), ErrorKind::TypeConversion(_)))
    }

    pub fn is_constraint(&self) -> bool {
        self.chain()
            .any(|err| matches!(err.kind(), ErrorKind::Constraint(_)))
    }

    pub fn is_migration(&self) -> bool {
        self.chain()
            .any(|err| matches!(err.kind(), ErrorKind::Migration(_)))
    }

    /// True for errors scoped to a single document: the document is
    /// skipped and counted, the table continues.
    pub fn is_document_fault(&self) -> bool {
        self.chain().any(|err| {
            matches!(
                err.kind(),
                ErrorKind::MissingField(_) | ErrorKind::Transform(_) | ErrorKind::TypeConversion(_)
            )
        })
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            Connection(err) => core::fmt::Display::fmt(err, f),
            Schema(err) => core::fmt::Display::fmt(err, f),
            SchemaCycle(err) => core::fmt::Display::fmt(err, f),
            MissingField(err) => core::fmt::Display::fmt(err, f),
            Transform(err) => core::fmt::Display::fmt(err, f),
            TypeConversion(err) => core::fmt::Display::fmt(err, f),
            Constraint(err) => core::fmt::Display::fmt(err, f),
            Migration(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown larder error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_size() {
        // Ensure Error stays at one word (size of pointer/Arc)
        let expected_size = core::mem::size_of::<usize>();
        assert_eq!(expected_size, core::mem::size_of::<Error>());
    }

    #[test]
    fn error_from_args() {
        let err = Error::from_args(format_args!("test error: {}", 42));
        assert_eq!(err.to_string(), "test error: 42");
    }

    #[test]
    fn error_chain_display() {
        let root = Error::constraint("duplicate key");
        let chained = root.context(err!("writing row 3"));
        assert_eq!(
            chained.to_string(),
            "writing row 3: constraint violation: duplicate key"
        );
    }

    #[test]
    fn classification_sees_through_context() {
        let err = Error::constraint("duplicate key").context(err!("writing row 3"));
        assert!(err.is_constraint());
        assert!(!err.is_document_fault());

        let err = Error::missing_field("users", "user_id", "id").context(err!("document 7"));
        assert!(err.is_document_fault());
        assert!(err.is_missing_field());
    }

    #[test]
    fn schema_cycle_display() {
        let err =
            Error::schema_cycle(["widgets".to_string(), "servers".to_string()]);
        assert_eq!(
            err.to_string(),
            "foreign key cycle involving tables: widgets, servers"
        );
        assert!(err.is_schema_cycle());
    }

    #[test]
    fn missing_field_display() {
        let err = Error::missing_field("users", "user_id", "id");
        assert_eq!(
            err.to_string(),
            "missing required field `id` for column `users.user_id`"
        );
    }

    #[test]
    fn migration_display() {
        let err = err!("relation does not exist").context(Error::migration("0002_add_index"));
        assert_eq!(
            err.to_string(),
            "migration `0002_add_index` failed: relation does not exist"
        );
        assert!(err.is_migration());
    }

    #[test]
    fn anyhow_bridge() {
        let anyhow_err = anyhow::anyhow!("something failed");
        let our_err: Error = anyhow_err.into();
        assert_eq!(our_err.to_string(), "something failed");
    }
}
