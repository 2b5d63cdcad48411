use crate::doc::{Type, Value};

/// Declared description of one destination column, built at configuration
/// time. Compiled into an immutable [`ColumnSpec`] by
/// [`Schema::build`](crate::Schema::build).
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub(crate) name: String,
    pub(crate) source: Option<String>,
    pub(crate) ty: Type,
    pub(crate) unique: bool,
    pub(crate) required: bool,
    pub(crate) default: Option<String>,
    pub(crate) references: Option<(String, String)>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            source: None,
            ty,
            unique: false,
            required: false,
            default: None,
            references: None,
        }
    }

    /// Source document field this column reads from. Defaults to the
    /// destination column name.
    pub fn source(mut self, field: impl Into<String>) -> Self {
        self.source = Some(field.into());
        self
    }

    /// Marks this column as the table's natural key, used for upsert. A
    /// unique column is implicitly required.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// A document missing this column's source field (with no default
    /// declared) is skipped rather than stored with a null.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Literal used verbatim when the source value is absent or empty.
    /// SQL-quoted strings, `true`/`false`, and numerics parse to their
    /// scalar forms.
    pub fn default_literal(mut self, literal: impl Into<String>) -> Self {
        self.default = Some(literal.into());
        self
    }

    /// Declares a foreign key into another table's unique column, inducing
    /// a write-ordering dependency.
    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.references = Some((table.into(), column.into()));
        self
    }
}

/// Compiled, immutable description of one destination column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    /// The name of the column in the destination relation.
    pub name: String,

    /// Source document field the value is read from.
    pub source_field: String,

    /// Declared scalar type, used for DDL and coercion checks.
    pub ty: Type,

    /// True if this column is the table's upsert key.
    pub unique: bool,

    /// True if a document lacking this value is skipped.
    pub required: bool,

    /// Default applied when the source value is absent or empty.
    pub default: Option<Value>,

    /// Reference into another table's key column, if declared.
    pub foreign_key: Option<ForeignKeyTarget>,

    /// True if a registered transform overrides this column's value.
    pub has_transform: bool,
}

/// The target half of a declared foreign key, by destination names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyTarget {
    pub table: String,
    pub column: String,
}
