use larder_core::Error;

use std::{collections::HashMap, fmt};

/// Why a document or row was skipped instead of written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The destination rejected the row.
    Constraint,
    /// A required source field was absent with no default declared.
    MissingField,
    /// The column's transform failed.
    Transform,
    /// The computed value does not fit the declared column type.
    TypeConversion,
}

impl SkipReason {
    pub(crate) fn classify(err: &Error) -> Option<Self> {
        if err.is_transform() {
            Some(Self::Transform)
        } else if err.is_missing_field() {
            Some(Self::MissingField)
        } else if err.is_type_conversion() {
            Some(Self::TypeConversion)
        } else if err.is_constraint() {
            Some(Self::Constraint)
        } else {
            None
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constraint => f.write_str("constraint violation"),
            Self::MissingField => f.write_str("missing required field"),
            Self::Transform => f.write_str("transform failure"),
            Self::TypeConversion => f.write_str("type mismatch"),
        }
    }
}

/// Per-table outcome of a backup run.
#[derive(Debug, Default)]
pub struct TableReport {
    pub table: String,
    pub rows_written: u64,
    pub rows_skipped: u64,
    skips: HashMap<SkipReason, u64>,
}

impl TableReport {
    pub(crate) fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Default::default()
        }
    }

    pub(crate) fn record_written(&mut self) {
        self.rows_written += 1;
    }

    pub(crate) fn record_skip(&mut self, reason: SkipReason) {
        self.rows_skipped += 1;
        *self.skips.entry(reason).or_default() += 1;
    }

    pub fn skipped(&self, reason: SkipReason) -> u64 {
        self.skips.get(&reason).copied().unwrap_or(0)
    }

    pub fn skips(&self) -> impl Iterator<Item = (SkipReason, u64)> + '_ {
        self.skips.iter().map(|(reason, count)| (*reason, *count))
    }
}

/// Migration ids newly applied by a run.
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub applied: Vec<String>,
}

/// Overall outcome of [`Backup::run`](crate::Backup::run).
#[derive(Debug, Default)]
pub struct RunReport {
    pub tables: Vec<TableReport>,
    pub migrations: MigrationReport,

    /// True when the run was cancelled; tables processed before the
    /// cancellation are reported, migrations were not attempted.
    pub cancelled: bool,
}

impl RunReport {
    pub fn table(&self, name: &str) -> Option<&TableReport> {
        self.tables.iter().find(|report| report.table == name)
    }
}
