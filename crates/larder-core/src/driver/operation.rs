mod create_table;
pub use create_table::CreateTable;

mod insert;
pub use insert::Insert;

mod select;
pub use select::Select;

mod sql;
pub use sql::Sql;

/// A database operation issued against the destination.
#[derive(Debug)]
pub enum Operation {
    /// Ensure a relation exists with the table's columns and constraints.
    CreateTable(CreateTable),

    /// Write rows, optionally upserting on the table's unique column.
    Insert(Insert),

    /// Full-scan projection of a table.
    Select(Select),

    /// A raw statement; the escape hatch migration bodies use.
    Sql(Sql),
}
