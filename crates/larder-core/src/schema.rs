mod column;
pub use column::{ColumnDef, ColumnSpec, ForeignKeyTarget};

mod fk;
pub use fk::ForeignKeyRef;

mod registry;
pub use registry::Schema;

mod table;
pub use table::{TableDef, TableId, TableSchema};
