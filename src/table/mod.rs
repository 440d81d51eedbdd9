mod loader;
mod raw;
mod schema;
mod schema_error;

pub use loader::{load, Table, TableRow};
pub use raw::{Cell, RawTable};
pub use schema::{ColumnName, ColumnSpec, HeaderMode, TableSchema};
pub use schema_error::{LoadError, SchemaError};
