//! In-memory table engine for asset integrity records: search, column
//! filters, three-state sort, pagination, column visibility, CSV export and
//! a two-phase delete.
//!
//! ```
//! use assetdesk::{ColumnSpec, Record, TableEngine};
//!
//! let records = vec![
//!     Record::new().with("name", "Pump A").with("status", "Active"),
//!     Record::new().with("name", "Pump B").with("status", "Inactive"),
//! ];
//! let columns = vec![ColumnSpec::new("name", "Name"), ColumnSpec::new("status", "Status")];
//! let mut table = TableEngine::new(records, columns);
//!
//! table.set_search_term("pump");
//! table.set_filter("status", "Active");
//! assert_eq!(table.view().total, 1);
//! ```

pub mod column;
pub mod delete;
pub mod error;
pub mod export;
pub mod filter;
pub mod hooks;
pub mod pager;
pub mod record;
pub mod sort;
pub mod table;
pub mod value;

pub use column::ColumnSpec;
pub use delete::{DeleteFlow, DeleteSettled, PendingDelete};
pub use error::TableError;
pub use export::ExportOutcome;
pub use hooks::TableHooks;
pub use record::Record;
pub use sort::SortOrder;
pub use table::{Row, RowId, TableEngine, TableView};
pub use value::Value;
