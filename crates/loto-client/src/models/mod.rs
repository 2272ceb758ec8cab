pub mod drawing;
pub mod ledger;
pub mod schema;

pub use drawing::{DrawingRow, DrawingRowError};
pub use ledger::{LedgerRow, LedgerRowError, NewLedgerRow, TIMESTAMP_FORMAT};
