pub mod history;
pub mod ledger;
pub mod play;

pub use history::{RefreshOutcome, load_history, refresh_history};
pub use ledger::{LedgerRead, append_ledger, read_ledger};
pub use play::{PlayOutcome, Session};
