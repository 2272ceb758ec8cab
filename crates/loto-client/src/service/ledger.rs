use diesel::sqlite::SqliteConnection;
use loto_combora::ledger::LedgerEntry;

use crate::db::ledger;
use crate::models::NewLedgerRow;

/// Persisted entries in insertion order, plus how many rows were unreadable.
#[derive(Debug, Clone, Default)]
pub struct LedgerRead {
    pub entries: Vec<LedgerEntry>,
    pub skipped: usize,
}

/// Malformed rows are skipped one by one, never failing the whole read.
pub fn read_ledger(conn: &mut SqliteConnection) -> anyhow::Result<LedgerRead> {
    let rows = ledger::load_rows(conn)?;
    let mut read = LedgerRead::default();
    for row in &rows {
        match row.to_entry() {
            Ok(entry) => read.entries.push(entry),
            Err(e) => {
                log::warn!("Skipping ledger row {}: {e}", row.id);
                read.skipped += 1;
            }
        }
    }
    Ok(read)
}

/// Append `entries` in order, all or nothing. Failures are logged.
pub fn append_ledger(conn: &mut SqliteConnection, entries: &[LedgerEntry]) -> bool {
    let rows: Vec<NewLedgerRow> = entries.iter().map(NewLedgerRow::from_entry).collect();
    match ledger::insert_rows(conn, &rows) {
        Ok(count) => {
            log::debug!("Appended {count} entries to the ledger");
            true
        }
        Err(e) => {
            log::error!("{e:#}");
            false
        }
    }
}
