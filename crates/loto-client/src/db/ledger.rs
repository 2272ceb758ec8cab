use crate::models::schema::ledger;
use crate::models::{LedgerRow, NewLedgerRow};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

/// Append every row inside one transaction: all of them are stored or none.
pub fn insert_rows(conn: &mut SqliteConnection, rows: &[NewLedgerRow]) -> anyhow::Result<usize> {
    conn.transaction(|conn| {
        rows.iter().try_fold(0, |inserted, row| {
            diesel::insert_into(ledger::table)
                .values(row)
                .execute(conn)
                .map(|count| inserted + count)
        })
    })
    .map_err(|e| anyhow::anyhow!("Error appending to ledger: {e}"))
    .and_then(|count| {
        if count == rows.len() {
            Ok(count)
        } else {
            Err(anyhow::anyhow!(
                "Expected to append {} ledger rows, but appended {count}",
                rows.len()
            ))
        }
    })
}

/// Every row in insertion order.
pub fn load_rows(conn: &mut SqliteConnection) -> anyhow::Result<Vec<LedgerRow>> {
    ledger::table
        .order(ledger::id.asc())
        .select(LedgerRow::as_select())
        .load(conn)
        .map_err(|e| anyhow::anyhow!("Error loading ledger: {e}"))
}

pub fn count_rows(conn: &mut SqliteConnection) -> anyhow::Result<i64> {
    ledger::table
        .count()
        .get_result(conn)
        .map_err(|e| anyhow::anyhow!("Error counting ledger rows: {e}"))
}
