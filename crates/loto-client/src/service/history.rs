use chrono::NaiveDateTime;
use diesel::sqlite::SqliteConnection;
use loto_combora::loto::DrawingResult;
use serde::Serialize;

use crate::db::{self, DbPool, drawings};
use crate::models::DrawingRow;
use crate::source::HistorySource;

/// Stored drawings, oldest first. Corrupt rows are skipped with a warning.
pub fn try_load_history(conn: &mut SqliteConnection) -> anyhow::Result<Vec<DrawingResult>> {
    let rows = drawings::load_drawings(conn)?;
    Ok(rows
        .iter()
        .filter_map(|row| match row.to_drawing() {
            Ok(drawing) => Some(drawing),
            Err(e) => {
                log::warn!("Skipping stored drawing of {}: {e}", row.draw_date);
                None
            }
        })
        .collect())
}

/// Like [`try_load_history`], but an unreadable store counts as empty.
pub fn load_history(conn: &mut SqliteConnection) -> Vec<DrawingResult> {
    try_load_history(conn).unwrap_or_else(|e| {
        log::warn!("History unavailable, continuing without it: {e:#}");
        Vec::new()
    })
}

/// The `limit` most recent drawings, newest first.
pub fn recent_history(conn: &mut SqliteConnection, limit: i64) -> anyhow::Result<Vec<DrawingResult>> {
    let rows = drawings::latest_drawings(conn, limit)?;
    Ok(rows.iter().filter_map(|row| row.to_drawing().ok()).collect())
}

/// What a refresh did, reported instead of raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshOutcome {
    pub success: bool,
    pub message: String,
    pub inserted: usize,
}

impl RefreshOutcome {
    fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        log::error!("{message}");
        Self {
            success: false,
            message,
            inserted: 0,
        }
    }
}

/// Pull drawings from `source` and store the ones not seen before.
/// Safe to repeat: drawings are keyed by date.
pub async fn refresh_history(
    pool: &DbPool,
    source: &impl HistorySource,
    now: NaiveDateTime,
) -> RefreshOutcome {
    let fetched = match source.fetch().await {
        Ok(fetched) => fetched,
        Err(e) => return RefreshOutcome::failed(format!("{} source failed: {e:#}", source.name())),
    };
    if fetched.is_empty() {
        return RefreshOutcome::failed(format!("{} source returned no drawings", source.name()));
    }

    let rows: Vec<DrawingRow> = fetched
        .iter()
        .map(|drawing| DrawingRow::from_drawing(drawing, now))
        .collect();
    let stored = db::get_connection(pool).and_then(|mut conn| drawings::insert_drawings(&mut conn, &rows));

    match stored {
        Ok(inserted) => {
            let message = format!(
                "Stored {inserted} new drawings ({} fetched from {})",
                fetched.len(),
                source.name()
            );
            log::info!("{message}");
            RefreshOutcome {
                success: true,
                message,
                inserted,
            }
        }
        Err(e) => RefreshOutcome::failed(format!("Failed to store drawings: {e:#}")),
    }
}
