use crate::models::DrawingRow;
use crate::models::schema::drawings;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

/// Insert rows whose date is not stored yet. Returns how many were new.
pub fn insert_drawings(conn: &mut SqliteConnection, rows: &[DrawingRow]) -> anyhow::Result<usize> {
    conn.transaction(|conn| {
        rows.iter().try_fold(0, |inserted, row| {
            diesel::insert_or_ignore_into(drawings::table)
                .values(row)
                .execute(conn)
                .map(|count| inserted + count)
        })
    })
    .map_err(|e| anyhow::anyhow!("Error inserting drawings: {e}"))
}

/// All drawings, oldest first.
pub fn load_drawings(conn: &mut SqliteConnection) -> anyhow::Result<Vec<DrawingRow>> {
    drawings::table
        .order(drawings::draw_date.asc())
        .select(DrawingRow::as_select())
        .load(conn)
        .map_err(|e| anyhow::anyhow!("Error loading drawings: {e}"))
}

/// The `limit` most recent drawings, newest first.
pub fn latest_drawings(conn: &mut SqliteConnection, limit: i64) -> anyhow::Result<Vec<DrawingRow>> {
    drawings::table
        .order(drawings::draw_date.desc())
        .limit(limit)
        .select(DrawingRow::as_select())
        .load(conn)
        .map_err(|e| anyhow::anyhow!("Error loading latest {limit} drawings: {e}"))
}

pub fn count_drawings(conn: &mut SqliteConnection) -> anyhow::Result<i64> {
    drawings::table
        .count()
        .get_result(conn)
        .map_err(|e| anyhow::anyhow!("Error counting drawings: {e}"))
}
