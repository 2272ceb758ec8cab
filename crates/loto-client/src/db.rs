use diesel::connection::SimpleConnection as _;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use std::time::Duration;

pub mod drawings;
pub mod ledger;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS drawings (
    draw_date DATE PRIMARY KEY NOT NULL,
    ball1 INTEGER NOT NULL,
    ball2 INTEGER NOT NULL,
    ball3 INTEGER NOT NULL,
    ball4 INTEGER NOT NULL,
    ball5 INTEGER NOT NULL,
    ball6 INTEGER NOT NULL,
    bonus1 INTEGER NOT NULL,
    bonus2 INTEGER NOT NULL,
    created_time TIMESTAMP NOT NULL
);
CREATE TABLE IF NOT EXISTS ledger (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    generated_at TEXT NOT NULL,
    owner TEXT NOT NULL,
    ball1 INTEGER,
    ball2 INTEGER,
    ball3 INTEGER,
    ball4 INTEGER,
    ball5 INTEGER,
    ball6 INTEGER,
    bonus1 INTEGER,
    bonus2 INTEGER,
    total INTEGER
);
";

#[derive(Debug)]
struct SqliteConnectionCustomizer;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqliteConnectionCustomizer {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        use diesel::RunQueryDsl as _;

        // using WAL mode for better concurrency
        diesel::sql_query("PRAGMA journal_mode = WAL;")
            .execute(conn)
            .map_err(diesel::r2d2::Error::QueryError)?;

        // ! may lose the last transaction on crash
        diesel::sql_query("PRAGMA synchronous = NORMAL;")
            .execute(conn)
            .map_err(diesel::r2d2::Error::QueryError)?;

        // writers from other processes wait for the lock instead of failing
        diesel::sql_query("PRAGMA busy_timeout = 30000;")
            .execute(conn)
            .map_err(diesel::r2d2::Error::QueryError)?;

        diesel::sql_query("PRAGMA foreign_keys = ON;")
            .execute(conn)
            .map_err(diesel::r2d2::Error::QueryError)?;

        conn.batch_execute(SCHEMA)
            .map_err(diesel::r2d2::Error::QueryError)?;

        Ok(())
    }
}

/// Pool over `database_url`. Every connection gets the pragmas and the schema.
///
/// An in-memory database lives as long as its connection, so `:memory:`
/// should be opened with a size of one.
pub fn create_pool(database_url: &str, size: u32) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(size.max(1))
        .connection_timeout(Duration::from_secs(30))
        .connection_customizer(Box::new(SqliteConnectionCustomizer))
        .build(manager)
        .map_err(|e| {
            let err_message = format!("Error connecting to {database_url}: {e}");
            log::error!("{err_message}");
            anyhow::anyhow!("{err_message}")
        })
}

pub fn get_connection(pool: &DbPool) -> anyhow::Result<DbConnection> {
    pool.get()
        .map_err(|e| anyhow::anyhow!("Failed to get DB connection: {e}"))
}
