use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

use super::migrations;

/// Open a connection to a database file, creating it and running the schema
/// migrations if it does not yet exist. Idempotent: opening an already
/// initialized path just configures the connection and returns.
///
/// Workspace discovery (locating the database file on disk) is a CLI-layer
/// concern; callers pass the path explicitly.
pub fn open(path: impl AsRef<Path>) -> Result<Connection> {
    let conn = Connection::open(path)?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Open a private in-memory database with the schema applied. Useful for
/// tests and for callers that don't need durability.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}
