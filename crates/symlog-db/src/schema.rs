use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Per-connection settings. The bundled SQLite turns foreign key
/// enforcement on by default; the references stay declarative so comments
/// may point at posts that no longer exist.
pub fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "OFF")?;
    Ok(())
}

pub fn ensure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS symptoms (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            severity    INTEGER,
            notes       TEXT,
            date_added  TEXT
        );

        CREATE TABLE IF NOT EXISTS users (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            username        TEXT UNIQUE,
            password_hash   TEXT,
            created_at      TEXT
        );

        CREATE TABLE IF NOT EXISTS posts (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     INTEGER,
            content     TEXT,
            created_at  TEXT,
            FOREIGN KEY (user_id) REFERENCES users(id)
        );

        CREATE TABLE IF NOT EXISTS comments (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            post_id     INTEGER,
            user_id     INTEGER,
            content     TEXT,
            created_at  TEXT,
            FOREIGN KEY (post_id) REFERENCES posts(id),
            FOREIGN KEY (user_id) REFERENCES users(id)
        );
        ",
    )?;

    info!("Database schema ensured");
    Ok(())
}
