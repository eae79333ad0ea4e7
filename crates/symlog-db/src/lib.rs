pub mod models;
pub mod queries;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Handle to the SQLite file holding symptoms, users, posts and comments.
///
/// Holds no open connection: every operation opens its own and closes it
/// when done.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)
            .with_context(|| format!("Failed to open database at {}", self.path.display()))?;
        schema::configure(&conn)?;
        debug!("Opened connection to {}", self.path.display());
        Ok(conn)
    }

    /// Create the four tables if they are missing. Safe to call on every start.
    pub fn ensure_schema(&self) -> Result<()> {
        self.with_conn(schema::ensure)?;
        info!("Database ready at {}", self.path.display());
        Ok(())
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.connect()?;
        f(&conn)
    }
}
