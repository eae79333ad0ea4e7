use crate::Database;
use crate::models::UserRow;
use anyhow::Result;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};
use symlog_types::models::{ANONYMOUS, Comment, Post, PostSummary, Symptom};

/// Format of every server-generated timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

impl Database {
    // -- Symptoms --

    pub fn insert_symptom(&self, name: &str, severity: i64, notes: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO symptoms (name, severity, notes, date_added) VALUES (?1, ?2, ?3, ?4)",
                params![name, severity, notes, now()],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// All symptoms, newest id first.
    pub fn list_symptoms(&self) -> Result<Vec<Symptom>> {
        self.with_conn(|conn| {
            query_symptoms(conn, "SELECT * FROM symptoms ORDER BY id DESC", params![])
        })
    }

    /// The `limit` most recently logged symptoms, most recent first.
    pub fn recent_symptoms(&self, limit: i64) -> Result<Vec<Symptom>> {
        self.with_conn(|conn| {
            query_symptoms(
                conn,
                "SELECT * FROM symptoms ORDER BY date_added DESC, id DESC LIMIT ?1",
                [limit],
            )
        })
    }

    pub fn export_symptoms(&self) -> Result<Vec<Symptom>> {
        self.with_conn(|conn| {
            query_symptoms(
                conn,
                "SELECT * FROM symptoms ORDER BY date_added DESC, id DESC",
                params![],
            )
        })
    }

    /// Returns the number of rows removed; deleting a missing id is not an error.
    pub fn delete_symptom(&self, id: i64) -> Result<usize> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM symptoms WHERE id = ?1", [id])?))
    }

    // -- Users --

    /// Insert a user and return its id, or `None` if the username is taken.
    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            if query_user_by_username(conn, username)?.is_some() {
                return Ok(None);
            }

            let inserted = conn.execute(
                "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)",
                params![username, password_hash, now()],
            );

            match inserted {
                Ok(_) => Ok(Some(conn.last_insert_rowid())),
                // Lost a race against a concurrent register of the same name
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    // -- Posts --

    pub fn insert_post(&self, user_id: Option<i64>, content: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO posts (user_id, content, created_at) VALUES (?1, ?2, ?3)",
                params![user_id, content, now()],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_post(&self, id: i64) -> Result<Option<Post>> {
        self.with_conn(|conn| {
            let post = conn
                .query_row(
                    "SELECT p.id, p.user_id, u.username, p.content, p.created_at
                     FROM posts p
                     LEFT JOIN users u ON u.id = p.user_id
                     WHERE p.id = ?1",
                    [id],
                    post_from_row,
                )
                .optional()?;
            Ok(post)
        })
    }

    /// Every post, newest first, with its comment count aggregated in the query.
    pub fn list_posts(&self) -> Result<Vec<PostSummary>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT p.id, p.user_id, u.username, p.content, p.created_at,
                        COUNT(c.id) AS comment_count
                 FROM posts p
                 LEFT JOIN comments c ON c.post_id = p.id
                 LEFT JOIN users u ON u.id = p.user_id
                 GROUP BY p.id
                 ORDER BY p.created_at DESC, p.id DESC",
            )?;

            let rows = stmt
                .query_map([], |row| {
                    Ok(PostSummary {
                        id: row.get("id")?,
                        user_id: row.get("user_id")?,
                        username: username_or_anonymous(row)?,
                        content: text(row, "content")?,
                        created_at: text(row, "created_at")?,
                        comment_count: row.get("comment_count")?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Comments --

    /// The post id is stored as given; no check that the post exists.
    pub fn insert_comment(&self, post_id: i64, user_id: Option<i64>, content: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO comments (post_id, user_id, content, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![post_id, user_id, content, now()],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_comment(&self, id: i64) -> Result<Option<Comment>> {
        self.with_conn(|conn| {
            let comment = conn
                .query_row(
                    "SELECT c.id, c.post_id, c.user_id, u.username, c.content, c.created_at
                     FROM comments c
                     LEFT JOIN users u ON u.id = c.user_id
                     WHERE c.id = ?1",
                    [id],
                    comment_from_row,
                )
                .optional()?;
            Ok(comment)
        })
    }

    /// Comments on a post, oldest first.
    pub fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.post_id, c.user_id, u.username, c.content, c.created_at
                 FROM comments c
                 LEFT JOIN users u ON u.id = c.user_id
                 WHERE c.post_id = ?1
                 ORDER BY c.created_at ASC, c.id ASC",
            )?;

            let rows = stmt
                .query_map([post_id], comment_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}

fn query_symptoms<P: rusqlite::Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<Symptom>> {
    let mut stmt = conn.prepare(sql)?;

    let rows = stmt
        .query_map(params, |row| {
            Ok(Symptom {
                id: row.get("id")?,
                name: row.get("name")?,
                severity: row.get::<_, Option<i64>>("severity")?.unwrap_or(0),
                notes: row.get("notes")?,
                date_added: text(row, "date_added")?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let row = conn
        .query_row(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = ?1",
            [username],
            |row| {
                Ok(UserRow {
                    id: row.get("id")?,
                    username: text(row, "username")?,
                    password_hash: text(row, "password_hash")?,
                    created_at: text(row, "created_at")?,
                })
            },
        )
        .optional()?;

    Ok(row)
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        username: username_or_anonymous(row)?,
        content: text(row, "content")?,
        created_at: text(row, "created_at")?,
    })
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get("id")?,
        post_id: row.get::<_, Option<i64>>("post_id")?.unwrap_or_default(),
        user_id: row.get("user_id")?,
        username: username_or_anonymous(row)?,
        content: text(row, "content")?,
        created_at: text(row, "created_at")?,
    })
}

// Text columns are declared without NOT NULL; read NULL as empty.
fn text(row: &Row<'_>, column: &str) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(column)?.unwrap_or_default())
}

fn username_or_anonymous(row: &Row<'_>) -> rusqlite::Result<String> {
    Ok(row
        .get::<_, Option<String>>("username")?
        .unwrap_or_else(|| ANONYMOUS.to_string()))
}
