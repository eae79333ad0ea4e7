//! Database-only row types. The password hash never crosses into
//! symlog-types, so users stay out of the shared API models.

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: String,
}
