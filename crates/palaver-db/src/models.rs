/// Database row types — these map directly to SQLite rows.
/// Distinct from palaver-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub created_at: String,
}

pub struct MessageRow {
    pub id: i64,
    pub conversation: String,
    pub sender: String,
    pub text: String,
    pub sent_at: String,
}
