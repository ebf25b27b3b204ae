use crate::Database;
use crate::models::{MessageRow, UserRow};
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Credential store --

    /// Insert a new credential record. Returns `false` when the username is
    /// already taken — uniqueness is enforced by the UNIQUE constraint inside
    /// the connection lock, so two racing registrations cannot both succeed.
    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let result = conn.execute(
                "INSERT INTO users (username, password) VALUES (?1, ?2)",
                (username, password_hash),
            );
            match result {
                Ok(_) => Ok(true),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    Ok(false)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, username))
    }

    pub fn user_exists(&self, username: &str) -> Result<bool> {
        Ok(self.get_user(username)?.is_some())
    }

    // -- Contact directory --

    /// Add a directional contact edge. Re-adding an existing edge is a no-op.
    pub fn add_contact(&self, owner: &str, contact: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO contacts (owner, contact) VALUES (?1, ?2)",
                (owner, contact),
            )?;
            Ok(())
        })
    }

    /// Remove a contact edge. Removing a non-existent edge is a no-op.
    pub fn remove_contact(&self, owner: &str, contact: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "DELETE FROM contacts WHERE owner = ?1 AND contact = ?2",
                (owner, contact),
            )?;
            Ok(())
        })
    }

    /// Contacts of `owner` in insertion order. Never reflects edges owned by
    /// anyone else.
    pub fn list_contacts(&self, owner: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT contact FROM contacts WHERE owner = ?1 ORDER BY id")?;
            let rows = stmt
                .query_map([owner], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;
            Ok(rows)
        })
    }

    // -- Conversation store --

    pub fn append_message(
        &self,
        conversation: &str,
        sender: &str,
        text: &str,
        sent_at: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (conversation, sender, text, sent_at) VALUES (?1, ?2, ?3, ?4)",
                (conversation, sender, text, sent_at),
            )?;
            Ok(())
        })
    }

    /// Full log for a conversation key, in append order. Empty when no
    /// message has ever been sent between the pair.
    pub fn conversation_messages(&self, conversation: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, conversation, sender, text, sent_at
                 FROM messages
                 WHERE conversation = ?1
                 ORDER BY id",
            )?;
            let rows = stmt
                .query_map([conversation], |row| {
                    Ok(MessageRow {
                        id: row.get(0)?,
                        conversation: row.get(1)?,
                        sender: row.get(2)?,
                        text: row.get(3)?,
                        sent_at: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn query_user(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, username, password, created_at FROM users WHERE username = ?1")?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;
    use palaver_types::models::conversation_key;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn duplicate_registration_keeps_one_record() {
        let db = db();
        assert!(db.create_user("alice", "hash-a").unwrap());
        assert!(!db.create_user("alice", "hash-b").unwrap());

        let user = db.get_user("alice").unwrap().unwrap();
        assert_eq!(user.password, "hash-a");
    }

    #[test]
    fn unknown_user_is_none() {
        let db = db();
        assert!(db.get_user("nobody").unwrap().is_none());
        assert!(!db.user_exists("nobody").unwrap());
    }

    #[test]
    fn contacts_are_directional() {
        let db = db();
        db.create_user("alice", "h").unwrap();
        db.create_user("bob", "h").unwrap();

        db.add_contact("alice", "bob").unwrap();

        assert_eq!(db.list_contacts("alice").unwrap(), vec!["bob"]);
        assert!(db.list_contacts("bob").unwrap().is_empty());
    }

    #[test]
    fn adding_a_contact_twice_is_idempotent() {
        let db = db();
        db.create_user("alice", "h").unwrap();
        db.create_user("bob", "h").unwrap();

        db.add_contact("alice", "bob").unwrap();
        db.add_contact("alice", "bob").unwrap();

        assert_eq!(db.list_contacts("alice").unwrap(), vec!["bob"]);
    }

    #[test]
    fn contacts_keep_insertion_order() {
        let db = db();
        for name in ["alice", "zoe", "bob", "carol"] {
            db.create_user(name, "h").unwrap();
        }
        db.add_contact("alice", "zoe").unwrap();
        db.add_contact("alice", "bob").unwrap();
        db.add_contact("alice", "carol").unwrap();

        assert_eq!(db.list_contacts("alice").unwrap(), vec!["zoe", "bob", "carol"]);
    }

    #[test]
    fn removing_a_missing_contact_is_a_noop() {
        let db = db();
        db.create_user("alice", "h").unwrap();
        db.remove_contact("alice", "bob").unwrap();
        assert!(db.list_contacts("alice").unwrap().is_empty());
    }

    #[test]
    fn history_is_pair_symmetric() {
        let db = db();
        db.create_user("alice", "h").unwrap();
        db.create_user("bob", "h").unwrap();

        db.append_message(&conversation_key("alice", "bob"), "alice", "hi", "2026-01-01 09:30:00")
            .unwrap();

        let from_alice = db.conversation_messages(&conversation_key("alice", "bob")).unwrap();
        let from_bob = db.conversation_messages(&conversation_key("bob", "alice")).unwrap();

        assert_eq!(from_alice.len(), 1);
        assert_eq!(from_bob.len(), 1);
        assert_eq!(from_alice[0].sender, "alice");
        assert_eq!(from_bob[0].sender, "alice");
        assert_eq!(from_alice[0].text, "hi");
    }

    #[test]
    fn messages_stay_in_append_order() {
        let db = db();
        db.create_user("alice", "h").unwrap();
        db.create_user("bob", "h").unwrap();

        let key = conversation_key("alice", "bob");
        db.append_message(&key, "alice", "first", "2026-01-01 09:30:00").unwrap();
        db.append_message(&key, "alice", "second", "2026-01-01 09:31:00").unwrap();

        let log = db.conversation_messages(&key).unwrap();
        let texts: Vec<&str> = log.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn empty_conversation_is_empty_not_error() {
        let db = db();
        assert!(db.conversation_messages("alice_bob").unwrap().is_empty());
    }
}
