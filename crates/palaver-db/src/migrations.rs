use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY,
            username    TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS contacts (
            id          INTEGER PRIMARY KEY,
            owner       TEXT NOT NULL REFERENCES users(username),
            contact     TEXT NOT NULL REFERENCES users(username),
            added_at    TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(owner, contact)
        );

        CREATE INDEX IF NOT EXISTS idx_contacts_owner
            ON contacts(owner, id);

        -- Messages are keyed by the sorted username pair, not by a
        -- conversations table: the key itself identifies the conversation.
        CREATE TABLE IF NOT EXISTS messages (
            id              INTEGER PRIMARY KEY,
            conversation    TEXT NOT NULL,
            sender          TEXT NOT NULL REFERENCES users(username),
            text            TEXT NOT NULL,
            sent_at         TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_messages_conversation
            ON messages(conversation, id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
