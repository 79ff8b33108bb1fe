use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                name        TEXT PRIMARY KEY,
                skill       TEXT NOT NULL,
                want        TEXT NOT NULL DEFAULT '',
                avatar      TEXT NOT NULL,
                balance     REAL NOT NULL DEFAULT 5.0,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE badges (
                user_name   TEXT NOT NULL REFERENCES users(name),
                badge       TEXT NOT NULL,
                granted_at  TEXT NOT NULL DEFAULT (datetime('now')),
                UNIQUE(user_name, badge)
            );

            CREATE TABLE messages (
                id          TEXT PRIMARY KEY,
                sender      TEXT NOT NULL,
                recipient   TEXT NOT NULL,
                text        TEXT NOT NULL,
                timestamp   TEXT NOT NULL
            );

            CREATE INDEX idx_messages_pair
                ON messages(sender, recipient, timestamp);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(version, 1);
    }
}
