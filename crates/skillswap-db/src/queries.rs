use std::collections::HashMap;

use crate::Database;
use crate::models::{BadgeRow, MessageRow, UserRow};
use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use rusqlite::Connection;
use skillswap_types::models::{STARTING_BALANCE, TOP_MENTOR_BADGE, TRANSFER_AMOUNT};

/// Result of a paid transfer. Business-rule rejections are outcomes, not
/// errors: in every non-`Completed` case nothing was written.
pub enum TransferOutcome {
    Completed(MessageRow),
    /// Sender is unknown or holds less than one transfer's worth of credit.
    InsufficientCredit,
    UnknownRecipient,
}

impl Database {
    // -- Users --

    /// Create the user on first sight of `name`, otherwise overwrite skill and
    /// want only. Balance, badges and avatar survive later logins.
    pub fn upsert_user(&self, name: &str, skill: &str, want: &str, avatar: &str) -> Result<UserRow> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO users (name, skill, want, avatar, balance) VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(name) DO UPDATE SET skill = excluded.skill, want = excluded.want",
                rusqlite::params![name, skill, want, avatar, STARTING_BALANCE],
            )?;
            let user = query_user(&tx, name)?
                .ok_or_else(|| anyhow::anyhow!("User vanished after upsert: {}", name))?;
            tx.commit()?;
            Ok(user)
        })
    }

    pub fn get_user(&self, name: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, name))
    }

    /// Every user in registration order, badges attached.
    pub fn list_users(&self) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT name, skill, want, avatar, balance FROM users ORDER BY rowid",
            )?;
            let mut users = stmt
                .query_map([], |row| {
                    Ok(UserRow {
                        name: row.get(0)?,
                        skill: row.get(1)?,
                        want: row.get(2)?,
                        avatar: row.get(3)?,
                        balance: row.get(4)?,
                        badges: Vec::new(),
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            // One pass over the badge table instead of a query per user
            let mut badge_map: HashMap<String, Vec<String>> = HashMap::new();
            for b in query_all_badges(conn)? {
                badge_map.entry(b.user_name).or_default().push(b.badge);
            }
            for user in &mut users {
                if let Some(badges) = badge_map.remove(&user.name) {
                    user.badges = badges;
                }
            }

            Ok(users)
        })
    }

    // -- Messages --

    pub fn insert_message(
        &self,
        id: &str,
        sender: &str,
        recipient: &str,
        text: &str,
    ) -> Result<MessageRow> {
        self.with_conn(|conn| insert_message_row(conn, id, sender, recipient, text))
    }

    /// Both directions of the `user1`/`user2` conversation, oldest first.
    pub fn get_conversation(&self, user1: &str, user2: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, sender, recipient, text, timestamp
                 FROM messages
                 WHERE (sender = ?1 AND recipient = ?2) OR (sender = ?2 AND recipient = ?1)
                 ORDER BY timestamp ASC, rowid ASC",
            )?;

            let rows = stmt
                .query_map([user1, user2], |row| {
                    Ok(MessageRow {
                        id: row.get(0)?,
                        sender: row.get(1)?,
                        recipient: row.get(2)?,
                        text: row.get(3)?,
                        timestamp: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Ledger --

    /// Move one hour of credit from `sender` to `recipient`, grant the
    /// recipient the Top Mentor badge and log the transfer message.
    ///
    /// Everything runs in one SQLite transaction. The debit is a conditional
    /// update, so the balance check and the decrement cannot be split by a
    /// concurrent transfer and a sender never goes negative.
    pub fn transfer_credit(
        &self,
        message_id: &str,
        sender: &str,
        recipient: &str,
        text: &str,
    ) -> Result<TransferOutcome> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let debited = tx.execute(
                "UPDATE users SET balance = balance - ?1 WHERE name = ?2 AND balance >= ?1",
                rusqlite::params![TRANSFER_AMOUNT, sender],
            )?;
            if debited == 0 {
                // Dropping `tx` rolls back
                return Ok(TransferOutcome::InsufficientCredit);
            }

            let credited = tx.execute(
                "UPDATE users SET balance = balance + ?1 WHERE name = ?2",
                rusqlite::params![TRANSFER_AMOUNT, recipient],
            )?;
            if credited == 0 {
                return Ok(TransferOutcome::UnknownRecipient);
            }

            tx.execute(
                "INSERT OR IGNORE INTO badges (user_name, badge) VALUES (?1, ?2)",
                [recipient, TOP_MENTOR_BADGE],
            )?;

            let message = insert_message_row(&tx, message_id, sender, recipient, text)?;
            tx.commit()?;

            Ok(TransferOutcome::Completed(message))
        })
    }
}

fn query_user(conn: &Connection, name: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT name, skill, want, avatar, balance FROM users WHERE name = ?1")?;

    let row = stmt
        .query_row([name], |row| {
            Ok(UserRow {
                name: row.get(0)?,
                skill: row.get(1)?,
                want: row.get(2)?,
                avatar: row.get(3)?,
                balance: row.get(4)?,
                badges: Vec::new(),
            })
        })
        .optional()?;

    match row {
        Some(mut user) => {
            user.badges = query_badges(conn, name)?;
            Ok(Some(user))
        }
        None => Ok(None),
    }
}

fn query_badges(conn: &Connection, name: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT badge FROM badges WHERE user_name = ?1 ORDER BY rowid")?;
    let badges = stmt
        .query_map([name], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;
    Ok(badges)
}

fn query_all_badges(conn: &Connection) -> Result<Vec<BadgeRow>> {
    let mut stmt = conn.prepare("SELECT user_name, badge FROM badges ORDER BY rowid")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(BadgeRow {
                user_name: row.get(0)?,
                badge: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn insert_message_row(
    conn: &Connection,
    id: &str,
    sender: &str,
    recipient: &str,
    text: &str,
) -> Result<MessageRow> {
    // Fixed-width UTC timestamps so lexical order matches chronological order
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

    conn.execute(
        "INSERT INTO messages (id, sender, recipient, text, timestamp) VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![id, sender, recipient, text, timestamp],
    )?;

    Ok(MessageRow {
        id: id.to_string(),
        sender: sender.to_string(),
        recipient: recipient.to_string(),
        text: text.to_string(),
        timestamp,
    })
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
