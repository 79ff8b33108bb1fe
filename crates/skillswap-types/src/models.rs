use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Credit every user starts with on first login, in hours.
pub const STARTING_BALANCE: f64 = 5.0;

/// Hours moved by a single paid transaction.
pub const TRANSFER_AMOUNT: f64 = 1.0;

/// Badge granted to the recipient of any paid transaction.
pub const TOP_MENTOR_BADGE: &str = "Top Mentor";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub skill: String,
    pub want: String,
    pub avatar: String,
    pub balance: f64,
    pub badges: Vec<String>,
}

impl User {
    /// Avatar glyph for a display name: its first character, uppercased.
    pub fn avatar_for(name: &str) -> String {
        name.chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender: String,
    pub recipient: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}
