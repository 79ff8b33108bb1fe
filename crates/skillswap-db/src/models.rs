//! Database row types. These map directly to SQLite rows and are kept apart
//! from the skillswap-types API models so the DB layer stays independent.

pub struct UserRow {
    pub name: String,
    pub skill: String,
    pub want: String,
    pub avatar: String,
    pub balance: f64,
    pub badges: Vec<String>,
}

pub struct MessageRow {
    pub id: String,
    pub sender: String,
    pub recipient: String,
    pub text: String,
    pub timestamp: String,
}

pub struct BadgeRow {
    pub user_name: String,
    pub badge: String,
}
