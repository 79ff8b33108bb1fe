use serde::{Deserialize, Serialize};

use crate::models::User;

// -- Directory --

/// Body of `POST /api/login`. Missing fields deserialize as empty strings so
/// that validation, not the JSON extractor, decides what is required.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub skill: String,
    #[serde(default)]
    pub want: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: User,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    /// Case-insensitive match against name or skill.
    pub q: Option<String>,
}

// -- Messages --

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub recipient: String,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "isTransaction", default)]
    pub is_transaction: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub user1: Option<String>,
    pub user2: Option<String>,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_request_defaults_to_plain_message() {
        let req: SendMessageRequest =
            serde_json::from_str(r#"{"sender":"a","recipient":"b","text":"hi"}"#).unwrap();
        assert!(!req.is_transaction);

        let req: SendMessageRequest = serde_json::from_str(
            r#"{"sender":"a","recipient":"b","text":"paid","isTransaction":true}"#,
        )
        .unwrap();
        assert!(req.is_transaction);
    }

    #[test]
    fn login_request_tolerates_missing_want() {
        let req: LoginRequest = serde_json::from_str(r#"{"name":"a","skill":"rust"}"#).unwrap();
        assert_eq!(req.want, "");
    }
}
