use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use tracing::{info, warn};
use uuid::Uuid;

use skillswap_db::TransferOutcome;
use skillswap_db::models::MessageRow;
use skillswap_types::api::{HistoryQuery, SendMessageRequest, SendMessageResponse};
use skillswap_types::models::{Message, TRANSFER_AMOUNT};

use crate::error::ApiError;
use crate::state::{AppState, run_blocking};

/// POST /api/messages: plain note, or a paid transfer when `isTransaction`
/// is set. Sender and recipient names are not checked for plain notes.
pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message_id = Uuid::new_v4().to_string();
    let SendMessageRequest {
        sender,
        recipient,
        text,
        is_transaction,
    } = req;

    if !is_transaction {
        run_blocking(move || state.db.insert_message(&message_id, &sender, &recipient, &text))
            .await?;
        return Ok(Json(SendMessageResponse { success: true }));
    }

    let (from, to) = (sender.clone(), recipient.clone());
    let outcome =
        run_blocking(move || state.db.transfer_credit(&message_id, &from, &to, &text)).await?;

    match outcome {
        TransferOutcome::Completed(_) => {
            info!("'{}' paid '{}' {:.1} hour(s)", sender, recipient, TRANSFER_AMOUNT);
            Ok(Json(SendMessageResponse { success: true }))
        }
        TransferOutcome::InsufficientCredit => {
            warn!("Rejected transfer from '{}' to '{}': insufficient credit", sender, recipient);
            Err(ApiError::InsufficientCredit)
        }
        TransferOutcome::UnknownRecipient => {
            warn!("Rejected transfer from '{}': unknown recipient '{}'", sender, recipient);
            Err(ApiError::NotFound(format!("Unknown recipient: {}", recipient)))
        }
    }
}

/// GET /api/messages?user1=&user2=: the full conversation, oldest first.
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(user1), Some(user2)) = (query.user1, query.user2) else {
        return Err(ApiError::Validation("user1 and user2 are required".into()));
    };
    if user1.is_empty() || user2.is_empty() {
        return Err(ApiError::Validation("user1 and user2 are required".into()));
    }

    let rows = run_blocking(move || state.db.get_conversation(&user1, &user2)).await?;
    let messages: Vec<Message> = rows.into_iter().map(message_from_row).collect();

    Ok(Json(messages))
}

fn message_from_row(row: MessageRow) -> Message {
    Message {
        id: row.id.parse().unwrap_or_else(|e| {
            warn!("Corrupt message id '{}': {}", row.id, e);
            Uuid::default()
        }),
        timestamp: row
            .timestamp
            .parse::<chrono::DateTime<chrono::Utc>>()
            .unwrap_or_else(|e| {
                warn!("Corrupt timestamp '{}' on message '{}': {}", row.timestamp, row.id, e);
                chrono::DateTime::default()
            }),
        sender: row.sender,
        recipient: row.recipient,
        text: row.text,
    }
}
