use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tracing::info;

use skillswap_db::models::UserRow;
use skillswap_types::api::{LoginRequest, LoginResponse, UserQuery};
use skillswap_types::models::User;

use crate::error::ApiError;
use crate::state::{AppState, run_blocking};

/// POST /api/login: name-keyed upsert. There is no password: whoever
/// supplies a name acts as that user.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.name.trim().to_string();
    let skill = req.skill.trim().to_string();
    let want = req.want.trim().to_string();

    if name.is_empty() || skill.is_empty() {
        return Err(ApiError::Validation("Please enter Name and Skill".into()));
    }

    let avatar = User::avatar_for(&name);
    let row = run_blocking(move || state.db.upsert_user(&name, &skill, &want, &avatar)).await?;

    info!("User '{}' logged in (balance {:.1})", row.name, row.balance);
    Ok(Json(LoginResponse {
        user: user_from_row(row),
    }))
}

/// GET /api/users: the whole directory, optionally narrowed by `?q=`.
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = run_blocking(move || state.db.list_users()).await?;

    let term = query
        .q
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    let users: Vec<User> = rows
        .into_iter()
        .map(user_from_row)
        .filter(|u| term.as_deref().is_none_or(|t| matches_term(u, t)))
        .collect();

    Ok(Json(users))
}

/// GET /api/users/{name}
pub async fn get_user(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let lookup = name.clone();
    let row = run_blocking(move || state.db.get_user(&lookup))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Unknown user: {}", name)))?;

    Ok(Json(user_from_row(row)))
}

fn matches_term(user: &User, term: &str) -> bool {
    user.name.to_lowercase().contains(term) || user.skill.to_lowercase().contains(term)
}

fn user_from_row(row: UserRow) -> User {
    User {
        name: row.name,
        skill: row.skill,
        want: row.want,
        avatar: row.avatar,
        balance: row.balance,
        badges: row.badges,
    }
}
