//! User routes.
//!
//! ```text
//! GET /users/profile?userId=   → UserProfile | 404
//! GET /users/bookings?userId=  → [Booking], newest first
//! ```

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use carhire_core::Booking;
use carhire_db::UserProfile;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/profile", get(get_profile))
        .route("/users/bookings", get(list_bookings))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: String,
}

impl UserQuery {
    fn user_id(&self) -> ApiResult<&str> {
        let id = self.user_id.trim();
        if id.is_empty() {
            return Err(ApiError::BadRequest("userId is required".to_string()));
        }
        Ok(id)
    }
}

async fn get_profile(
    State(state): State<AppState>,
    params: Result<Query<UserQuery>, QueryRejection>,
) -> ApiResult<Json<UserProfile>> {
    let Query(params) = params?;
    let user_id = params.user_id()?;

    state
        .db
        .users()
        .get_by_id(user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("User not found: {}", user_id)))
}

async fn list_bookings(
    State(state): State<AppState>,
    params: Result<Query<UserQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Booking>>> {
    let Query(params) = params?;
    let user_id = params.user_id()?;

    let bookings = state.db.bookings().list_for_user(user_id).await?;
    debug!(user_id = %user_id, count = bookings.len(), "Bookings listed");
    Ok(Json(bookings))
}
