//! `GET /models`: the models a client may pick from

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use super::AppState;

pub async fn list_models(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "models": state.models.catalog,
            "no_tool_models": state.models.no_tool_models,
        })),
    )
}
