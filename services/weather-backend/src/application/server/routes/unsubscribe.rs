use axum::extract::rejection::PathRejection;
use axum::extract::{Json, Path, State};
use serde_json::Value;
use uuid::Uuid;

use super::Error;
use crate::application::server::AppState;
use common::err_context::ErrorContextExt;

/// GET handler removing a subscription, confirmed or not
#[tracing::instrument(
    name = "Unsubscribing with token",
    skip(state),
    fields(
        request_id = %Uuid::new_v4(),
    )
)]
pub async fn unsubscribe(
    State(state): State<AppState>,
    token: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, Error> {
    let Path(token) = token.map_err(|rejection| Error::InvalidToken {
        context: format!("Could not read unsubscribe token: {}", rejection.body_text()),
    })?;

    if token.trim().is_empty() {
        return Err(Error::InvalidToken {
            context: "Empty unsubscribe token".to_string(),
        });
    }

    state
        .service
        .unsubscribe(&token)
        .await
        .context("Could not unsubscribe")?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Unsubscribed successfully"
    })))
}
