use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Json, State};
use serde_json::Value;
use uuid::Uuid;

use super::Error;
use crate::application::server::AppState;
use crate::domain::{NewSubscription, SubscriptionRequest};
use common::err_context::ErrorContextExt;

/// POST handler for weather update subscriptions
#[tracing::instrument(
    name = "Adding a new subscription",
    skip(state, request),
    fields(
        request_id = %Uuid::new_v4(),
    )
)]
pub async fn subscribe(
    State(state): State<AppState>,
    request: Result<Form<SubscriptionRequest>, FormRejection>,
) -> Result<Json<Value>, Error> {
    let Form(request) = request
        .map_err(|rejection| rejection.body_text())
        .context("Could not parse subscription form")?;

    let subscription =
        NewSubscription::try_from(request).context("Could not get valid subscription")?;

    state
        .service
        .subscribe(subscription)
        .await
        .context("Could not subscribe")?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Subscription successful"
    })))
}
