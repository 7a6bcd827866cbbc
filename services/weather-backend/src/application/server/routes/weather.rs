use axum::extract::rejection::QueryRejection;
use axum::extract::{Json, Query, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Error;
use crate::application::server::AppState;
use crate::domain::Weather;
use common::err_context::ErrorContextExt;

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct WeatherRequest {
    pub city: Option<String>,
}

/// GET handler for the current weather in a city
#[tracing::instrument(
    name = "Fetching current weather",
    skip(state),
    fields(
        request_id = %Uuid::new_v4(),
    )
)]
pub async fn weather(
    State(state): State<AppState>,
    request: Result<Query<WeatherRequest>, QueryRejection>,
) -> Result<Json<Weather>, Error> {
    let Query(request) = request
        .map_err(|rejection| rejection.body_text())
        .context("Could not parse weather query")?;

    let city = request
        .city
        .filter(|city| !city.trim().is_empty())
        .ok_or_else(|| "missing 'city' query parameter".to_string())
        .context("Could not get city")?;

    let weather = state
        .service
        .weather_forecast(&city)
        .await
        .context(format!("Could not get weather for {city}"))?;

    Ok(Json(weather))
}
