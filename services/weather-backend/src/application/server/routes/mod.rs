mod error;
pub mod confirmation;
pub mod health;
pub mod subscriptions;
pub mod unsubscribe;
pub mod weather;

use axum::http::Uri;
use axum::routing::{get, post, Router};

use super::AppState;

pub use self::error::Error;
use self::{
    confirmation::confirm, health::liveness, health::readiness, subscriptions::subscribe,
    unsubscribe::unsubscribe, weather::weather,
};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/api/weather", get(weather))
        .route("/api/subscribe", post(subscribe))
        .route("/api/confirm/:token", get(confirm))
        .route("/api/confirm/", get(missing_token))
        .route("/api/unsubscribe/:token", get(unsubscribe))
        .route("/api/unsubscribe/", get(missing_token))
        .with_state(state)
}

/// Handler for token routes called without a token.
async fn missing_token() -> Error {
    Error::InvalidToken {
        context: "Empty token".to_string(),
    }
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> Error {
    Error::NotFound {
        context: format!("No route for {}", uri.path()),
    }
}
