use axum::extract::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthProbe {
    pub status: String,
}

/// The process is up and serving requests.
pub async fn liveness() -> Json<HealthProbe> {
    Json(HealthProbe {
        status: "ready".to_string(),
    })
}

/// The server is ready to accept requests.
pub async fn readiness() -> Json<HealthProbe> {
    Json(HealthProbe {
        status: "ready".to_string(),
    })
}
