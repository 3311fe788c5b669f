use serde::{Deserialize, Serialize};

use crate::services::AnalysisError;

/// Inbound analysis request body.
#[derive(Debug, Deserialize, Serialize)]
pub struct AnalyzeRequest {
    #[serde(rename = "imageData")]
    pub image_data: String,
}

/// Structured error payload: human-readable message plus a stable code the
/// UI can branch on.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<&'static str>,
}

impl ErrorResponse {
    pub fn from_error(e: &AnalysisError) -> Self {
        Self {
            error: e.to_string(),
            code: e.code(),
            details: e.details(),
        }
    }
}

// Axum integration (optional - requires axum dependency)
#[cfg(feature = "http-server")]
pub mod server {
    use super::*;
    use axum::{
        extract::State,
        http::{header, HeaderName, Method, StatusCode},
        response::IntoResponse,
        routing::{get, post},
        Json, Router,
    };
    use std::sync::Arc;
    use tower_http::cors::{Any, CorsLayer};

    use crate::handlers::AnalysisHandler;

    pub struct AppState {
        pub analysis_handler: Arc<AnalysisHandler>,
    }

    pub fn create_router(analysis_handler: Arc<AnalysisHandler>) -> Router {
        let state = Arc::new(AppState { analysis_handler });

        // Browser callers preflight with OPTIONS; answer those independent
        // of business logic.
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                HeaderName::from_static("x-client-info"),
                HeaderName::from_static("apikey"),
            ]);

        Router::new()
            .route("/", get(root_handler))
            .route("/analyze", post(analyze_handler))
            .route("/health", get(health_check))
            .layer(cors)
            .with_state(state)
    }

    async fn analyze_handler(
        State(state): State<Arc<AppState>>,
        Json(request): Json<AnalyzeRequest>,
    ) -> axum::response::Response {
        match state.analysis_handler.analyze(&request.image_data).await {
            Ok(result) => (StatusCode::OK, Json(result)).into_response(),
            Err(e) => {
                log::error!("❌ Analysis request failed: {}", e);
                (status_for_error(&e), Json(ErrorResponse::from_error(&e))).into_response()
            }
        }
    }

    fn status_for_error(e: &AnalysisError) -> StatusCode {
        match e {
            AnalysisError::MissingInput => StatusCode::BAD_REQUEST,
            AnalysisError::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            AnalysisError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AnalysisError::QuotaExceeded => StatusCode::PAYMENT_REQUIRED,
            AnalysisError::Inference(_) | AnalysisError::EmptyResponse => StatusCode::BAD_GATEWAY,
        }
    }

    async fn root_handler() -> &'static str {
        "Recycling Scan API - POST an image to /analyze for a recycling assessment"
    }

    async fn health_check() -> &'static str {
        "OK"
    }

}
