use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use super::auth::identity_from_headers;
use super::models::{ErrorResponse, HealthResponse, ProcessRequest};
use super::AppState;
use crate::pipeline::{PipelineAnswer, PipelineError};

type ErrorReply = (StatusCode, Json<ErrorResponse>);

pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        service: "askdb".to_string(),
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn status_for(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::AuthenticationMissing => StatusCode::UNAUTHORIZED,
        PipelineError::EmptyPrompt
        | PipelineError::RelevanceUnresolved
        | PipelineError::UnknownTable { .. } => StatusCode::BAD_REQUEST,
        PipelineError::UnsafeQuery { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        PipelineError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_reply(err: &PipelineError) -> ErrorReply {
    let status = status_for(err);
    if status.is_server_error() {
        log::error!("Pipeline failed: {}", err);
    } else {
        log::warn!("Request rejected ({}): {}", status.as_u16(), err);
    }
    (
        status,
        Json(ErrorResponse::new(err.user_message(), err.details())),
    )
}

pub async fn process_prompt_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<PipelineAnswer>, ErrorReply> {
    let identity = identity_from_headers(&headers);

    let prompt = match payload {
        Ok(Json(request)) => request.prompt,
        // Authentication is checked first even when the body is unreadable
        Err(_) if identity.is_none() => {
            return Err(error_reply(&PipelineError::AuthenticationMissing))
        }
        Err(rejection) => {
            log::warn!("Malformed request body: {}", rejection.body_text());
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    "Invalid request body",
                    Some(rejection.body_text()),
                )),
            ));
        }
    };

    state
        .pipeline
        .answer(identity.as_ref(), &prompt)
        .await
        .map(Json)
        .map_err(|e| error_reply(&e))
}
