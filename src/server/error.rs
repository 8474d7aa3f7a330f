use axum::{
    Json,
    http::StatusCode,
    response::{ IntoResponse, Response },
};
use log::{ warn, error };
use thiserror::Error;
use crate::agent::AgentError;
use crate::models::api::ErrorResponse;

pub const GENERIC_INTERNAL_ERROR: &str = "Internal server error";

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// `expose` decides whether `detail` reaches the client.
    #[error("Internal error: {detail}")]
    Internal {
        detail: String,
        expose: bool,
    },
}

impl ApiError {
    pub fn from_agent(err: AgentError, expose_internal_errors: bool) -> Self {
        match err {
            AgentError::EmptyMessage => ApiError::EmptyMessage,
            AgentError::Store(e) =>
                ApiError::Internal {
                    detail: e.to_string(),
                    expose: expose_internal_errors,
                },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::EmptyMessage | ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::EmptyMessage => {
                warn!("Rejected chat request: message is empty");
                "Message is empty".to_string()
            }
            ApiError::MalformedBody(text) => {
                warn!("Rejected chat request: {}", text);
                text
            }
            ApiError::Internal { detail, expose } => {
                error!("Internal error: {}", detail);
                if expose { detail } else { GENERIC_INTERNAL_ERROR.to_string() }
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
