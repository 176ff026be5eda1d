use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use knockout_models::TournamentError;
use tracing::error;

use crate::routes::ApiResponse;

/// Error half of every handler's result.
#[derive(Debug)]
pub enum ApiError {
    Tournament(TournamentError),
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Tournament(e) => match e {
                TournamentError::NotFound { .. } => StatusCode::NOT_FOUND,
                TournamentError::AlreadyStarted { .. }
                | TournamentError::MatchNotReady { .. }
                | TournamentError::DuplicateTeam { .. } => StatusCode::CONFLICT,
                TournamentError::InvalidTeamCount { .. } | TournamentError::InvalidTeam(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                TournamentError::DependencyUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
                TournamentError::Database(_)
                | TournamentError::Serialization(_)
                | TournamentError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Tournament(e) => e.kind(),
            ApiError::Internal(_) => "internal",
        }
    }
}

impl From<TournamentError> for ApiError {
    fn from(e: TournamentError) -> Self {
        ApiError::Tournament(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ApiError::Tournament(e) => e.to_string(),
            ApiError::Internal(message) => message.clone(),
        };
        if status.is_server_error() {
            error!("❌ {} ({})", message, self.kind());
        }

        let body = ApiResponse::<()> {
            success: false,
            data: None,
            message: None,
            error: Some(message),
            kind: Some(self.kind().to_string()),
        };
        (status, Json(body)).into_response()
    }
}
