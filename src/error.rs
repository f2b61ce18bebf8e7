use axum::{http::StatusCode, response::{IntoResponse, Response}};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("invalid username or password")]
    Authentication,

    #[error("task not found: {0}")]
    NotFound(String),

    #[error("storage failure: {0}")]
    Storage(String),

    #[error("session token error: {0}")]
    Session(#[from] jsonwebtoken::errors::Error),
}

impl TodoError {
    pub fn not_found(id: impl ToString) -> Self {
        TodoError::NotFound(id.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            TodoError::Authentication => StatusCode::UNAUTHORIZED,
            TodoError::NotFound(_) => StatusCode::NOT_FOUND,
            TodoError::Storage(_) | TodoError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let message = match &self {
            TodoError::Authentication => "Invalid credentials",
            TodoError::NotFound(_) => "Task not found",
            TodoError::Storage(_) | TodoError::Session(_) => {
                tracing::error!(error = %self, "request failed");
                "Internal server error"
            }
        };

        (self.status(), message).into_response()
    }
}

impl From<sqlx::Error> for TodoError {
    fn from(e: sqlx::Error) -> Self {
        TodoError::Storage(format!("database: {e}"))
    }
}

impl From<std::io::Error> for TodoError {
    fn from(e: std::io::Error) -> Self {
        TodoError::Storage(format!("io: {e}"))
    }
}

impl From<serde_json::Error> for TodoError {
    fn from(e: serde_json::Error) -> Self {
        TodoError::Storage(format!("corrupt task file: {e}"))
    }
}
