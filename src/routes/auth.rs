use axum::{
    extract::{Form, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::error::TodoError;
use crate::routes::views;
use crate::session::logout_cookie;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login_page() -> Html<String> {
    views::login_page(None)
}

pub async fn login(
    State(state): State<AppState>,
    Form(payload): Form<LoginRequest>,
) -> Result<Response, TodoError> {
    match state.accounts.verify(&payload.username, &payload.password).await {
        Ok(()) => {}
        Err(TodoError::Authentication) => {
            tracing::warn!(username = %payload.username, "login failed");
            return Ok((
                StatusCode::UNAUTHORIZED,
                views::login_page(Some("ログイン失敗")),
            )
                .into_response());
        }
        Err(e) => return Err(e),
    }

    let cookie = state.sessions.login_cookie(&payload.username)?;
    tracing::info!(username = %payload.username, "login succeeded");

    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}

/// Clears the session whether or not one existed
pub async fn logout() -> impl IntoResponse {
    ([(header::SET_COOKIE, logout_cookie())], Redirect::to("/login"))
}
