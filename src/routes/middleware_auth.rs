use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::Redirect,
};

use crate::session::Identity;
use crate::state::AppState;

impl FromRequestParts<AppState> for Identity {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(state.sessions.resolve(&parts.headers))
    }
}

/// Logged-in username. Anonymous requests are sent to the login page.
pub struct SessionUser(pub String);

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match state.sessions.resolve(&parts.headers) {
            Identity::User(name) => Ok(SessionUser(name)),
            Identity::Anonymous => Err(Redirect::to("/login")),
        }
    }
}
