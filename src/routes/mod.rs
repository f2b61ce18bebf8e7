use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

mod auth;
mod health;
pub mod middleware_auth;
mod tasks;
pub mod views;

pub use health::health;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::routes::index).post(tasks::routes::create))
        .route("/add", post(tasks::routes::create).get(tasks::routes::redirect_home))
        .route("/toggle", post(tasks::routes::toggle).get(tasks::routes::redirect_home))
        .route("/delete", post(tasks::routes::delete).get(tasks::routes::redirect_home))
        .route("/edit", get(tasks::routes::edit))
        .route("/update", post(tasks::routes::update).get(tasks::routes::redirect_home))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout).post(auth::logout))
        .route("/health", get(health))
}

/// Full application with request tracing, ready to serve.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
