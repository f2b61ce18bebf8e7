use axum::{
    extract::{Form, Query, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::error::TodoError;
use crate::routes::middleware_auth::SessionUser;
use crate::routes::views;
use crate::session::Identity;
use crate::state::AppState;
use crate::tasks::parse_task_id;
use super::{IdForm, TaskInput, UpdateForm};

// HANDLERS

/// Task list for a logged-in user, login form for anyone else
pub async fn index(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Response, TodoError> {
    let username = match identity {
        Identity::User(name) => name,
        Identity::Anonymous => return Ok(views::login_page(None).into_response()),
    };

    let tasks = state.tasks.list(&username).await?;
    Ok(views::task_list_page(&username, &tasks).into_response())
}

pub async fn create(
    State(state): State<AppState>,
    SessionUser(username): SessionUser,
    Form(input): Form<TaskInput>,
) -> Result<Redirect, TodoError> {
    state.tasks.add(&username, input).await?;
    Ok(Redirect::to("/"))
}

pub async fn toggle(
    State(state): State<AppState>,
    SessionUser(username): SessionUser,
    Form(form): Form<IdForm>,
) -> Result<Redirect, TodoError> {
    if form.id.trim().is_empty() {
        return Ok(Redirect::to("/"));
    }

    let id = parse_task_id(&form.id).ok_or_else(|| TodoError::not_found(&form.id))?;
    state.tasks.toggle(&username, id).await?;
    Ok(Redirect::to("/"))
}

/// Missing or unknown ids are ignored
pub async fn delete(
    State(state): State<AppState>,
    SessionUser(username): SessionUser,
    Form(form): Form<IdForm>,
) -> Result<Redirect, TodoError> {
    if let Some(id) = parse_task_id(&form.id) {
        state.tasks.delete(&username, id).await?;
    }
    Ok(Redirect::to("/"))
}

pub async fn edit(
    State(state): State<AppState>,
    SessionUser(username): SessionUser,
    Query(query): Query<IdForm>,
) -> Result<Response, TodoError> {
    let id = parse_task_id(&query.id).ok_or_else(|| TodoError::not_found(&query.id))?;
    let task = state.tasks.get(&username, id).await?;
    Ok(views::edit_page(&task).into_response())
}

pub async fn update(
    State(state): State<AppState>,
    SessionUser(username): SessionUser,
    Form(form): Form<UpdateForm>,
) -> Result<Redirect, TodoError> {
    let (raw_id, input) = form.into_parts();
    let id = parse_task_id(&raw_id).ok_or_else(|| TodoError::not_found(&raw_id))?;
    state.tasks.update(&username, id, input).await?;
    Ok(Redirect::to("/"))
}

/// GET on a mutating path never mutates
pub async fn redirect_home(_: SessionUser) -> Redirect {
    Redirect::to("/")
}
