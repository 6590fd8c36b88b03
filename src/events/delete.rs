use axum::extract::rejection::FormRejection;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{debug_handler, Form};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::admin::AdminToken;
use crate::{db, res, AppResult, AppState};

const ADMIN_ERROR: &str = "Wrong credential. Are you sure you are authorized to do this?";

#[derive(Debug, Deserialize)]
pub(crate) struct AdminParams {
    admin: Option<String>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn delete_event(
    State(db_pool): State<SqlitePool>,
    State(admin): State<AdminToken>,
    Path(id): Path<i64>,
    Query(query): Query<AdminParams>,
    form: Result<Form<AdminParams>, FormRejection>,
) -> AppResult<Response> {
    let token = candidate(query, form);
    if !admin.is_admin(token.as_deref()) {
        // deliberately a redirect, not a 403: the warning renders inline on
        // the detail page
        return Ok(admin_error_redirect(id));
    }
    if db::find_event(&db_pool, id).await?.is_none() {
        return Ok(res::not_found("Event"));
    }

    db::delete_event(&db_pool, id).await?;
    tracing::info!(event_id = id, "event deleted");
    Ok(Redirect::to("/").into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn delete_rsvp(
    State(db_pool): State<SqlitePool>,
    State(admin): State<AdminToken>,
    Path(id): Path<i64>,
    Query(query): Query<AdminParams>,
    form: Result<Form<AdminParams>, FormRejection>,
) -> AppResult<Response> {
    let Some(event_id) = db::find_rsvp_event(&db_pool, id).await? else {
        return Ok(res::not_found("RSVP"));
    };

    let token = candidate(query, form);
    if !admin.is_admin(token.as_deref()) {
        return Ok(admin_error_redirect(event_id));
    }

    db::delete_rsvp(&db_pool, id).await?;
    tracing::info!(rsvp_id = id, event_id, "rsvp removed");

    // keep the verified token in the query string so further admin actions on
    // the detail page don't re-prompt
    let suffix = token
        .map(|t| format!("?admin={}", urlencoding::encode(t.trim())))
        .unwrap_or_default();
    Ok(Redirect::to(&format!("/events/{event_id}{suffix}")).into_response())
}

fn admin_error_redirect(event_id: i64) -> Response {
    Redirect::to(&format!(
        "/events/{event_id}?admin_error={}",
        urlencoding::encode(ADMIN_ERROR)
    ))
    .into_response()
}

// The token may arrive as a query parameter or a form field named `admin`;
// the query wins when both are present.
fn candidate(query: AdminParams, form: Result<Form<AdminParams>, FormRejection>) -> Option<String> {
    query
        .admin
        .filter(|t| !t.trim().is_empty())
        .or_else(|| form.ok().and_then(|Form(params)| params.admin))
}
