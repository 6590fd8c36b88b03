use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{debug_handler, Form};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::session::RsvpSession;
use crate::{db, res, AppResult};

#[derive(Debug, Deserialize)]
pub(crate) struct RsvpForm {
    name: Option<String>,
}

#[debug_handler]
pub(crate) async fn create_rsvp(
    State(db_pool): State<SqlitePool>,
    Path(id): Path<i64>,
    session: RsvpSession,
    Form(RsvpForm { name }): Form<RsvpForm>,
) -> AppResult<Response> {
    if db::find_event(&db_pool, id).await?.is_none() {
        let mut response = res::not_found("Event");
        session.write_cookie(response.headers_mut());
        return Ok(response);
    }

    let name = name.map(|n| n.trim().to_string()).unwrap_or_default();
    let mut response = if name.is_empty() {
        redirect_with_error(id, "Name required")
    } else if db::has_rsvped(&db_pool, id, &session.id).await? {
        redirect_with_error(id, "Only one RSVP per event")
    } else {
        match db::insert_rsvp(&db_pool, id, &name, &session.id).await {
            Ok(()) => {
                tracing::info!(event_id = id, "rsvp recorded");
                Redirect::to(&format!("/events/{id}")).into_response()
            }
            // The unique index catches the race the existence check can miss.
            Err(err) if is_unique_violation(&err) => {
                redirect_with_error(id, "Only one RSVP per event")
            }
            Err(err) => return Err(err.into()),
        }
    };

    session.write_cookie(response.headers_mut());
    Ok(response)
}

fn redirect_with_error(id: i64, msg: &str) -> Response {
    Redirect::to(&format!("/events/{id}?error={}", urlencoding::encode(msg))).into_response()
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
