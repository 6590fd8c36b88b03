use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Response};
use axum::debug_handler;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::session::RsvpSession;
use crate::{db, include_res, res, AppResult};

#[derive(Debug, Deserialize)]
pub(crate) struct DetailQuery {
    error: Option<String>,
    admin_error: Option<String>,
    admin: Option<String>,
}

#[debug_handler]
pub(crate) async fn event_page(
    State(db_pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Query(DetailQuery {
        error,
        admin_error,
        admin,
    }): Query<DetailQuery>,
    session: RsvpSession,
) -> AppResult<Response> {
    let Some(event) = db::find_event(&db_pool, id).await? else {
        let mut response = res::not_found("Event");
        session.write_cookie(response.headers_mut());
        return Ok(response);
    };
    let rsvps = db::list_rsvps(&db_pool, id).await?;
    let already_rsvped = db::has_rsvped(&db_pool, id, &session.id).await?;

    // Carried through the form so a verified admin isn't re-prompted on every
    // action.
    let admin_value = res::escape(admin.as_deref().unwrap_or(""));

    let mut rsvp_items = String::new();
    for rsvp in &rsvps {
        rsvp_items += &include_res!(str, "/pages/rsvp_item.html")
            .replace("{id}", &rsvp.id.to_string())
            .replace("{name}", &res::escape(&rsvp.name))
            .replace("{admin_value}", &admin_value);
    }
    if rsvps.is_empty() {
        rsvp_items = "<li class=\"empty\">No one yet. Be the first!</li>".to_string();
    }

    let rsvp_form = if already_rsvped {
        "<p class=\"note\">You already RSVPed to this one.</p>".to_string()
    } else {
        include_res!(str, "/pages/rsvp_form.html").replace("{id}", &id.to_string())
    };

    let body = include_res!(str, "/pages/event.html")
        .replace("{error_block}", &res::inline_error(error.as_deref()))
        .replace("{admin_error_block}", &res::inline_error(admin_error.as_deref()))
        .replace("{title}", &res::escape(&event.title))
        .replace("{description}", &res::escape(&event.description))
        .replace("{date}", &event.date_string())
        .replace(
            "{time_row}",
            &event
                .time_string()
                .map(|t| format!("<dt>Time</dt><dd>{t}</dd>"))
                .unwrap_or_default(),
        )
        .replace(
            "{location_row}",
            &event
                .location
                .as_deref()
                .map(|l| format!("<dt>Where</dt><dd>{}</dd>", res::escape(l)))
                .unwrap_or_default(),
        )
        .replace("{rsvp_count}", &rsvps.len().to_string())
        .replace("{rsvp_items}", &rsvp_items)
        .replace("{rsvp_form}", &rsvp_form)
        .replace("{admin_value}", &admin_value)
        .replace("{id}", &id.to_string());

    let mut response = Html(body).into_response();
    session.write_cookie(response.headers_mut());
    Ok(response)
}
