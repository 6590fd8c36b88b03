use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{debug_handler, Form};
use serde::Deserialize;
use sqlx::SqlitePool;
use time::{Date, Time};

use crate::{db, include_res, res, AppResult};

#[derive(Debug, Deserialize)]
pub(crate) struct NewEventQuery {
    error: Option<String>,
}

#[debug_handler]
pub(crate) async fn new_event_page(
    Query(NewEventQuery { error }): Query<NewEventQuery>,
) -> Response {
    Html(
        include_res!(str, "/pages/new_event.html")
            .replace("{error_block}", &res::inline_error(error.as_deref())),
    )
    .into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct NewEventForm {
    title: Option<String>,
    description: Option<String>,
    event_date: Option<String>,
    event_time: Option<String>,
    location: Option<String>,
}

#[debug_handler]
pub(crate) async fn create_event(
    State(db_pool): State<SqlitePool>,
    Form(form): Form<NewEventForm>,
) -> AppResult<Response> {
    let title = trimmed(form.title);
    let description = trimmed(form.description);
    let event_date = trimmed(form.event_date);
    let event_time = trimmed(form.event_time);
    let location = trimmed(form.location);

    if title.is_empty() || description.is_empty() || event_date.is_empty() {
        return Ok(form_error("Title, description, and date required"));
    }
    let Ok(event_date) = Date::parse(&event_date, db::DATE_FMT) else {
        return Ok(form_error("Date must look like 2024-03-01"));
    };
    let event_time = if event_time.is_empty() {
        None
    } else {
        match parse_time(&event_time) {
            Some(t) => Some(t),
            None => return Ok(form_error("Time must look like 19:30")),
        }
    };
    let location = (!location.is_empty()).then_some(location);

    let id = db::insert_event(
        &db_pool,
        &db::NewEvent {
            title,
            description,
            event_date,
            event_time,
            location,
        },
    )
    .await?;
    tracing::info!(event_id = id, "event created");
    Ok(Redirect::to(&format!("/events/{id}")).into_response())
}

fn trimmed(field: Option<String>) -> String {
    field.map(|s| s.trim().to_string()).unwrap_or_default()
}

fn form_error(msg: &str) -> Response {
    Redirect::to(&format!("/events/new?error={}", urlencoding::encode(msg))).into_response()
}

// Accepts HH:MM the way date inputs submit it, plus an optional seconds part.
fn parse_time(raw: &str) -> Option<Time> {
    let mut parts = raw.split(':');
    let hour = parts.next()?.parse().ok()?;
    let minute = parts.next()?.parse().ok()?;
    let second = match parts.next() {
        Some(s) => s.parse().ok()?,
        None => 0,
    };
    Time::from_hms(hour, minute, second).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_time_accepts_common_forms() {
        assert_eq!(parse_time("20:00"), Some(Time::from_hms(20, 0, 0).unwrap()));
        assert_eq!(parse_time("08:15:30"), Some(Time::from_hms(8, 15, 30).unwrap()));
        assert_eq!(parse_time("25:00"), None);
        assert_eq!(parse_time("eightish"), None);
    }
}
