use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Response};
use axum::debug_handler;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::calendar::{self, MonthCursor};
use crate::{db, include_res, res, AppResult};

#[derive(Debug, Deserialize)]
pub(crate) struct HomeQuery {
    month: Option<String>,
}

#[debug_handler]
pub(crate) async fn home(
    State(db_pool): State<SqlitePool>,
    Query(HomeQuery { month }): Query<HomeQuery>,
) -> AppResult<Response> {
    let today = db::today();
    let events = db::list_events(&db_pool).await?;
    let upcoming = db::list_upcoming(&db_pool, today, 6).await?;
    let counts = db::rsvp_counts(&db_pool).await?;

    let cursor = month
        .as_deref()
        .and_then(MonthCursor::parse)
        .unwrap_or_else(|| MonthCursor::containing(today));
    let view = calendar::month_view(&events, cursor, today);

    let mut upcoming_items = String::new();
    for event in &upcoming {
        upcoming_items += &include_res!(str, "/pages/upcoming_item.html")
            .replace("{id}", &event.id.to_string())
            .replace("{title}", &res::escape(&event.title))
            .replace("{date}", &event.date_string())
            .replace(
                "{time}",
                &event
                    .time_string()
                    .map(|t| format!(" at {t}"))
                    .unwrap_or_default(),
            )
            .replace(
                "{location}",
                &res::escape(event.location.as_deref().unwrap_or("Somewhere to be decided")),
            );
    }
    if upcoming.is_empty() {
        upcoming_items = "<li class=\"empty\">Nothing planned yet. Start something!</li>".to_string();
    }

    let mut event_rows = String::new();
    for event in &events {
        event_rows += &include_res!(str, "/pages/event_row.html")
            .replace("{id}", &event.id.to_string())
            .replace("{title}", &res::escape(&event.title))
            .replace("{date}", &event.date_string())
            .replace("{time}", &event.time_string().unwrap_or_default())
            .replace(
                "{location}",
                &res::escape(event.location.as_deref().unwrap_or("")),
            )
            .replace(
                "{count}",
                &counts.get(&event.id).copied().unwrap_or(0).to_string(),
            );
    }

    let body = include_res!(str, "/pages/index.html")
        .replace("{upcoming_items}", &upcoming_items)
        .replace("{calendar}", &calendar::render(&view))
        .replace("{prev_month}", &view.prev.query())
        .replace("{next_month}", &view.next.query())
        .replace("{event_rows}", &event_rows);

    Ok(Html(body).into_response())
}
