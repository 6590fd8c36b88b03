use std::collections::HashMap;

use sqlx::SqlitePool;
use time::format_description::BorrowedFormatItem;
use time::macros::{format_description, time};
use time::{Date, Duration, OffsetDateTime, Time};

pub const DATE_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
pub const TIME_FMT: &[BorrowedFormatItem<'_>] = format_description!("[hour]:[minute]");

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub event_date: Date,
    pub event_time: Option<Time>,
    pub location: Option<String>,
}

impl Event {
    /// Calendar date in its normalized `YYYY-MM-DD` form.
    pub fn date_string(&self) -> String {
        self.event_date.format(DATE_FMT).unwrap_or_default()
    }

    pub fn time_string(&self) -> Option<String> {
        self.event_time.map(|t| t.format(TIME_FMT).unwrap_or_default())
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Rsvp {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub session_id: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub event_date: Date,
    pub event_time: Option<Time>,
    pub location: Option<String>,
}

pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

// session_id may be NULL on legacy/manual rows, so the one-RSVP-per-session
// index only covers rows that actually carry a session.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    event_date DATE NOT NULL,
    event_time TIME,
    location TEXT
);
CREATE TABLE IF NOT EXISTS rsvps (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    event_id INTEGER NOT NULL REFERENCES events(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    session_id TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
CREATE UNIQUE INDEX IF NOT EXISTS rsvps_event_session
    ON rsvps (event_id, session_id) WHERE session_id IS NOT NULL;
";

pub async fn create_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}

/// Inserts a few example events on first run so the calendar isn't empty.
pub async fn seed_if_empty(pool: &SqlitePool) -> sqlx::Result<()> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    let today = today();
    let seeds = [
        NewEvent {
            title: "Friday Game Night".to_string(),
            description: "Bring your co-op pick. We'll rotate between party games and a co-op run."
                .to_string(),
            event_date: today + Duration::days(2),
            event_time: Some(time!(20:00)),
            location: Some("Discord: #hangout".to_string()),
        },
        NewEvent {
            title: "Movie Club: Sci-Fi Night".to_string(),
            description: "Voting opens at 7pm. We start the stream at 8pm sharp. Popcorn required."
                .to_string(),
            event_date: today + Duration::days(6),
            event_time: Some(time!(20:00)),
            location: Some("Discord: #screening-room".to_string()),
        },
        NewEvent {
            title: "Sunday Chill & Catch-up".to_string(),
            description: "Low-key voice chat to talk about the week and plan upcoming stuff."
                .to_string(),
            event_date: today + Duration::days(10),
            event_time: Some(time!(18:30)),
            location: Some("Discord: #lounge".to_string()),
        },
    ];

    for seed in &seeds {
        insert_event(pool, seed).await?;
    }
    tracing::info!(count = seeds.len(), "seeded example events");
    Ok(())
}

pub async fn list_events(pool: &SqlitePool) -> sqlx::Result<Vec<Event>> {
    sqlx::query_as(
        "SELECT id, title, description, event_date, event_time, location FROM events
         ORDER BY event_date ASC, event_time ASC NULLS LAST",
    )
    .fetch_all(pool)
    .await
}

pub async fn list_upcoming(pool: &SqlitePool, today: Date, limit: i64) -> sqlx::Result<Vec<Event>> {
    sqlx::query_as(
        "SELECT id, title, description, event_date, event_time, location FROM events
         WHERE event_date >= ?
         ORDER BY event_date ASC, event_time ASC NULLS LAST
         LIMIT ?",
    )
    .bind(today)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn rsvp_counts(pool: &SqlitePool) -> sqlx::Result<HashMap<i64, i64>> {
    let rows: Vec<(i64, i64)> =
        sqlx::query_as("SELECT event_id, COUNT(*) FROM rsvps GROUP BY event_id")
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().collect())
}

pub async fn find_event(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Event>> {
    sqlx::query_as(
        "SELECT id, title, description, event_date, event_time, location FROM events WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn insert_event(pool: &SqlitePool, event: &NewEvent) -> sqlx::Result<i64> {
    sqlx::query_scalar(
        "INSERT INTO events (title, description, event_date, event_time, location)
         VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&event.title)
    .bind(&event.description)
    .bind(event.event_date)
    .bind(event.event_time)
    .bind(&event.location)
    .fetch_one(pool)
    .await
}

pub async fn list_rsvps(pool: &SqlitePool, event_id: i64) -> sqlx::Result<Vec<Rsvp>> {
    sqlx::query_as(
        "SELECT id, event_id, name, session_id, created_at FROM rsvps
         WHERE event_id = ? ORDER BY created_at ASC, id ASC",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await
}

pub async fn has_rsvped(pool: &SqlitePool, event_id: i64, session_id: &str) -> sqlx::Result<bool> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT 1 FROM rsvps WHERE event_id = ? AND session_id = ? LIMIT 1")
            .bind(event_id)
            .bind(session_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.is_some())
}

pub async fn insert_rsvp(
    pool: &SqlitePool,
    event_id: i64,
    name: &str,
    session_id: &str,
) -> sqlx::Result<()> {
    sqlx::query("INSERT INTO rsvps (event_id, name, session_id) VALUES (?, ?, ?)")
        .bind(event_id)
        .bind(name)
        .bind(session_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Owning event of an RSVP, if the RSVP exists.
pub async fn find_rsvp_event(pool: &SqlitePool, rsvp_id: i64) -> sqlx::Result<Option<i64>> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT event_id FROM rsvps WHERE id = ?")
        .bind(rsvp_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(event_id,)| event_id))
}

pub async fn delete_rsvp(pool: &SqlitePool, id: i64) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM rsvps WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Removes an event together with its RSVPs in one transaction.
pub async fn delete_event(pool: &SqlitePool, id: i64) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM rsvps WHERE event_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM events WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await
}
