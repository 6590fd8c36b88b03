mod delete;
mod detail;
mod home;
mod new;
mod rsvp;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/events/new", get(new::new_event_page))
        .route("/events", post(new::create_event))
        .route("/events/{id}", get(detail::event_page))
        .route("/events/{id}/rsvp", post(rsvp::create_rsvp))
        .route("/events/{id}/delete", post(delete::delete_event))
        .route("/rsvps/{id}/delete", post(delete::delete_rsvp))
}
