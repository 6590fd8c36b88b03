use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::debug_handler;

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

#[debug_handler]
pub async fn stylesheet() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css")],
        include_res!(str, "/style.css"),
    )
}

#[debug_handler]
pub async fn admin_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript")],
        include_res!(str, "/admin_prompt.js"),
    )
}

pub fn not_found(what: &str) -> Response {
    (StatusCode::NOT_FOUND, format!("{what} not found.")).into_response()
}

/// `<p class="error">` block for a message echoed from the query string, or
/// nothing when there is no message.
pub fn inline_error(msg: Option<&str>) -> String {
    match msg {
        Some(msg) if !msg.is_empty() => format!("<p class=\"error\">{}</p>", escape(msg)),
        _ => String::new(),
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_markup_and_attribute_characters() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape("plain text"), "plain text");
    }

    #[test]
    fn inline_error_is_empty_without_a_message() {
        assert_eq!(inline_error(None), "");
        assert_eq!(inline_error(Some("")), "");
        assert_eq!(
            inline_error(Some("Name required")),
            "<p class=\"error\">Name required</p>"
        );
    }
}
