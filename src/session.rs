use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap, HeaderValue};
use rand::Rng;

pub const SESSION_COOKIE: &str = "rsvp_session";

/// Opaque per-browser correlation token, carried in the `rsvp_session` cookie
/// and stored alongside RSVPs. Not an authenticated identity.
#[derive(Debug, Clone)]
pub struct RsvpSession {
    pub id: String,
    fresh: bool,
}

impl<S> FromRequestParts<S> for RsvpSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Infallible> {
        let raw = parts
            .headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        Ok(Self::from_cookie_header(raw))
    }
}

impl RsvpSession {
    fn from_cookie_header(raw: &str) -> Self {
        match cookie_value(raw, SESSION_COOKIE) {
            Some(id) if !id.is_empty() => Self { id, fresh: false },
            _ => Self {
                id: fresh_id(),
                fresh: true,
            },
        }
    }

    /// Appends a Set-Cookie header, but only when this request minted a new id.
    pub fn write_cookie(&self, headers: &mut HeaderMap) {
        if !self.fresh {
            return;
        }
        let cookie = format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.id);
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            headers.append(header::SET_COOKIE, value);
        }
    }
}

// Last occurrence wins on duplicate keys, mirroring a plain key/value fold
// over the header.
fn cookie_value(raw: &str, name: &str) -> Option<String> {
    let mut found = None;
    for part in raw.split(';') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        if key != name {
            continue;
        }
        found = Some(match urlencoding::decode(value) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => value.to_string(),
        });
    }
    found
}

fn fresh_id() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_cookie_is_reused_without_set_cookie() {
        let session = RsvpSession::from_cookie_header("foo=1; rsvp_session=abc123; bar=2");
        assert_eq!(session.id, "abc123");

        let mut headers = HeaderMap::new();
        session.write_cookie(&mut headers);
        assert!(headers.get(header::SET_COOKIE).is_none());
    }

    #[test]
    fn duplicate_cookie_keys_take_the_last_value() {
        let session = RsvpSession::from_cookie_header("rsvp_session=first; rsvp_session=second");
        assert_eq!(session.id, "second");
    }

    #[test]
    fn cookie_values_are_percent_decoded() {
        assert_eq!(
            cookie_value("other=x; rsvp_session=a%20b", SESSION_COOKIE),
            Some("a b".to_string())
        );
    }

    #[test]
    fn missing_cookie_mints_a_32_char_hex_id() {
        let session = RsvpSession::from_cookie_header("");
        assert_eq!(session.id.len(), 32);
        assert!(session.id.chars().all(|c| c.is_ascii_hexdigit()));

        let other = RsvpSession::from_cookie_header("rsvp_session=");
        assert_ne!(session.id, other.id);
    }

    #[test]
    fn fresh_session_sets_a_site_wide_lax_cookie() {
        let session = RsvpSession::from_cookie_header("");
        let mut headers = HeaderMap::new();
        session.write_cookie(&mut headers);

        let cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert_eq!(
            cookie,
            format!("rsvp_session={}; Path=/; HttpOnly; SameSite=Lax", session.id)
        );
    }
}
