use constant_time_eq::constant_time_eq;

/// Shared-secret capability for destructive actions.
///
/// Not an identity: whoever presents the token may delete events and RSVPs.
/// When no secret is configured the check fails closed for every candidate,
/// including the empty one.
#[derive(Debug, Clone)]
pub struct AdminToken(Option<String>);

impl AdminToken {
    pub fn new(secret: Option<String>) -> Self {
        Self(secret.filter(|s| !s.is_empty()))
    }

    pub fn disabled() -> Self {
        Self(None)
    }

    pub fn is_admin(&self, candidate: Option<&str>) -> bool {
        let Some(secret) = &self.0 else {
            return false;
        };
        let candidate = candidate.unwrap_or("").trim();
        !candidate.is_empty() && constant_time_eq(candidate.as_bytes(), secret.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_token_grants_admin() {
        let admin = AdminToken::new(Some("hunter2".into()));
        assert!(admin.is_admin(Some("hunter2")));
    }

    #[test]
    fn candidate_is_trimmed_before_comparison() {
        let admin = AdminToken::new(Some("hunter2".into()));
        assert!(admin.is_admin(Some("  hunter2\n")));
    }

    #[test]
    fn wrong_token_is_rejected() {
        let admin = AdminToken::new(Some("hunter2".into()));
        assert!(!admin.is_admin(Some("HUNTER2")));
        assert!(!admin.is_admin(Some("")));
        assert!(!admin.is_admin(None));
    }

    #[test]
    fn missing_secret_fails_closed_for_every_candidate() {
        for admin in [AdminToken::disabled(), AdminToken::new(Some(String::new()))] {
            assert!(!admin.is_admin(None));
            assert!(!admin.is_admin(Some("")));
            assert!(!admin.is_admin(Some("anything")));
        }
    }
}
