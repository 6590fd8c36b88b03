/// Environment-level configuration, read once in `main`.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub admin_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url = match dotenv::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => url,
            _ => {
                tracing::warn!("DATABASE_URL is not set, falling back to ./gatherly.db");
                "sqlite://gatherly.db".to_string()
            }
        };

        let port = dotenv::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let admin_token = dotenv::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty());
        if admin_token.is_none() {
            tracing::warn!("ADMIN_TOKEN is not set, admin actions are disabled");
        }

        Self {
            database_url,
            port,
            admin_token,
        }
    }
}
