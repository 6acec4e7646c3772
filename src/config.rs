use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub smtp: SmtpConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "fintrack".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "fintrack-users".into()),
            // Tokens are good for a week unless overridden.
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 7),
        };
        let smtp_username = std::env::var("SMTP_USERNAME").unwrap_or_default();
        let smtp = SmtpConfig {
            host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".into()),
            from: std::env::var("SMTP_FROM").unwrap_or_else(|_| smtp_username.clone()),
            username: smtp_username,
            password: std::env::var("SMTP_PASSWORD").unwrap_or_default(),
        };
        Ok(Self {
            database_url,
            jwt,
            smtp,
        })
    }
}
