use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub notify_webhook_url: String,
    pub notify_webhook_token: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            notify_webhook_url: env::var("NOTIFY_WEBHOOK_URL")
                .unwrap_or_else(|_| "http://localhost:8000/api/v1/hooks/appointments".to_string()),
            notify_webhook_token: env::var("NOTIFY_WEBHOOK_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
        }
    }
}
