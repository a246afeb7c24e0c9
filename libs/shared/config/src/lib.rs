use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub port: u16,
    pub jwt_secret: String,
    pub triage_api_url: String,
    pub triage_api_key: String,
    pub triage_model: String,
    pub weekend_booking_allowed: bool,
    pub seed_demo_data: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            triage_api_url: env::var("TRIAGE_API_URL")
                .unwrap_or_else(|_| "https://api.groq.com/openai/v1".to_string()),
            triage_api_key: env::var("TRIAGE_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("TRIAGE_API_KEY not set, using empty value");
                    String::new()
                }),
            triage_model: env::var("TRIAGE_MODEL")
                .unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string()),
            weekend_booking_allowed: env::var("WEEKEND_BOOKING_ALLOWED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            seed_demo_data: env::var("SEED_DEMO_DATA")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty()
    }

    pub fn is_triage_configured(&self) -> bool {
        !self.triage_api_url.is_empty() && !self.triage_api_key.is_empty()
    }
}
