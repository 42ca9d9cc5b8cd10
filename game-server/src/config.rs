use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub reminder_interval_minutes: u64,
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("Invalid PORT"),
            reminder_interval_minutes: env::var("REMINDER_INTERVAL_MINUTES")
                .unwrap_or_else(|_| "1440".to_string())
                .parse()
                .expect("Invalid REMINDER_INTERVAL_MINUTES"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
