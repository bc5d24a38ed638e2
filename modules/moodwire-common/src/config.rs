use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Web server
    pub web_host: String,
    pub web_port: u16,

    // Scoring loop
    pub score_interval_secs: u64,

    // Headline source
    pub feed_max_age_days: i64,

    // Per-subscriber send queue depth
    pub send_queue_depth: usize,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if a variable fails to parse.
    pub fn from_env() -> Self {
        Self {
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
            score_interval_secs: env::var("SCORE_INTERVAL_SECS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .expect("SCORE_INTERVAL_SECS must be a number"),
            feed_max_age_days: env::var("FEED_MAX_AGE_DAYS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .expect("FEED_MAX_AGE_DAYS must be a number"),
            send_queue_depth: env::var("SEND_QUEUE_DEPTH")
                .unwrap_or_else(|_| "32".to_string())
                .parse()
                .expect("SEND_QUEUE_DEPTH must be a number"),
        }
    }
}
