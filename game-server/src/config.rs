use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub phraseset_path: String,
    pub static_dir: String,
    pub probe_interval_secs: u64,
    pub skip_throttle_ms: u64,
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8999".to_string())
                .parse()
                .expect("Invalid PORT"),
            phraseset_path: env::var("PHRASESET_PATH")
                .unwrap_or_else(|_| "./phrasesets/phrases.txt".to_string()),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "./client/public".to_string()),
            probe_interval_secs: env::var("PROBE_INTERVAL_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("Invalid PROBE_INTERVAL_SECS"),
            skip_throttle_ms: env::var("SKIP_THROTTLE_MS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("Invalid SKIP_THROTTLE_MS"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
