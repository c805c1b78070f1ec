use std::{env, path::PathBuf, time::Duration};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/local_storage.json";
const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_ROLLOVER_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub api_url: String,
    pub api_timeout: Option<Duration>,
    pub rollover_interval: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env_parse("PORT").unwrap_or(DEFAULT_PORT);
        let data_path = env::var("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH));
        let api_url = env::var("HEALTH_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_timeout = env_parse("HEALTH_API_TIMEOUT_SECS").map(Duration::from_secs);
        let rollover_interval = env_parse("ROLLOVER_CHECK_SECS")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_ROLLOVER_SECS));

        Self {
            port,
            data_path,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_timeout,
            rollover_interval,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.trim().parse().ok())
}
