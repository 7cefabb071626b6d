use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

pub const DEFAULT_CAPTCHA_URL: &str = "https://www.google.com/recaptcha/api/siteverify";
pub const DEFAULT_SUGGEST_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct Config {
    pub port: u16,
    pub redis_url: String,
    pub captcha_url: String,
    pub captcha_secret: String,
    pub suggest_url: String,
    pub suggest_model: String,
    pub suggest_key: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "2000"),
            redis_url: must_load("REDIS_URL"),
            captcha_url: try_load("CAPTCHA_URL", DEFAULT_CAPTCHA_URL),
            captcha_secret: read_secret("CAPTCHA_SECRET"),
            suggest_url: try_load("SUGGEST_URL", DEFAULT_SUGGEST_URL),
            suggest_model: try_load("SUGGEST_MODEL", "gpt-4o-mini"),
            suggest_key: try_read_secret("SUGGEST_API_KEY"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn must_load(key: &str) -> String {
    env::var(key)
        .map_err(|_| {
            warn!("Required environment variable {key} not set");
        })
        .expect("Environment misconfigured!")
}

fn read_secret(secret_name: &str) -> String {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .expect("Secrets misconfigured!")
}

fn try_read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path).ok().map(|s| s.trim().to_string())
}
