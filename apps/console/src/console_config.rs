use std::env;

use propvest_core::{AppError, AppResult};
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub api_base_url: String,
    pub session_token: String,
    pub user_id: String,
    pub http_timeout_ms: u64,
}

impl ConsoleConfig {
    pub fn load() -> AppResult<Self> {
        let api_base_url = env::var("PROPVEST_API_BASE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080".to_owned())
            .trim()
            .trim_end_matches('/')
            .to_owned();
        Url::parse(api_base_url.as_str()).map_err(|error| {
            AppError::Validation(format!(
                "invalid PROPVEST_API_BASE_URL '{api_base_url}': {error}"
            ))
        })?;

        let session_token = required_non_empty_env("PROPVEST_SESSION_TOKEN")?;
        let user_id = env::var("PROPVEST_USER_ID")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "me".to_owned());
        let http_timeout_ms = parse_env_u64("PROPVEST_HTTP_TIMEOUT_MS", 10_000)?;

        if http_timeout_ms == 0 {
            return Err(AppError::Validation(
                "PROPVEST_HTTP_TIMEOUT_MS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_base_url,
            session_token,
            user_id,
            http_timeout_ms,
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_non_empty_env(name: &str) -> AppResult<String> {
    let value = env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn parse_env_u64(name: &str, default: u64) -> AppResult<u64> {
    match env::var(name) {
        Ok(value) => value.trim().parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}
