use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use bruteguard_application::LimitConfig;
use bruteguard_core::{AppError, AppResult};
use tracing_subscriber::EnvFilter;

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub redis_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub login_limit: i64,
    pub credential_limit: i64,
    pub address_limit: i64,
    pub window_seconds: u64,
}

impl ApiConfig {
    pub fn load() -> AppResult<Self> {
        let redis_url =
            env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379/".to_owned());
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let login_limit = limit_env("LOGIN_LIMIT", 10)?;
        let credential_limit = limit_env("CREDENTIAL_LIMIT", 5)?;
        let address_limit = limit_env("ADDRESS_LIMIT", 100)?;
        let window_seconds = env::var("WINDOW_SECONDS")
            .ok()
            .map(|value| {
                value.parse::<u64>().map_err(|error| {
                    AppError::Validation(format!("invalid WINDOW_SECONDS: {error}"))
                })
            })
            .transpose()?
            .unwrap_or(60);

        if window_seconds == 0 {
            return Err(AppError::Validation(
                "WINDOW_SECONDS must be at least 1".to_owned(),
            ));
        }

        Ok(Self {
            redis_url,
            api_host,
            api_port,
            login_limit,
            credential_limit,
            address_limit,
            window_seconds,
        })
    }

    /// Builds the validated engine limits from the loaded values.
    pub fn limits(&self) -> AppResult<LimitConfig> {
        LimitConfig::new(
            self.login_limit,
            self.credential_limit,
            self.address_limit,
            Duration::from_secs(self.window_seconds),
        )
    }

    pub fn socket_address(&self) -> AppResult<SocketAddr> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
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

fn limit_env(name: &str, default: i64) -> AppResult<i64> {
    let value = match env::var(name) {
        Ok(value) => value
            .parse::<i64>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))?,
        Err(_) => default,
    };

    if value < 1 {
        return Err(AppError::Validation(format!(
            "{name} must be at least 1, got {value}"
        )));
    }

    Ok(value)
}
