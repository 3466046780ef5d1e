use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use sweldo_core::AppError;
use tracing_subscriber::EnvFilter;

/// Runtime configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub app_url: String,
    pub app_host: String,
    pub app_port: u16,
    pub cookie_secure: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;

        let app_host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let app_port = env::var("APP_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3100);

        // Origin used to validate browser-submitted mutations.
        let app_url =
            env::var("APP_URL").unwrap_or_else(|_| format!("http://localhost:{app_port}"));

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|_| "false".to_owned())
            .eq_ignore_ascii_case("true");

        Ok(Self {
            migrate_only,
            database_url,
            app_url,
            app_host,
            app_port,
            cookie_secure,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.app_host).map_err(|error| {
            AppError::Internal(format!("invalid APP_HOST '{}': {error}", self.app_host))
        })?;

        Ok(SocketAddr::from((host, self.app_port)))
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

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}
