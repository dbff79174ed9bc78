use std::env;
use anyhow::{Context, Result};

pub const DEFAULT_DATABASE_URL: &str = "memory://blog";
#[cfg(test)]
pub const DEFAULT_TEST_DATABASE_URL: &str = "memory://test";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub spanner_emulator_host: Option<String>,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let spanner_emulator_host = env::var("SPANNER_EMULATOR_HOST").ok();

        let service_port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number (0-65535)")?;

        let service_host = env::var("HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string());

        Ok(Config {
            database_url,
            spanner_emulator_host,
            service_port,
            service_host,
        })
    }

    /// Store address used by the test harness
    #[cfg(test)]
    pub fn test_database_url() -> String {
        env::var("TEST_DATABASE_URL")
            .unwrap_or_else(|_| DEFAULT_TEST_DATABASE_URL.to_string())
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Database: {}", self.database_url);
        tracing::info!("  Spanner emulator: {}",
            self.spanner_emulator_host.as_deref().unwrap_or("disabled (using production)"));
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Tests in this module mutate process-wide environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env_vars() {
        unsafe {
            env::remove_var("DATABASE_URL");
            env::remove_var("SPANNER_EMULATOR_HOST");
            env::remove_var("PORT");
            env::remove_var("HOST");
        }
    }

    #[test]
    fn test_config_with_all_vars() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env_vars();
        unsafe {
            env::set_var("DATABASE_URL", "projects/p/instances/i/databases/d");
            env::set_var("SPANNER_EMULATOR_HOST", "localhost:9010");
            env::set_var("PORT", "3000");
            env::set_var("HOST", "127.0.0.1");
        }

        let config = Config::from_env().unwrap();
        clear_env_vars();

        assert_eq!(config.database_url, "projects/p/instances/i/databases/d");
        assert_eq!(config.spanner_emulator_host, Some("localhost:9010".to_string()));
        assert_eq!(config.service_port, 3000);
        assert_eq!(config.service_host, "127.0.0.1");
    }

    #[test]
    fn test_config_with_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env_vars();

        let config = Config::from_env().unwrap();

        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.spanner_emulator_host, None);
        assert_eq!(config.service_port, 8080);
        assert_eq!(config.service_host, "0.0.0.0");
    }

    #[test]
    fn test_invalid_port() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env_vars();
        unsafe {
            env::set_var("PORT", "not-a-number");
        }

        let result = Config::from_env();
        clear_env_vars();

        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(error.to_string().contains("PORT"));
    }

    #[test]
    fn test_port_out_of_range() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env_vars();
        unsafe {
            env::set_var("PORT", "99999");
        }

        let result = Config::from_env();
        clear_env_vars();

        assert!(result.is_err());
    }

    #[test]
    fn test_test_database_url_default() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        if env::var("TEST_DATABASE_URL").is_err() {
            assert_eq!(Config::test_database_url(), DEFAULT_TEST_DATABASE_URL);
        }
    }
}
