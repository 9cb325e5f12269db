use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_RAZORPAY_API_URL: &str = "https://api.razorpay.com/v1";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub razorpay: RazorpayConfig,
    pub payment: PaymentConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    fn parse(value: &str) -> Result<Self, config::ConfigError> {
        match value.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(config::ConfigError::Message(format!(
                "ENVIRONMENT must be one of development, production, test (got '{}')",
                other
            ))),
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
}

/// Razorpay credentials. Empty values are allowed: the adapter then reports
/// itself unavailable and is left out of the provider registry.
#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub webhook_secret: String,
    pub api_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    pub default_currency: String,
    /// Upper bound for every outbound call to a processor, in seconds.
    pub timeout_secs: u64,
    pub default_provider: String,
}

impl PaymentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub cors_origin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub window_ms: u64,
    pub max_requests: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(config::Environment::default())
    }

    /// Builds the configuration from an environment source. Tests pass a
    /// source with an explicit map instead of touching the process environment.
    pub fn from_environment(source: config::Environment) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(source.separator("_").try_parsing(true))
            .build()?;

        let port = config.get_int("port").unwrap_or(3000);
        let port = u16::try_from(port).map_err(|_| {
            config::ConfigError::Message(format!("PORT out of range: {}", port))
        })?;

        let environment = match config.get_string("environment") {
            Ok(value) => Environment::parse(&value)?,
            Err(_) => Environment::Development,
        };

        let timeout_secs = config.get_int("payment.timeout").unwrap_or(30);
        if timeout_secs <= 0 {
            return Err(config::ConfigError::Message(
                "PAYMENT_TIMEOUT must be a positive number of seconds".to_string(),
            ));
        }

        let max_requests = config.get_int("rate.limit.max.requests").unwrap_or(100);
        let window_ms = config.get_int("rate.limit.window.ms").unwrap_or(900_000);
        if max_requests <= 0 || window_ms <= 0 {
            return Err(config::ConfigError::Message(
                "RATE_LIMIT_WINDOW_MS and RATE_LIMIT_MAX_REQUESTS must be positive".to_string(),
            ));
        }

        // Manual construction due to environment variable naming
        Ok(Config {
            server: ServerConfig {
                host: config.get_string("host").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port,
                environment,
            },
            razorpay: RazorpayConfig {
                key_id: config.get_string("razorpay.key.id").unwrap_or_default(),
                key_secret: config.get_string("razorpay.key.secret").unwrap_or_default(),
                webhook_secret: config.get_string("razorpay.webhook.secret").unwrap_or_default(),
                api_url: config
                    .get_string("razorpay.api.url")
                    .unwrap_or_else(|_| DEFAULT_RAZORPAY_API_URL.to_string()),
            },
            payment: PaymentConfig {
                default_currency: config
                    .get_string("payment.currency")
                    .map(|c| c.to_uppercase())
                    .unwrap_or_else(|_| "INR".to_string()),
                timeout_secs: timeout_secs as u64,
                default_provider: config
                    .get_string("payment.default.provider")
                    .unwrap_or_else(|_| "razorpay".to_string()),
            },
            logging: LoggingConfig {
                level: config.get_string("log.level").unwrap_or_else(|_| "info".to_string()),
            },
            security: SecurityConfig {
                cors_origin: config.get_string("cors.origin").unwrap_or_else(|_| "*".to_string()),
            },
            rate_limit: RateLimitConfig {
                window_ms: window_ms as u64,
                max_requests: max_requests as u32,
            },
        })
    }
}
