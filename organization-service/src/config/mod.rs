use secrecy::{ExposeSecret, SecretString};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct OrgConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub store: StoreBackend,
    pub mongodb: MongoConfig,
    pub jwt: JwtConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Dev,
    Prod,
}

/// Which persistence collaborator backs the stores.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    Mongodb,
    Memory,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret; every verifier of our tokens holds the same value.
    pub secret: SecretString,
    pub access_token_expiry_minutes: i64,
    pub refresh_token_expiry_hours: i64,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

const MIN_PROD_SECRET_BYTES: usize = 32;
const MAX_ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 24 * 60;
const MAX_REFRESH_TOKEN_EXPIRY_HOURS: i64 = 24 * 365;

impl OrgConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        Self::from_lookup(common_config, |key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment: Environment = lookup("ENVIRONMENT")
            .unwrap_or_else(|| "dev".to_string())
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;
        let var = |key: &str, default: Option<&str>| get_env(&lookup, key, default, is_prod);

        let store: StoreBackend = var("STORE_BACKEND", Some("mongodb"))?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let (mongo_uri_default, mongo_db_default) = match store {
            StoreBackend::Mongodb => (None, Some("organization_db")),
            StoreBackend::Memory => (Some("mongodb://localhost:27017"), Some("organization_db")),
        };

        let config = OrgConfig {
            common,
            environment: environment.clone(),
            service_name: var("SERVICE_NAME", Some("organization-service"))?,
            service_version: var("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")))?,
            log_level: var("LOG_LEVEL", Some("info"))?,
            otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|v| !v.trim().is_empty()),
            store,
            mongodb: MongoConfig {
                uri: var("MONGODB_URI", mongo_uri_default)?,
                database: var("MONGODB_DATABASE", mongo_db_default)?,
            },
            jwt: JwtConfig {
                // Never defaulted, not even in dev.
                secret: SecretString::new(var("JWT_SECRET", None)?),
                access_token_expiry_minutes: parse_number(
                    "JWT_ACCESS_TOKEN_EXPIRY_MINUTES",
                    &var("JWT_ACCESS_TOKEN_EXPIRY_MINUTES", Some("60"))?,
                )?,
                refresh_token_expiry_hours: parse_number(
                    "JWT_REFRESH_TOKEN_EXPIRY_HOURS",
                    &var("JWT_REFRESH_TOKEN_EXPIRY_HOURS", Some("72"))?,
                )?,
            },
            security: SecurityConfig {
                allowed_origins: var("ALLOWED_ORIGINS", Some("http://localhost:3000"))?
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.common.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORT must be greater than 0"
            )));
        }

        if self.jwt.secret.expose_secret().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_SECRET must not be empty"
            )));
        }

        if self.jwt.access_token_expiry_minutes <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_ACCESS_TOKEN_EXPIRY_MINUTES must be positive"
            )));
        }

        if self.jwt.refresh_token_expiry_hours <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_REFRESH_TOKEN_EXPIRY_HOURS must be positive"
            )));
        }

        if self.jwt.access_token_expiry_minutes > MAX_ACCESS_TOKEN_EXPIRY_MINUTES {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_ACCESS_TOKEN_EXPIRY_MINUTES must be at most {}",
                MAX_ACCESS_TOKEN_EXPIRY_MINUTES
            )));
        }

        if self.jwt.refresh_token_expiry_hours > MAX_REFRESH_TOKEN_EXPIRY_HOURS {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_REFRESH_TOKEN_EXPIRY_HOURS must be at most {}",
                MAX_REFRESH_TOKEN_EXPIRY_HOURS
            )));
        }

        let refresh_minutes = self
            .jwt
            .refresh_token_expiry_hours
            .checked_mul(60)
            .unwrap_or(i64::MAX);
        if refresh_minutes < self.jwt.access_token_expiry_minutes {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Refresh tokens must not expire before access tokens"
            )));
        }

        if self.environment == Environment::Prod {
            if self.security.allowed_origins.iter().any(|o| o == "*") {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "Wildcard CORS origin not allowed in production"
                )));
            }

            if self.jwt.secret.expose_secret().len() < MIN_PROD_SECRET_BYTES {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "JWT_SECRET must be at least {} bytes in production",
                    MIN_PROD_SECRET_BYTES
                )));
            }

            if self.store == StoreBackend::Memory {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "In-memory store not allowed in production"
                )));
            }
        }

        Ok(())
    }
}

fn get_env<F>(lookup: &F, key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_number(key: &str, value: &str) -> Result<i64, AppError> {
    value.trim().parse().map_err(|e: std::num::ParseIntError| {
        AppError::ConfigError(anyhow::anyhow!("{} is not a number: {}", key, e))
    })
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreBackend::Mongodb),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}
