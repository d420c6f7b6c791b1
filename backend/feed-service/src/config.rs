/// Environment-driven configuration.
///
/// Values with a safe default fall back silently; `DATABASE_URL` is required,
/// and production refuses to boot with a weak JWT secret.
use std::env;
use std::fmt;

const DEV_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .field("max_lifetime_secs", &self.max_lifetime_secs)
            .finish()
    }
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| DEV_SECRET.to_string());
        validate_jwt_secret(&environment, &jwt_secret)?;

        Ok(Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .map_err(|_| "PORT must be a number".to_string())?,
                environment,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .map_err(|_| "DATABASE_URL must be set".to_string())?,
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10),
                min_connections: parse_env("DATABASE_MIN_CONNECTIONS", 2),
                acquire_timeout_secs: parse_env("DATABASE_ACQUIRE_TIMEOUT_SECS", 10),
                idle_timeout_secs: parse_env("DATABASE_IDLE_TIMEOUT_SECS", 600),
                max_lifetime_secs: parse_env("DATABASE_MAX_LIFETIME_SECS", 1800),
            },
            auth: AuthConfig { jwt_secret },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string())
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect(),
            },
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn validate_jwt_secret(environment: &str, secret: &str) -> Result<(), String> {
    if environment == "production" && (secret == DEV_SECRET || secret.len() < 32) {
        return Err("JWT_SECRET must be a strong value in production".to_string());
    }
    Ok(())
}
