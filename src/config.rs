use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub auth_provider: AuthProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
}

/// External identity provider that owns credentials and issues tokens.
/// Registration calls its signup endpoint; everything else only decodes
/// the bearer tokens it minted.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthProviderConfig {
    pub base_url: String,
    pub api_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        let config = Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .context("Failed to parse PORT")?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .context("Failed to parse DATABASE_MAX_CONNECTIONS")?,
            },
            jwt: JwtConfig {
                secret: env::var("AUTH_JWT_SECRET").context("AUTH_JWT_SECRET must be set")?,
            },
            auth_provider: AuthProviderConfig {
                base_url: env::var("AUTH_PROVIDER_URL")
                    .context("AUTH_PROVIDER_URL must be set")?,
                api_key: env::var("AUTH_PROVIDER_API_KEY")
                    .context("AUTH_PROVIDER_API_KEY must be set")?,
            },
        };

        // Minimum 32 characters for HS256
        if config.jwt.secret.len() < 32 {
            anyhow::bail!("AUTH_JWT_SECRET must be at least 32 characters long");
        }

        Ok(config)
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
