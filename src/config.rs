//! Process configuration, read from the environment exactly once at startup
//! and handed to components by injection.

use std::env;

use crate::ai;

const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),
    #[error("PORT must be a number: {0}")]
    InvalidPort(#[from] std::num::ParseIntError),
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub database_url: String,
    pub groq_api_key: String,
    pub groq_api_url: String,
    pub groq_model: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(value) => value.parse::<u16>()?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            database_url: required("DATABASE_URL")?,
            groq_api_key: required("GROQ_API_KEY")?,
            groq_api_url: env::var("GROQ_API_URL")
                .unwrap_or_else(|_| ai::DEFAULT_ENDPOINT.to_string()),
            groq_model: env::var("GROQ_MODEL").unwrap_or_else(|_| ai::DEFAULT_MODEL.to_string()),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}
