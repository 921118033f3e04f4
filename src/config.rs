use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub intelligence_base_url: String,
    pub intelligence_api_key: String,
    pub intelligence_timeout_secs: u64,
    pub session_ttl_secs: u64,
    pub eviction_interval_secs: u64,
    pub public_rps: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            intelligence_base_url: get_env("INTELLIGENCE_BASE_URL")?,
            intelligence_api_key: get_env("INTELLIGENCE_API_KEY")?,
            intelligence_timeout_secs: get_env_parse("INTELLIGENCE_TIMEOUT_SECS")?,
            session_ttl_secs: get_env_parse("SESSION_TTL_SECS")?,
            eviction_interval_secs: get_env_parse("EVICTION_INTERVAL_SECS")?,
            public_rps: get_env_parse("PUBLIC_RPS")?,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}
