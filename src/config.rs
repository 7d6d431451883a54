use anyhow::Context;

use crate::domain::TransitionPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_connection_string: String,
    pub bind_addr: String,
    /// Server URL advertised in the OpenAPI document.
    pub public_url: String,
    pub transition_policy: TransitionPolicy,
}

const DEFAULT_DB_CONNECTION_STRING: &str = "sqlite://db.sqlite?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_PUBLIC_URL: &str = "http://localhost:3000";

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `load` uses the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let db_connection_string = lookup("DB_CONNECTION_STRING")
            .unwrap_or(DEFAULT_DB_CONNECTION_STRING.into());
        let bind_addr = lookup("BIND_ADDR").unwrap_or(DEFAULT_BIND_ADDR.into());
        let public_url = lookup("PUBLIC_URL").unwrap_or(DEFAULT_PUBLIC_URL.into());
        let transition_policy = match lookup("STATUS_TRANSITION_POLICY") {
            Some(raw) => raw
                .parse::<TransitionPolicy>()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("Invalid STATUS_TRANSITION_POLICY: {}", raw))?,
            None => TransitionPolicy::default(),
        };
        Ok(Config {
            db_connection_string,
            bind_addr,
            public_url,
            transition_policy,
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.db_connection_string.is_empty() {
            return Err("DB_CONNECTION_STRING is empty".into());
        }
        if self.bind_addr.is_empty() {
            return Err("BIND_ADDR is empty".into());
        }
        if self.public_url.is_empty() {
            return Err("PUBLIC_URL is empty".into());
        }
        Ok(())
    }
}
