//! TOML configuration for the CLI.
//!
//! # Design
//! The file shape mirrors the gateway deployment docs: a `[service]` table
//! for where to connect and a `[credentials]` table for Basic auth.
//! `use_ssl` defaults to false when absent. Any read or parse failure aborts
//! before network activity.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;
use sms_core::{Credentials, ServiceTarget};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceSection,
    pub credentials: CredentialsSection,
}

#[derive(Debug, Deserialize)]
pub struct ServiceSection {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub use_ssl: bool,
}

#[derive(Debug, Deserialize)]
pub struct CredentialsSection {
    pub username: String,
    pub password: String,
}

impl Config {
    pub fn service_target(&self) -> ServiceTarget {
        ServiceTarget {
            host: self.service.host.clone(),
            port: self.service.port,
            use_tls: self.service.use_ssl,
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.credentials.username.clone(),
            password: self.credentials.password.clone(),
        }
    }
}

pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(ConfigError::Read)?;
    toml::from_str(&text).map_err(ConfigError::Parse)
}

#[derive(Debug)]
pub enum ConfigError {
    Read(io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read(e) => write!(f, "could not read config file: {e}"),
            ConfigError::Parse(e) => write!(f, "could not parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}
