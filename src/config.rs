//! Configuration for the site server.
//!
//! Settings come from the process environment, optionally backed by a `.env`
//! file. Variables already set in the environment win over the file.

use serde::Serialize;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 3000;

/// Relay used when `SMTP_HOST` is not set.
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Main configuration for the server.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Address to bind to
    pub bind: IpAddr,
    /// Port to listen on (0 for random)
    pub port: u16,
    /// Directory served as static files, if any
    pub static_dir: Option<PathBuf>,
    /// Outgoing mail settings
    pub mail: MailConfig,
}

/// Outgoing mail settings.
#[derive(Clone, Serialize)]
pub struct MailConfig {
    /// SMTP account, also used as the envelope sender
    pub user: Option<String>,
    #[serde(serialize_with = "mask_secret")]
    pub password: Option<String>,
    /// Where submissions are delivered
    pub destination: Option<String>,
    pub smtp_host: String,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("destination", &self.destination)
            .field("smtp_host", &self.smtp_host)
            .finish()
    }
}

fn mask_secret<S>(secret: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match secret {
        Some(_) => serializer.serialize_some("********"),
        None => serializer.serialize_none(),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            static_dir: None,
            mail: MailConfig::default(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            user: None,
            password: None,
            destination: None,
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from the environment, falling back to the entries
    /// of a `.env` file for unset variables.
    pub fn from_env_and_file(env_file: &Path) -> Result<Self, ConfigError> {
        let file = read_env_file(env_file)?;
        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| file.get(key).cloned()))
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidPort {
                    value: raw.clone(),
                    reason: e.to_string(),
                })?,
            None => DEFAULT_PORT,
        };

        let bind = match get("BIND_ADDR") {
            Some(raw) => raw
                .trim()
                .parse::<IpAddr>()
                .map_err(|e| ConfigError::InvalidAddress {
                    value: raw.clone(),
                    reason: e.to_string(),
                })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        Ok(Self {
            bind,
            port,
            static_dir: get("STATIC_DIR").map(PathBuf::from),
            mail: MailConfig {
                user: get("EMAIL_USER"),
                password: get("EMAIL_PASS"),
                destination: get("EMAIL_TO"),
                smtp_host: get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            },
        })
    }

    /// Warnings about settings that will make delivery fail later.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.mail.destination.is_none() {
            warnings.push("EMAIL_TO is not set; form submissions cannot be delivered".to_string());
        }
        if self.mail.user.is_none() || self.mail.password.is_none() {
            warnings.push("EMAIL_USER/EMAIL_PASS are not both set; SMTP login will be skipped".to_string());
        }
        if let Some(dir) = &self.static_dir {
            if !dir.is_dir() {
                warnings.push(format!("STATIC_DIR {dir:?} is not a directory"));
            }
        }
        warnings
    }
}

/// Read the `KEY=VALUE` entries of an env file without touching the process
/// environment. A missing file yields no entries.
#[cfg(feature = "server")]
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(dotenvy::Error::Io(_)) => return Ok(HashMap::new()),
        Err(e) => return Err(e.into()),
    };

    entries
        .map(|entry| entry.map_err(ConfigError::from))
        .collect()
}

#[cfg(not(feature = "server"))]
pub fn read_env_file(_path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    Ok(HashMap::new())
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[cfg(feature = "server")]
    #[error("failed to read env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("invalid PORT '{value}': {reason}")]
    InvalidPort { value: String, reason: String },

    #[error("invalid BIND_ADDR '{value}': {reason}")]
    InvalidAddress { value: String, reason: String },
}
