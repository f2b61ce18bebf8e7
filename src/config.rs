use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::accounts::Credential;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("DATABASE_URL missing, it is required for the postgres backend")]
    MissingDatabaseUrl,

    #[error("TODO_USERS must list at least one user:password pair")]
    NoUsers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Memory,
    File,
    Postgres,
}

impl FromStr for Backend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Backend::Memory),
            "file" => Ok(Backend::File),
            "postgres" => Ok(Backend::Postgres),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub backend: Backend,
    pub data_dir: PathBuf,
    pub database_url: Option<String>,
    pub session_secret: Option<String>,
    pub session_ttl_hours: i64,
    pub users: Vec<Credential>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv().is_ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port: u16 = match get("PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { name: "PORT", value: v })?,
            None => 8080,
        };

        let database_url = get("DATABASE_URL");

        let backend: Backend = match get("TODO_BACKEND") {
            Some(v) => v
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "TODO_BACKEND", value: v })?,
            None if database_url.is_some() => Backend::Postgres,
            None => Backend::File,
        };

        if backend == Backend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        let session_ttl_hours = match get("SESSION_TTL_HOURS") {
            Some(v) => match v.trim().parse::<i64>() {
                // at most ten years
                Ok(hours) if (1..=87_600).contains(&hours) => hours,
                _ => return Err(ConfigError::Invalid { name: "SESSION_TTL_HOURS", value: v }),
            },
            None => 24,
        };

        let users = match get("TODO_USERS") {
            Some(v) => parse_users(&v)?,
            None => vec![Credential::new("admin", "1234")],
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            backend,
            data_dir: get("TODO_DATA_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("data")),
            database_url,
            session_secret: get("SESSION_SECRET"),
            session_ttl_hours,
            users,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parses `user:password,user2:password2`.
fn parse_users(raw: &str) -> Result<Vec<Credential>, ConfigError> {
    let mut users = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        match entry.split_once(':') {
            Some((user, pass)) if !user.trim().is_empty() => {
                users.push(Credential::new(user.trim(), pass));
            }
            _ => {
                return Err(ConfigError::Invalid { name: "TODO_USERS", value: entry.to_string() });
            }
        }
    }

    if users.is_empty() {
        return Err(ConfigError::NoUsers);
    }
    Ok(users)
}
