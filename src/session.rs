//! Session resolution.
//!
//! A logged-in browser carries one cookie, `todo_session`, whose value is a
//! signed token naming the user. Anything else resolves to [`Identity::Anonymous`].

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::TodoError;

pub const SESSION_COOKIE: &str = "todo_session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    User(String),
}

impl Identity {
    pub fn username(&self) -> Option<&str> {
        match self {
            Identity::User(name) => Some(name.as_str()),
            Identity::Anonymous => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    iat: usize,
}

#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Maps the request's cookies to an identity. Never fails.
    pub fn resolve(&self, headers: &HeaderMap) -> Identity {
        let token = match cookie_value(headers, SESSION_COOKIE) {
            Some(v) if !v.is_empty() => v,
            _ => return Identity::Anonymous,
        };

        match decode::<Claims>(token, &self.decoding, &Validation::default()) {
            Ok(data) if !data.claims.sub.is_empty() => Identity::User(data.claims.sub),
            Ok(_) => Identity::Anonymous,
            Err(e) => {
                tracing::debug!(error = %e, "ignoring invalid session cookie");
                Identity::Anonymous
            }
        }
    }

    pub fn issue_token(&self, username: &str) -> Result<String, TodoError> {
        self.issue_token_at(username, Utc::now())
    }

    pub fn issue_token_at(&self, username: &str, now: DateTime<Utc>) -> Result<String, TodoError> {
        let exp = now + self.ttl;
        let claims = Claims {
            sub: username.to_string(),
            exp: exp.timestamp().max(0) as usize,
            iat: now.timestamp().max(0) as usize,
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// `Set-Cookie` value that logs `username` in site-wide.
    pub fn login_cookie(&self, username: &str) -> Result<String, TodoError> {
        let token = self.issue_token(username)?;
        Ok(format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax"))
    }
}

/// `Set-Cookie` value that expires the session immediately.
pub fn logout_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

/// Finds a cookie by name across all `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}

/// Random alphanumeric secret for deployments without `SESSION_SECRET`.
pub fn generate_session_secret() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    const SECRET_LENGTH: usize = 48;

    let mut rng = rand::thread_rng();
    (0..SECRET_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
