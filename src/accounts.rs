use sqlx::PgPool;

use crate::error::TodoError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Where login checks look up users. Passwords are compared as plain text.
#[derive(Debug, Clone)]
pub enum Accounts {
    Fixed(Vec<Credential>),
    Postgres(PgPool),
}

impl Accounts {
    /// Succeeds iff the exact `(username, password)` pair is known.
    pub async fn verify(&self, username: &str, password: &str) -> Result<(), TodoError> {
        let known = match self {
            Accounts::Fixed(users) => users
                .iter()
                .any(|u| u.username == username && u.password == password),
            Accounts::Postgres(pool) => {
                sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND password = $2)",
                )
                .bind(username)
                .bind(password)
                .fetch_one(pool)
                .await?
            }
        };

        if known {
            Ok(())
        } else {
            Err(TodoError::Authentication)
        }
    }
}
