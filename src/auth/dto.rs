use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{auth::repo_types::User, contract::required, error::ApiError};

/// Body of `POST /auth` as sent by clients; nothing is trusted yet.
#[derive(Debug, Default, Deserialize)]
pub struct RawAuthRequest {
    pub action: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    Register,
    Login,
    Other(String),
}

impl From<Option<String>> for AuthAction {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref() {
            None | Some("login") => AuthAction::Login,
            Some("register") => AuthAction::Register,
            Some(other) => AuthAction::Other(other.to_string()),
        }
    }
}

/// Validated auth request.
pub struct AuthCommand {
    pub action: AuthAction,
    pub email: String,
    pub password: String,
}

impl TryFrom<RawAuthRequest> for AuthCommand {
    type Error = ApiError;

    fn try_from(raw: RawAuthRequest) -> Result<Self, Self::Error> {
        match (required(raw.email), required(raw.password)) {
            (Some(email), Some(password)) => Ok(Self {
                action: raw.action.into(),
                email,
                password,
            }),
            _ => Err(ApiError::validation("Email and password are required")),
        }
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: PublicUser,
}

impl From<User> for AuthResponse {
    fn from(user: User) -> Self {
        Self {
            user: PublicUser {
                id: user.id,
                email: user.email,
                created_at: user.created_at,
            },
        }
    }
}
