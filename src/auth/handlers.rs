use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthAction, AuthCommand, AuthResponse, RawAuthRequest},
        password::{hash_password, verify_password},
        repo::CreateUserError,
        repo_types::User,
    },
    contract::parse_body,
    error::ApiError,
    state::AppState,
};

/// `POST /auth`: register (`action = "register"`) or log in (default).
#[instrument(skip(state, body))]
pub async fn authenticate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let cmd = AuthCommand::try_from(parse_body::<RawAuthRequest>(&body)).map_err(|e| {
        warn!(error = %e, "invalid auth request");
        e
    })?;

    match &cmd.action {
        AuthAction::Register => {
            let user = register(&state, &cmd).await?;
            Ok((StatusCode::CREATED, Json(user.into())))
        }
        AuthAction::Login => {
            let user = login(&state, &cmd).await?;
            Ok((StatusCode::OK, Json(user.into())))
        }
        AuthAction::Other(action) => {
            warn!(%action, "unsupported auth action");
            Err(ApiError::MethodNotAllowed)
        }
    }
}

async fn register(state: &AppState, cmd: &AuthCommand) -> Result<User, ApiError> {
    if state.users.find_by_email(&cmd.email).await?.is_some() {
        warn!(email = %cmd.email, "email already registered");
        return Err(ApiError::Conflict);
    }

    let hash = hash_password(&cmd.password)?;

    let user = match state.users.create(&cmd.email, &hash).await {
        Ok(u) => u,
        Err(CreateUserError::Duplicate) => {
            warn!(email = %cmd.email, "email registered concurrently");
            return Err(ApiError::Conflict);
        }
        Err(CreateUserError::Other(e)) => return Err(e.into()),
    };

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(user)
}

async fn login(state: &AppState, cmd: &AuthCommand) -> Result<User, ApiError> {
    let Some(user) = state.users.find_by_email(&cmd.email).await? else {
        warn!(email = %cmd.email, "login unknown email");
        return Err(ApiError::Unauthorized);
    };

    if !verify_password(&cmd.password, &user.password_hash)? {
        warn!(email = %cmd.email, user_id = user.id, "login invalid password");
        return Err(ApiError::Unauthorized);
    }

    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(user)
}
