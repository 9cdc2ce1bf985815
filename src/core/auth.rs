use crate::core::{AppError, AppState};
use crate::platform::GroupDirectory;
use axum::extract::State;
use axum::{body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

// struct che codifica il contenuto del token jwt
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize, // Expiry time of the token
    pub iat: usize, // Issued at time of the token
    pub id: i64,
    pub username: String,
}

/// Identità dell'utente autenticato, estratta dai claims del token.
///
/// Gli utenti vivono nel sistema della piattaforma: qui non c'è una tabella
/// utenti, i claims firmati sono l'identità.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: i64,
    pub username: String,
}

#[instrument(skip(secret), fields(username = %username, id = %id))]
pub fn encode_jwt(username: String, id: i64, secret: &str) -> Result<String, AppError> {
    debug!("Encoding JWT token for user");
    let now = Utc::now();
    let expire: chrono::TimeDelta = Duration::hours(24);
    let exp: usize = (now + expire).timestamp() as usize;
    let iat: usize = now.timestamp() as usize;
    let claim = Claims {
        iat,
        exp,
        username,
        id,
    };

    encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| {
        error!("Failed to encode JWT token: {:?}", e);
        AppError::internal_server_error("Error in encoding jwt token")
    })
}

#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(jwt_token: &str, secret: &str) -> Result<TokenData<Claims>, AppError> {
    debug!("Decoding JWT token");
    decode(
        jwt_token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data: TokenData<Claims>| {
        info!("JWT token decoded successfully for user: {}", data.claims.username);
        data
    })
    .map_err(|e| {
        warn!("Failed to decode JWT token: {:?}", e);
        AppError::unauthorized("Unable to decode token")
    })
}

#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let auth_header = req.headers().get(http::header::AUTHORIZATION);
    let auth_header = match auth_header {
        Some(header) => header.to_str().map_err(|_| {
            warn!("Invalid authorization header format");
            AppError::forbidden("Empty header is not allowed")
        })?,
        None => {
            warn!("Missing authorization header");
            return Err(AppError::forbidden("Please add the JWT token to the header"));
        }
    };

    let mut header = auth_header.split_whitespace();
    let (_bearer, token) = (header.next(), header.next());
    let token = token.ok_or_else(|| {
        warn!("Malformed authorization header");
        AppError::forbidden("Expected header in the form `Bearer <token>`")
    })?;

    let token_data = decode_jwt(token, &state.jwt_secret)?;

    let current_user = CurrentUser {
        user_id: token_data.claims.id,
        username: token_data.claims.username,
    };

    req.extensions_mut().insert(current_user);
    Ok(next.run(req).await)
}

/// Verifica che l'utente possa amministrare le connessioni di un gruppo.
///
/// La regola è quella della piattaforma: admin del gruppo, oppure moderatore
/// globale. I lookup falliti contano come "non autorizzato" (fail-closed).
#[instrument(skip(state))]
pub async fn require_connection_admin(
    state: &AppState,
    user_id: i64,
    group_id: i64,
) -> Result<(), AppError> {
    let is_moderator = state
        .directory
        .is_platform_moderator(user_id)
        .await
        .unwrap_or_else(|e| {
            warn!("Moderator lookup failed for user {}: {}", user_id, e);
            false
        });

    if is_moderator {
        debug!("User {} authorized as platform moderator", user_id);
        return Ok(());
    }

    let is_admin = state
        .directory
        .is_group_admin(user_id, group_id)
        .await
        .unwrap_or_else(|e| {
            warn!("Admin lookup failed for user {} in group {}: {}", user_id, group_id, e);
            false
        });

    if !is_admin {
        warn!("User {} is not an admin of group {}", user_id, group_id);
        return Err(AppError::forbidden(
            "You must be an admin of this group to manage its connections",
        ));
    }

    info!("User {} authorized as admin of group {}", user_id, group_id);
    Ok(())
}
