use anyhow::anyhow;
use axum::{
    RequestPartsExt, async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{axum_http::error_responses::AppError, config::config_loader};

#[derive(Debug, Serialize, Deserialize)]
pub struct UserClaims {
    /// Account id as issued by the login endpoint.
    pub sub: String,
    pub email: Option<String>,
    pub exp: usize,
}

/// Caller identity, resolved once per request and passed explicitly into every use case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub account_id: i32,
    pub email: Option<String>,
}

#[derive(Debug)]
pub struct AuthError(anyhow::Error);

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError(err)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        debug!(error = %self.0, "auth: request rejected");
        let locale = config_loader::get_report_locale();
        AppError::Unauthorized(locale.unauthenticated().to_string()).into_response()
    }
}

pub fn validate_user_jwt(token: &str) -> Result<UserClaims, AuthError> {
    let secret = config_loader::get_user_secret()
        .map_err(|e| anyhow!("Failed to load config: {}", e))?
        .secret;

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;

    let token_data = decode::<UserClaims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow!("JWT validation failed: {}", e))?;

    Ok(token_data.claims)
}

impl TryFrom<UserClaims> for AuthUser {
    type Error = AuthError;

    fn try_from(claims: UserClaims) -> Result<Self, Self::Error> {
        let account_id = claims
            .sub
            .trim()
            .parse::<i32>()
            .map_err(|_| anyhow!("Invalid account id in token: {}", claims.sub))?;

        Ok(AuthUser {
            account_id,
            email: claims.email,
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|e| anyhow!("Missing bearer token: {}", e))?;

        let claims = validate_user_jwt(bearer.token())?;

        AuthUser::try_from(claims)
    }
}
