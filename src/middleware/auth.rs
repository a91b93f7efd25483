use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::{config::jwt_secret, dto::auth::Claims, error::AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i32,
    pub is_admin: bool,
}

impl AuthUser {
    /// Whether this caller may act on records owned by `owner_id`.
    pub fn can_access(&self, owner_id: i32) -> bool {
        self.is_admin || self.user_id == owner_id
    }
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    if !user.is_admin {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_owner_or_admin(user: &AuthUser, owner_id: i32) -> Result<(), AppError> {
    if !user.can_access(owner_id) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn issue_token(claims: &Claims, secret: &str) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn verify_token(token: &str, secret: &str) -> Result<AuthUser, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    let user_id = decoded
        .claims
        .sub
        .parse::<i32>()
        .map_err(|_| AppError::Unauthorized("Invalid user id in token".into()))?;

    Ok(AuthUser {
        user_id,
        is_admin: decoded.claims.is_admin,
    })
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;
    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?;

        verify_token(token, &jwt_secret()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn claims(sub: &str, is_admin: bool) -> Claims {
        Claims {
            sub: sub.to_string(),
            is_admin,
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        }
    }

    #[test]
    fn issued_token_verifies_to_same_user() {
        let token = issue_token(&claims("7", true), "secret").unwrap();
        let user = verify_token(&token, "secret").unwrap();
        assert_eq!(user, AuthUser { user_id: 7, is_admin: true });
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = issue_token(&claims("7", false), "secret").unwrap();
        assert!(matches!(
            verify_token(&token, "other"),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn owners_and_admins_can_access() {
        let user = AuthUser { user_id: 3, is_admin: false };
        assert!(user.can_access(3));
        assert!(!user.can_access(4));
        assert!(ensure_admin(&user).is_err());
        assert!(ensure_owner_or_admin(&AuthUser { user_id: 1, is_admin: true }, 4).is_ok());
    }
}
