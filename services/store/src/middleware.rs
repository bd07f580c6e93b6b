//! Access control gate: bearer token validation and role guards
//!
//! The gate only authenticates: it turns `Authorization: Bearer <token>`
//! into decoded claims on the request, or rejects with 401. Role and
//! self-modification checks stay per-operation in the handlers, layered on
//! top through the guard helpers below.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::error;
use uuid::Uuid;

use crate::{AppState, error::ApiError, jwt::Claims, models::Role};

/// Extract the token from an `Authorization` header value of the form
/// `Bearer <token>`. Anything else counts as no token at all.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let header = header?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

/// Extract and validate the session token, attaching the decoded claims to
/// the request for downstream handlers.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok());

    let token = bearer_token(auth_header).ok_or(ApiError::MissingToken)?;

    let claims = state.jwt_service.validate_token(token).map_err(|e| {
        error!("Failed to validate token: {}", e);
        ApiError::InvalidToken
    })?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Admit only callers whose token carries the admin role
pub fn require_admin(claims: &Claims) -> Result<(), ApiError> {
    if claims.role != Role::Admin {
        return Err(ApiError::ForbiddenRole);
    }
    Ok(())
}

/// Block admin operations that target the caller's own account
pub fn ensure_not_self(
    claims: &Claims,
    target: Uuid,
    message: &'static str,
) -> Result<(), ApiError> {
    if claims.sub == target {
        return Err(ApiError::CannotModifySelf(message));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role) -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            role,
            iat: 0,
            exp: u64::MAX,
        }
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(Some("Bearer ")), None);
        assert_eq!(bearer_token(Some("bearer abc")), None);
        assert_eq!(bearer_token(Some("Basic abc")), None);
        assert_eq!(bearer_token(Some("abc")), None);
        assert_eq!(bearer_token(None), None);
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&claims(Role::Admin)).is_ok());
        assert_eq!(
            require_admin(&claims(Role::User)),
            Err(ApiError::ForbiddenRole)
        );
    }

    #[test]
    fn test_ensure_not_self() {
        let caller = claims(Role::Admin);

        assert!(ensure_not_self(&caller, Uuid::new_v4(), "Cannot change your own role").is_ok());
        assert_eq!(
            ensure_not_self(&caller, caller.sub, "Cannot change your own role"),
            Err(ApiError::CannotModifySelf("Cannot change your own role"))
        );
    }
}
