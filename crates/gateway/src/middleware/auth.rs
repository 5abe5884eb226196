//! Authentication middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::UserRole;

use crate::state::AppState;

/// Current authenticated user extracted from JWT.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

/// Content writes are limited to accounts that confirmed their email.
pub fn require_verified(user: &CurrentUser) -> AppResult<()> {
    if user.role.is_verified() {
        Ok(())
    } else {
        Err(AppError::AccessDenied)
    }
}

/// Validate the bearer token and insert [`CurrentUser`] and the raw claims
/// into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::Unauthorized)?;

    let claims = state.auth_service.verify_token(bearer.token())?;
    let role = claims.role.parse::<UserRole>().map_err(|_| {
        tracing::warn!(user_id = %claims.sub, role = %claims.role, "Token carries unknown role");
        AppError::Unauthorized
    })?;

    let current_user = CurrentUser {
        id: claims.sub,
        email: claims.email.clone(),
        role,
    };

    request.extensions_mut().insert(current_user);
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_user_is_denied_writes() {
        let user = CurrentUser {
            id: Uuid::new_v4(),
            email: "new@withaeng.com".to_string(),
            role: UserRole::NonUser,
        };

        assert!(matches!(require_verified(&user), Err(AppError::AccessDenied)));
    }
}
