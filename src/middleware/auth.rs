use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::error::{AppError, AppResult};
use crate::utils::jwt::{verify_token, AccountRole, Claims};
use crate::AppState;

/// Validate the bearer token and stash its claims in request extensions
/// for the role guards and handlers downstream.
pub async fn auth_middleware(
    State(state): State<AppState>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let claims = verify_token(auth.token(), &state.config.jwt_secret)?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

fn expect_role(request: &Request, role: AccountRole, denied: &str) -> AppResult<()> {
    let claims = request
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| AppError::Unauthorized("No authentication found".to_string()))?;

    if claims.role != role {
        return Err(AppError::Forbidden(denied.to_string()));
    }

    Ok(())
}

/// Require a diner account
pub async fn require_diner(request: Request, next: Next) -> AppResult<Response> {
    expect_role(&request, AccountRole::Diner, "Diner access required")?;
    Ok(next.run(request).await)
}

/// Require a restaurant account
pub async fn require_restaurant(request: Request, next: Next) -> AppResult<Response> {
    expect_role(&request, AccountRole::Restaurant, "Restaurant access required")?;
    Ok(next.run(request).await)
}
