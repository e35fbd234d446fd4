use axum::http::Request;
use std::sync::Arc;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::KeyExtractor, GovernorError, GovernorLayer,
};
use uuid::Uuid;

use crate::middleware::rate_limit::rate_limit_error_handler;
use crate::utils::jwt::Claims;

/// Keys the governor by the authenticated account id, so clients behind a
/// shared NAT do not drain each other's budget. Relies on auth_middleware
/// having stored the claims in request extensions.
#[derive(Debug, Clone, Copy)]
pub struct AccountIdExtractor;

impl KeyExtractor for AccountIdExtractor {
    type Key = Uuid;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        req.extensions()
            .get::<Claims>()
            .map(|claims| claims.sub)
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

pub type RoleGovernorLayer = GovernorLayer<
    AccountIdExtractor,
    governor::middleware::NoOpMiddleware<governor::clock::QuantaInstant>,
    axum::body::Body,
>;

/// Restaurant dashboards poll the pending list, so restaurant accounts
/// get a 5x budget over diners.
pub enum RateLimitedRole {
    Diner,
    Restaurant,
}

impl RateLimitedRole {
    /// (replenish interval in ms, burst size)
    fn quota(&self) -> (u64, u32) {
        match self {
            RateLimitedRole::Restaurant => (120 * 2, 500), // 500 / 2 per minute
            RateLimitedRole::Diner => (600 * 2, 100),      // 100 / 2 per minute
        }
    }
}

pub fn create_role_governor(role: RateLimitedRole) -> RoleGovernorLayer {
    let (per_ms, burst) = role.quota();

    let config = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(burst)
            .key_extractor(AccountIdExtractor)
            .finish()
            .unwrap(),
    );

    GovernorLayer::new(config).error_handler(rate_limit_error_handler)
}
