use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{auth, diner, restaurant};
use crate::middleware::auth::{auth_middleware, require_diner, require_restaurant};
use crate::middleware::rate_limit::create_public_governor;
use crate::middleware::role_rate_limit::{create_role_governor, RateLimitedRole};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Create role-specific governor layers
    let restaurant_governor = create_role_governor(RateLimitedRole::Restaurant);
    let diner_governor = create_role_governor(RateLimitedRole::Diner);
    // Create IP-based governor for public routes (with diner-level limits)
    let public_governor = create_public_governor();

    // Public routes (with diner-level rate limiting per IP)
    let auth_routes = Router::new()
        .route("/diner/register", post(auth::register_diner))
        .route("/diner/login", post(auth::login_diner))
        .route("/restaurant/register", post(auth::register_restaurant))
        .route("/restaurant/login", post(auth::login_restaurant))
        .layer(public_governor.clone());

    // Public discovery routes (browse restaurants)
    let discovery_routes = Router::new()
        .route("/browse/all", get(diner::browse_restaurants))
        .route("/browse/{id}", get(diner::get_restaurant))
        .layer(public_governor);

    // Restaurant profile routes (requires auth + restaurant account)
    let profile_routes = Router::new()
        .route(
            "/me",
            get(restaurant::my_profile).put(restaurant::update_profile),
        )
        .layer(restaurant_governor.clone())
        .layer(middleware::from_fn(require_restaurant))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Diner booking routes (requires auth + diner account)
    let diner_booking_routes = Router::new()
        .route("/book", post(diner::create_booking))
        .route("/all", get(diner::my_bookings))
        .route("/{id}", delete(diner::cancel_booking))
        .layer(diner_governor)
        .layer(middleware::from_fn(require_diner))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Restaurant booking routes (requires auth + restaurant account)
    // Listing pending bookings triggers the expiry sweep
    let restaurant_booking_routes = Router::new()
        .route("/pending", get(restaurant::pending_bookings))
        .route("/confirmed", get(restaurant::confirmed_bookings))
        .route("/confirm/{id}", put(restaurant::confirm_booking))
        .route("/cancel/{id}", put(restaurant::cancel_booking))
        .route("/arrival/{id}", put(restaurant::update_arrival))
        .layer(restaurant_governor.clone())
        .layer(middleware::from_fn(require_restaurant))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Table inventory routes (requires auth + restaurant account)
    let table_routes = Router::new()
        .route("/", post(restaurant::create_table))
        .route("/", get(restaurant::list_tables))
        .route("/{id}", put(restaurant::update_table))
        .route("/{id}", delete(restaurant::delete_table))
        .route("/{id}/toggle", put(restaurant::toggle_table))
        .layer(restaurant_governor)
        .layer(middleware::from_fn(require_restaurant))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/restaurants", discovery_routes.merge(profile_routes))
        .nest(
            "/api/bookings",
            diner_booking_routes.merge(restaurant_booking_routes),
        )
        .nest("/api/tables", table_routes)
        .with_state(state)
}
