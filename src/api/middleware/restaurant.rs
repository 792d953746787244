use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Tenant identity resolved from the `x-restaurant-id` header.
/// Stand-in until a token-based scheme carries the restaurant claim.
#[derive(Clone, Debug)]
pub struct RestaurantId(pub String);

pub async fn restaurant_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let restaurant_id = req
        .headers()
        .get("x-restaurant-id")
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| state.config.default_restaurant_id.clone());

    req.extensions_mut().insert(RestaurantId(restaurant_id));
    next.run(req).await
}
