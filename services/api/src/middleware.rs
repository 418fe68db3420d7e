//! Authentication and authorization middleware

use axum::{
    Extension,
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use common::token::Claims;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::{error::ApiError, state::AppState};

/// Validate the bearer access token and expose its claims to handlers
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(ApiError::Unauthorized)?;

    let claims = state
        .token_verifier
        .verify_access(bearer.token())
        .map_err(|e| {
            warn!("Rejected access token: {}", e);
            ApiError::Unauthorized
        })?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Let only admins through; runs after [`auth_middleware`]
pub async fn require_admin(
    Extension(claims): Extension<Claims>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !claims.role.is_admin() {
        warn!("User {} denied admin access", claims.sub);
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(req).await)
}

/// CORS policy for browser clients
pub fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = match origin {
        "*" => AllowOrigin::from(Any),
        origin => match HeaderValue::from_str(origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(e) => {
                warn!("Invalid CORS origin {:?}, allowing any: {}", origin, e);
                AllowOrigin::from(Any)
            }
        },
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
