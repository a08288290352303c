use crate::errors::ApiError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};
use coffee_auth::{check_permission, AuthError, TokenVerifier};
use http::header::AUTHORIZATION;
use log::{debug, warn};
use std::sync::Arc;

/// Route-level requirement: a verified bearer token carrying `permission`
#[derive(Clone)]
pub(crate) struct PermissionGate {
    verifier: Arc<TokenVerifier>,
    permission: &'static str,
}

impl PermissionGate {
    pub(crate) fn new(state: &AppState, permission: &'static str) -> Self {
        Self {
            verifier: state.verifier.clone(),
            permission,
        }
    }
}

/// Runs [`require_permission`] in front of a single method route
pub(crate) fn gated(
    route: MethodRouter<AppState>,
    state: &AppState,
    permission: &'static str,
) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(
        PermissionGate::new(state, permission),
        require_permission,
    ))
}

/// Verifies the bearer token and checks it grants the gate's permission.
///
/// On success the decoded claims are inserted into the request extensions.
pub(crate) async fn require_permission(
    State(gate): State<PermissionGate>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = {
        let header = match request.headers().get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| {
                warn!("Authorization header is not valid ASCII");
                AuthError::missing_or_malformed_header("Authorization header must be bearer token.")
            })?),
            None => None,
        };
        gate.verifier.verify_header(header).await?
    };

    check_permission(gate.permission, &claims).inspect_err(|e| {
        warn!(
            "Subject {} denied '{}': {}",
            claims.subject(),
            gate.permission,
            e.description
        );
    })?;
    debug!("Subject {} granted '{}'", claims.subject(), gate.permission);

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
