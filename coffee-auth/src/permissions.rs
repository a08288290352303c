use crate::claims::Claims;
use crate::error::AuthError;

/// Requires `claims` to grant `permission`.
///
/// A token with no `permissions` claim at all is a configuration problem on the identity
/// provider side (RBAC not enabled for the API) and is reported as `invalid_claims` with
/// 400, separately from a token that simply lacks this permission (403).
pub fn check_permission(permission: &str, claims: &Claims) -> Result<(), AuthError> {
    if claims.permissions.is_none() {
        return Err(AuthError::permissions_missing());
    }
    if !claims.has_permission(permission) {
        return Err(AuthError::unauthorized());
    }

    Ok(())
}
