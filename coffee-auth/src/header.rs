use crate::error::AuthError;

/// Extracts the raw token from an `Authorization` header value.
///
/// The value must be exactly two space separated parts, the first being `bearer`
/// compared case-insensitively.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or_else(|| {
        AuthError::missing_or_malformed_header("Authorization header is expected.")
    })?;

    let parts: Vec<&str> = header.split(' ').collect();
    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => {
            Ok(*token)
        }
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(
            AuthError::missing_or_malformed_header("Authorization header must start with \"Bearer\"."),
        ),
        [_] | [_, _] => Err(AuthError::missing_or_malformed_header("Token not found.")),
        _ => Err(AuthError::missing_or_malformed_header(
            "Authorization header must be bearer token.",
        )),
    }
}
