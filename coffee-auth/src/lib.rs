//! Bearer token verification and permission checks for the coffee shop API.
//!
//! Tokens are JWTs issued by an external identity provider and verified against the
//! provider's published key set (JWKS). Verified [`Claims`] are then checked for a
//! required permission with [`check_permission`].
//!
//! ```no_run
//! use coffee_auth::{check_permission, KeyStore, RemoteKeyStore, TokenVerifier};
//! use jsonwebtoken::Algorithm;
//! use std::time::Duration;
//!
//! # async fn example(header: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
//! let keys = RemoteKeyStore::new(
//!     "https://example.auth0.com/.well-known/jwks.json",
//!     Duration::from_secs(600),
//!     Duration::from_secs(5),
//! )?;
//! let verifier = TokenVerifier::new(
//!     KeyStore::Remote(keys),
//!     "coffee",
//!     "https://example.auth0.com/",
//!     vec![Algorithm::RS256],
//! );
//!
//! let claims = verifier.verify_header(header).await?;
//! check_permission("post:drinks", &claims)?;
//! # Ok(())
//! # }
//! ```

pub mod claims;
pub mod error;
pub mod header;
pub mod keys;
pub mod permissions;
#[cfg(any(test, feature = "testutil"))]
pub mod testutil;
pub mod verifier;

pub use claims::{Audience, Claims};
pub use error::{AuthError, AuthErrorKind};
pub use header::bearer_token;
pub use keys::{KeyProvider, KeyStore, KeyStoreError, RemoteKeyStore, StaticKeyStore};
pub use permissions::check_permission;
pub use verifier::TokenVerifier;

pub use jsonwebtoken::jwk::JwkSet;
pub use jsonwebtoken::Algorithm;
