//! Injected collaborator interfaces. Implementations are registered once on
//! the [`crate::AuthGateBuilder`] and must be safe to call from concurrently
//! handled requests; the gate calls each at most once per request.

use serde_json::{Map, Value};

use crate::token::TokenData;

/// Answers whether an otherwise valid token has been revoked. Mandatory when
/// blacklist checking is enabled in [`crate::AuthConfig`].
pub trait RevocationCheck: Send + Sync {
    fn is_revoked(&self, token: &TokenData) -> bool;
}

/// Validates the application-defined claims of an access token. Without a
/// registered hook every claim set is accepted.
pub trait ClaimsCheck: Send + Sync {
    fn verify(&self, user_claims: &Map<String, Value>) -> bool;
}

/// Resolves a token subject into an application user. Returning `None` is an
/// authorization failure, not a silent pass-through.
pub trait UserLoader: Send + Sync {
    type User;

    fn load_user(&self, subject: &str) -> Option<Self::User>;
}
