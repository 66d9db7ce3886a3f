pub mod config;
pub mod csrf;
pub mod error;
pub mod extract;
pub mod extractors;
pub mod gate;
pub mod hooks;
pub mod token;
pub mod verifier;

pub use config::{AuthConfig, TokenLocation};
pub use error::{AuthError, AuthResult, ConfigError};
pub use extract::RequestView;
pub use extractors::{Auth, FreshAuth, OptionalAuth, RefreshAuth};
pub use gate::{AuthGate, AuthGateBuilder, Policy, VerifiedIdentity};
pub use hooks::{ClaimsCheck, RevocationCheck, UserLoader};
pub use token::{TokenData, TokenType};
