use std::sync::Arc;

use jsonwebtoken::DecodingKey;
use tracing::{debug, warn};

use crate::config::{AuthConfig, TokenLocation};
use crate::csrf::verify_double_submit;
use crate::error::{AuthError, AuthResult, ConfigError};
use crate::extract::{token_from_cookie, token_from_header, RequestView};
use crate::hooks::{ClaimsCheck, RevocationCheck, UserLoader};
use crate::token::{TokenData, TokenType};
use crate::verifier::decode_token;

/// Authorization policy applied around a protected operation. The variants
/// differ only in expected token type, freshness requirement, and whether a
/// missing token is tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    AccessRequired,
    AccessOptional,
    FreshAccessRequired,
    RefreshRequired,
}

impl Policy {
    pub fn expected_type(&self) -> TokenType {
        match self {
            Policy::RefreshRequired => TokenType::Refresh,
            _ => TokenType::Access,
        }
    }

    pub fn requires_fresh(&self) -> bool {
        matches!(self, Policy::FreshAccessRequired)
    }

    /// Whether an absent token lets the request through unauthenticated.
    pub fn allows_missing(&self) -> bool {
        matches!(self, Policy::AccessOptional)
    }
}

/// Outcome of a fully verified request: the decoded token plus the resolved
/// application user, when a loader is registered. Only produced after every
/// applicable check has passed.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity<U = ()> {
    pub token: TokenData,
    pub user: Option<U>,
}

impl<U> VerifiedIdentity<U> {
    pub fn subject(&self) -> &str {
        &self.token.subject
    }
}

/// The authorization gate. Built once at startup, shared across requests via
/// `Arc`; every per-request invocation is stateless.
pub struct AuthGate<U = ()> {
    config: AuthConfig,
    decoding_key: DecodingKey,
    revocation: Option<Arc<dyn RevocationCheck>>,
    claims_check: Option<Arc<dyn ClaimsCheck>>,
    user_loader: Option<Arc<dyn UserLoader<User = U>>>,
}

impl<U> std::fmt::Debug for AuthGate<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<U> AuthGate<U> {
    pub fn builder(config: AuthConfig) -> AuthGateBuilder<U> {
        AuthGateBuilder::new(config)
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Runs the full pipeline for one request under the given policy.
    ///
    /// Returns `Ok(Some(..))` on success and `Ok(None)` only under
    /// [`Policy::AccessOptional`] when no token was presented; every other
    /// failure is an error.
    pub fn authorize(
        &self,
        request: &RequestView<'_>,
        policy: Policy,
    ) -> AuthResult<Option<VerifiedIdentity<U>>> {
        match self.run_pipeline(request, policy) {
            Ok(identity) => Ok(identity),
            Err(err) => {
                warn!(policy = ?policy, error = %err, "request failed authorization");
                Err(err)
            }
        }
    }

    fn run_pipeline(
        &self,
        request: &RequestView<'_>,
        policy: Policy,
    ) -> AuthResult<Option<VerifiedIdentity<U>>> {
        let expected = policy.expected_type();

        let token = match self.token_from_request(request, expected) {
            Ok(token) => token,
            Err(AuthError::NoAuthorization(_)) if policy.allows_missing() => {
                debug!("no token presented, continuing unauthenticated");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        if token.token_type != expected {
            return Err(AuthError::WrongToken(expected));
        }

        if policy.requires_fresh() && !token.fresh {
            return Err(AuthError::FreshTokenRequired);
        }

        if token.token_type == TokenType::Access {
            if let Some(hook) = &self.claims_check {
                if !hook.verify(&token.user_claims) {
                    return Err(AuthError::ClaimsVerification);
                }
            }
        }

        if self.is_revoked(&token) {
            return Err(AuthError::RevokedToken);
        }

        let user = self.resolve_user(&token)?;
        Ok(Some(VerifiedIdentity { token, user }))
    }

    /// Transport dispatch. Under [`TokenLocation::Both`] the cookie path runs
    /// first and only its "token absent" outcome falls through to the header
    /// path; any other cookie failure propagates as-is. When both paths come
    /// up empty the two misses collapse into one error.
    fn token_from_request(
        &self,
        request: &RequestView<'_>,
        expected: TokenType,
    ) -> AuthResult<TokenData> {
        match self.config.token_location {
            TokenLocation::Headers => self.decode_from_headers(request),
            TokenLocation::Cookies => self.decode_from_cookies(request, expected),
            TokenLocation::Both => match self.decode_from_cookies(request, expected) {
                Err(AuthError::NoAuthorization(_)) => match self.decode_from_headers(request) {
                    Err(AuthError::NoAuthorization(_)) => Err(AuthError::NoAuthorization(
                        "missing token in headers and cookies".to_string(),
                    )),
                    other => other,
                },
                other => other,
            },
        }
    }

    fn decode_from_headers(&self, request: &RequestView<'_>) -> AuthResult<TokenData> {
        let encoded = token_from_header(
            request,
            &self.config.header_name,
            self.config.header_type.as_deref(),
        )?;
        decode_token(
            encoded,
            &self.decoding_key,
            self.config.algorithm,
            self.config.leeway_seconds,
            false,
            &self.config.identity_claim,
        )
    }

    fn decode_from_cookies(
        &self,
        request: &RequestView<'_>,
        expected: TokenType,
    ) -> AuthResult<TokenData> {
        let (cookie_name, csrf_header_name) = match expected {
            TokenType::Access => (
                &self.config.access_cookie_name,
                &self.config.access_csrf_header_name,
            ),
            TokenType::Refresh => (
                &self.config.refresh_cookie_name,
                &self.config.refresh_csrf_header_name,
            ),
        };

        let encoded = token_from_cookie(request, cookie_name)?;
        let token = decode_token(
            encoded,
            &self.decoding_key,
            self.config.algorithm,
            self.config.leeway_seconds,
            self.config.csrf_protect,
            &self.config.identity_claim,
        )?;

        if self.config.csrf_protect && self.config.csrf_methods.contains(request.method()) {
            // decode_token required the csrf claim under csrf_protect
            if let Some(token_csrf) = token.csrf.as_deref() {
                verify_double_submit(token_csrf, request.header(csrf_header_name))?;
            }
        }

        Ok(token)
    }

    fn is_revoked(&self, token: &TokenData) -> bool {
        if !self.config.blacklist_enabled {
            return false;
        }
        let checked_type = match token.token_type {
            TokenType::Access => self.config.blacklist_access_tokens,
            TokenType::Refresh => self.config.blacklist_refresh_tokens,
        };
        if !checked_type {
            return false;
        }
        // build() refuses a blacklist config without a hook, so None is unreachable
        match &self.revocation {
            Some(hook) => hook.is_revoked(token),
            None => false,
        }
    }

    fn resolve_user(&self, token: &TokenData) -> AuthResult<Option<U>> {
        let Some(loader) = &self.user_loader else {
            return Ok(None);
        };
        match loader.load_user(&token.subject) {
            Some(user) => Ok(Some(user)),
            None => Err(AuthError::UserLoad(token.subject.clone())),
        }
    }
}

pub struct AuthGateBuilder<U = ()> {
    config: AuthConfig,
    decoding_key: Option<DecodingKey>,
    revocation: Option<Arc<dyn RevocationCheck>>,
    claims_check: Option<Arc<dyn ClaimsCheck>>,
    user_loader: Option<Arc<dyn UserLoader<User = U>>>,
}

impl<U> AuthGateBuilder<U> {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            decoding_key: None,
            revocation: None,
            claims_check: None,
            user_loader: None,
        }
    }

    /// Shared secret for the symmetric HMAC algorithm family.
    pub fn with_secret(mut self, secret: &[u8]) -> Self {
        self.decoding_key = Some(DecodingKey::from_secret(secret));
        self
    }

    pub fn with_decoding_key(mut self, key: DecodingKey) -> Self {
        self.decoding_key = Some(key);
        self
    }

    pub fn with_revocation_check(mut self, hook: Arc<dyn RevocationCheck>) -> Self {
        self.revocation = Some(hook);
        self
    }

    pub fn with_claims_check(mut self, hook: Arc<dyn ClaimsCheck>) -> Self {
        self.claims_check = Some(hook);
        self
    }

    pub fn with_user_loader(mut self, loader: Arc<dyn UserLoader<User = U>>) -> Self {
        self.user_loader = Some(loader);
        self
    }

    /// Validates the configuration and produces the gate. Enabling blacklist
    /// checking for either token type without registering a
    /// [`RevocationCheck`] is refused here, so misconfiguration aborts
    /// startup instead of surfacing per request.
    pub fn build(self) -> Result<AuthGate<U>, ConfigError> {
        let decoding_key = self.decoding_key.ok_or(ConfigError::MissingDecodingKey)?;

        if self.config.blacklist_enabled
            && (self.config.blacklist_access_tokens || self.config.blacklist_refresh_tokens)
            && self.revocation.is_none()
        {
            return Err(ConfigError::MissingRevocationHook);
        }

        Ok(AuthGate {
            config: self.config,
            decoding_key,
            revocation: self.revocation,
            claims_check: self.claims_check,
            user_loader: self.user_loader,
        })
    }
}
