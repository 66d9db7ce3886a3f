use axum::http::Method;
use jsonwebtoken::Algorithm;

/// Where the gate looks for a token on an incoming request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLocation {
    Headers,
    Cookies,
    /// Try cookies first, fall back to headers when no cookie token is present.
    Both,
}

/// Runtime configuration for the authorization gate. Read-only once the gate
/// is built; one instance serves every request.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub token_location: TokenLocation,
    /// Header carrying the token when header transport is enabled.
    pub header_name: String,
    /// Expected scheme word in the header value ("Bearer"). `None` means the
    /// header value must be the bare token.
    pub header_type: Option<String>,
    pub access_cookie_name: String,
    pub refresh_cookie_name: String,
    /// Enables double-submit CSRF checks for cookie-borne tokens.
    pub csrf_protect: bool,
    pub access_csrf_header_name: String,
    pub refresh_csrf_header_name: String,
    /// Methods that require the CSRF check when it is enabled.
    pub csrf_methods: Vec<Method>,
    /// Claim holding the token subject.
    pub identity_claim: String,
    pub blacklist_enabled: bool,
    pub blacklist_access_tokens: bool,
    pub blacklist_refresh_tokens: bool,
    pub algorithm: Algorithm,
    /// Clock skew allowance in seconds when validating expiry.
    pub leeway_seconds: u32,
}

impl AuthConfig {
    pub fn new() -> Self {
        Self {
            token_location: TokenLocation::Headers,
            header_name: "Authorization".to_string(),
            header_type: Some("Bearer".to_string()),
            access_cookie_name: "access_token_cookie".to_string(),
            refresh_cookie_name: "refresh_token_cookie".to_string(),
            csrf_protect: true,
            access_csrf_header_name: "X-CSRF-TOKEN".to_string(),
            refresh_csrf_header_name: "X-CSRF-TOKEN".to_string(),
            csrf_methods: vec![Method::POST, Method::PUT, Method::PATCH, Method::DELETE],
            identity_claim: "sub".to_string(),
            blacklist_enabled: false,
            blacklist_access_tokens: true,
            blacklist_refresh_tokens: true,
            algorithm: Algorithm::HS256,
            leeway_seconds: 0,
        }
    }

    pub fn with_token_location(mut self, location: TokenLocation) -> Self {
        self.token_location = location;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, scheme: Option<String>) -> Self {
        self.header_name = name.into();
        self.header_type = scheme;
        self
    }

    pub fn with_cookie_names(
        mut self,
        access: impl Into<String>,
        refresh: impl Into<String>,
    ) -> Self {
        self.access_cookie_name = access.into();
        self.refresh_cookie_name = refresh.into();
        self
    }

    pub fn with_csrf_protect(mut self, enabled: bool) -> Self {
        self.csrf_protect = enabled;
        self
    }

    pub fn with_csrf_methods(mut self, methods: Vec<Method>) -> Self {
        self.csrf_methods = methods;
        self
    }

    pub fn with_identity_claim(mut self, claim: impl Into<String>) -> Self {
        self.identity_claim = claim.into();
        self
    }

    pub fn with_blacklist(mut self, enabled: bool) -> Self {
        self.blacklist_enabled = enabled;
        self
    }

    pub fn with_blacklist_token_types(mut self, access: bool, refresh: bool) -> Self {
        self.blacklist_access_tokens = access;
        self.blacklist_refresh_tokens = refresh;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_leeway(mut self, seconds: u32) -> Self {
        self.leeway_seconds = seconds;
        self
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_header_bearer_transport() {
        let config = AuthConfig::new();
        assert_eq!(config.token_location, TokenLocation::Headers);
        assert_eq!(config.header_name, "Authorization");
        assert_eq!(config.header_type.as_deref(), Some("Bearer"));
        assert!(config.csrf_protect);
        assert!(!config.blacklist_enabled);
        assert!(config.csrf_methods.contains(&Method::POST));
        assert!(!config.csrf_methods.contains(&Method::GET));
    }
}
