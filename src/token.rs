use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verified token contents. Immutable once decoded; lives for one request.
#[derive(Debug, Clone)]
pub struct TokenData {
    pub token_type: TokenType,
    /// Value of the configured identity claim.
    pub subject: String,
    /// Whether the token came from a direct login rather than a refresh.
    /// Absent claim reads as not fresh.
    pub fresh: bool,
    /// Double-submit value embedded in cookie-borne tokens.
    pub csrf: Option<String>,
    /// Application-defined claims carried under `user_claims`.
    pub user_claims: Map<String, Value>,
    /// Full claim set, available to revocation hooks (jti etc.).
    pub raw: Value,
}

impl TokenData {
    /// Builds the structural view over an already signature-checked claim set.
    /// `csrf_expected` is set when the token arrived via a CSRF-protected
    /// cookie and therefore must embed a `csrf` claim.
    pub(crate) fn from_claims(
        claims: Value,
        csrf_expected: bool,
        identity_claim: &str,
    ) -> AuthResult<Self> {
        let token_type = match claims.get("type").and_then(Value::as_str) {
            Some("access") => TokenType::Access,
            Some("refresh") => TokenType::Refresh,
            Some(other) => {
                return Err(AuthError::MalformedToken(format!(
                    "unknown token type '{other}'"
                )))
            }
            None => return Err(AuthError::MalformedToken("missing 'type' claim".into())),
        };

        let subject = match claims.get(identity_claim) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                return Err(AuthError::MalformedToken(format!(
                    "missing '{identity_claim}' claim"
                )))
            }
        };

        let fresh = claims
            .get("fresh")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let csrf = claims
            .get("csrf")
            .and_then(Value::as_str)
            .map(str::to_owned);
        if csrf_expected && csrf.is_none() {
            return Err(AuthError::MalformedToken("missing 'csrf' claim".into()));
        }

        let user_claims = claims
            .get("user_claims")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        Ok(Self {
            token_type,
            subject,
            fresh,
            csrf,
            user_claims,
            raw: claims,
        })
    }
}
