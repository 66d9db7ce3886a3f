use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::Value;
use tracing::debug;

use crate::error::{AuthError, AuthResult};
use crate::token::TokenData;

/// Verifies signature and expiry of an encoded token and converts the claim
/// set into a [`TokenData`]. Pure function of its inputs.
pub fn decode_token(
    encoded: &str,
    key: &DecodingKey,
    algorithm: Algorithm,
    leeway_seconds: u32,
    csrf_expected: bool,
    identity_claim: &str,
) -> AuthResult<TokenData> {
    let mut validation = Validation::new(algorithm);
    validation.leeway = leeway_seconds.into();
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["exp"]);

    let data = decode::<Value>(encoded, key, &validation).map_err(|err| match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::MalformedToken(err.to_string()),
    })?;

    let token = TokenData::from_claims(data.claims, csrf_expected, identity_claim)?;
    debug!(token_type = %token.token_type, "decoded token");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn sign(claims: &Value, secret: &[u8]) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .expect("sign token")
    }

    fn base_claims(exp_offset: i64) -> Value {
        json!({
            "type": "access",
            "sub": "user1",
            "fresh": true,
            "iat": Utc::now().timestamp(),
            "exp": Utc::now().timestamp() + exp_offset,
        })
    }

    #[test]
    fn accepts_valid_token() {
        let encoded = sign(&base_claims(600), b"secret");
        let token = decode_token(
            &encoded,
            &DecodingKey::from_secret(b"secret"),
            Algorithm::HS256,
            0,
            false,
            "sub",
        )
        .expect("decodes");
        assert_eq!(token.subject, "user1");
        assert!(token.fresh);
    }

    #[test]
    fn rejects_wrong_secret_as_invalid_signature() {
        let encoded = sign(&base_claims(600), b"secret");
        let err = decode_token(
            &encoded,
            &DecodingKey::from_secret(b"other-secret"),
            Algorithm::HS256,
            0,
            false,
            "sub",
        )
        .unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[test]
    fn rejects_expired_token() {
        let encoded = sign(&base_claims(-600), b"secret");
        let err = decode_token(
            &encoded,
            &DecodingKey::from_secret(b"secret"),
            Algorithm::HS256,
            0,
            false,
            "sub",
        )
        .unwrap_err();
        assert!(matches!(err, AuthError::ExpiredToken));
    }

    #[test]
    fn leeway_tolerates_recent_expiry() {
        let encoded = sign(&base_claims(-10), b"secret");
        let token = decode_token(
            &encoded,
            &DecodingKey::from_secret(b"secret"),
            Algorithm::HS256,
            60,
            false,
            "sub",
        );
        assert!(token.is_ok());
    }

    #[test]
    fn token_without_exp_is_malformed() {
        let encoded = sign(&json!({"type": "access", "sub": "u"}), b"secret");
        let err = decode_token(
            &encoded,
            &DecodingKey::from_secret(b"secret"),
            Algorithm::HS256,
            0,
            false,
            "sub",
        )
        .unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken(_)));
    }

    #[test]
    fn garbage_input_is_malformed() {
        let err = decode_token(
            "not-a-jwt",
            &DecodingKey::from_secret(b"secret"),
            Algorithm::HS256,
            0,
            false,
            "sub",
        )
        .unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken(_)));
    }
}
