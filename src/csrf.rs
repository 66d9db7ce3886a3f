use subtle::ConstantTimeEq;

use crate::error::{AuthError, AuthResult};

/// Compares the CSRF value embedded in the token against the one supplied via
/// the request header. Constant-time on the value comparison.
pub(crate) fn verify_double_submit(
    token_csrf: &str,
    header_csrf: Option<&str>,
) -> AuthResult<()> {
    let provided = header_csrf.ok_or(AuthError::Csrf("missing CSRF token in headers"))?;

    let eq = ConstantTimeEq::ct_eq(token_csrf.as_bytes(), provided.as_bytes()).unwrap_u8();
    if eq != 1 {
        return Err(AuthError::Csrf("CSRF double submit tokens do not match"));
    }
    Ok(())
}
