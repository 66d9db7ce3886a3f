use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::{HeaderMap, Method};

use crate::error::{AuthError, AuthResult};

/// Read-only view of the parts of a request the gate inspects. The gate never
/// owns or mutates the request.
#[derive(Clone, Copy)]
pub struct RequestView<'a> {
    method: &'a Method,
    headers: &'a HeaderMap,
}

impl<'a> RequestView<'a> {
    pub fn new(method: &'a Method, headers: &'a HeaderMap) -> Self {
        Self { method, headers }
    }

    pub fn from_parts(parts: &'a Parts) -> Self {
        Self {
            method: &parts.method,
            headers: &parts.headers,
        }
    }

    pub fn method(&self) -> &Method {
        self.method
    }

    pub fn header(&self, name: &str) -> Option<&'a str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Looks a cookie up across all `Cookie` headers on the request.
    pub fn cookie(&self, name: &str) -> Option<&'a str> {
        self.headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

/// Pulls the token out of the configured authorization header. With a scheme
/// configured the value must be exactly `<scheme> <token>`; without one it
/// must be the bare token.
pub(crate) fn token_from_header<'a>(
    view: &RequestView<'a>,
    header_name: &str,
    header_type: Option<&str>,
) -> AuthResult<&'a str> {
    let value = view
        .header(header_name)
        .ok_or_else(|| AuthError::NoAuthorization(format!("missing {header_name} header")))?;

    let parts: Vec<&str> = value.split_whitespace().collect();
    match header_type {
        None => match parts.as_slice() {
            [token] => Ok(token),
            _ => Err(AuthError::InvalidHeader(format!(
                "expected '{header_name}: <token>'"
            ))),
        },
        Some(scheme) => match parts.as_slice() {
            [word, token] if *word == scheme => Ok(token),
            _ => Err(AuthError::InvalidHeader(format!(
                "expected '{header_name}: {scheme} <token>'"
            ))),
        },
    }
}

pub(crate) fn token_from_cookie<'a>(
    view: &RequestView<'a>,
    cookie_name: &str,
) -> AuthResult<&'a str> {
    view.cookie(cookie_name)
        .ok_or_else(|| AuthError::NoAuthorization(format!("missing cookie '{cookie_name}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn view_with(name: &'static str, value: &'static str) -> (Method, HeaderMap) {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        (Method::GET, headers)
    }

    #[test]
    fn bearer_header_accepts_scheme_and_token() {
        let (method, headers) = view_with("authorization", "Bearer abc.def.ghi");
        let view = RequestView::new(&method, &headers);
        let token = token_from_header(&view, "Authorization", Some("Bearer")).expect("token");
        assert_eq!(token, "abc.def.ghi");
    }

    #[test]
    fn missing_header_is_no_authorization() {
        let headers = HeaderMap::new();
        let method = Method::GET;
        let view = RequestView::new(&method, &headers);
        let err = token_from_header(&view, "Authorization", Some("Bearer")).unwrap_err();
        assert!(matches!(err, AuthError::NoAuthorization(_)));
    }

    #[test]
    fn wrong_scheme_is_invalid_header() {
        let (method, headers) = view_with("authorization", "Basic abc");
        let view = RequestView::new(&method, &headers);
        let err = token_from_header(&view, "Authorization", Some("Bearer")).unwrap_err();
        assert!(matches!(err, AuthError::InvalidHeader(_)));
    }

    #[test]
    fn extra_parts_are_invalid_header() {
        let (method, headers) = view_with("authorization", "Bearer abc extra");
        let view = RequestView::new(&method, &headers);
        let err = token_from_header(&view, "Authorization", Some("Bearer")).unwrap_err();
        assert!(matches!(err, AuthError::InvalidHeader(_)));
    }

    #[test]
    fn bare_token_mode_requires_single_part() {
        let (method, headers) = view_with("authorization", "abc.def.ghi");
        let view = RequestView::new(&method, &headers);
        let token = token_from_header(&view, "Authorization", None).expect("token");
        assert_eq!(token, "abc.def.ghi");

        let (method, headers) = view_with("authorization", "Bearer abc");
        let view = RequestView::new(&method, &headers);
        let err = token_from_header(&view, "Authorization", None).unwrap_err();
        assert!(matches!(err, AuthError::InvalidHeader(_)));
    }

    #[test]
    fn cookie_lookup_scans_pairs() {
        let (method, headers) = view_with("cookie", "a=1; access_token_cookie=tok; b=2");
        let view = RequestView::new(&method, &headers);
        assert_eq!(view.cookie("access_token_cookie"), Some("tok"));
        assert_eq!(view.cookie("b"), Some("2"));
        assert_eq!(view.cookie("missing"), None);
    }

    #[test]
    fn missing_cookie_is_no_authorization() {
        let headers = HeaderMap::new();
        let method = Method::GET;
        let view = RequestView::new(&method, &headers);
        let err = token_from_cookie(&view, "access_token_cookie").unwrap_err();
        assert!(matches!(err, AuthError::NoAuthorization(_)));
    }
}
