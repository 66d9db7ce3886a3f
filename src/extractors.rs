//! axum extractors wrapping the gate's policies. Each one runs the pipeline
//! from the request parts and, on success, also stores the identity in the
//! request extensions for downstream middleware and handlers.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;

use crate::error::AuthError;
use crate::extract::RequestView;
use crate::gate::{AuthGate, Policy, VerifiedIdentity};

/// Requires a valid access token.
#[derive(Debug, Clone)]
pub struct Auth<U = ()>(pub VerifiedIdentity<U>);

/// Accepts requests with or without a token; any presented token must still
/// verify fully.
#[derive(Debug, Clone)]
pub struct OptionalAuth<U = ()>(pub Option<VerifiedIdentity<U>>);

/// Requires a valid access token from a direct login.
#[derive(Debug, Clone)]
pub struct FreshAuth<U = ()>(pub VerifiedIdentity<U>);

/// Requires a valid refresh token.
#[derive(Debug, Clone)]
pub struct RefreshAuth<U = ()>(pub VerifiedIdentity<U>);

fn authorize_parts<S, U>(
    parts: &mut Parts,
    state: &S,
    policy: Policy,
) -> Result<Option<VerifiedIdentity<U>>, AuthError>
where
    Arc<AuthGate<U>>: FromRef<S>,
    U: Clone + Send + Sync + 'static,
{
    let gate = Arc::<AuthGate<U>>::from_ref(state);
    let identity = {
        let view = RequestView::from_parts(parts);
        gate.authorize(&view, policy)?
    };
    if let Some(identity) = &identity {
        parts.extensions.insert(identity.clone());
    }
    Ok(identity)
}

fn require<U>(identity: Option<VerifiedIdentity<U>>) -> Result<VerifiedIdentity<U>, AuthError> {
    // required policies never yield None from the gate
    identity.ok_or_else(|| AuthError::NoAuthorization("missing token".to_string()))
}

#[async_trait]
impl<S, U> FromRequestParts<S> for Auth<U>
where
    Arc<AuthGate<U>>: FromRef<S>,
    S: Send + Sync,
    U: Clone + Send + Sync + 'static,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = authorize_parts(parts, state, Policy::AccessRequired)?;
        Ok(Self(require(identity)?))
    }
}

#[async_trait]
impl<S, U> FromRequestParts<S> for OptionalAuth<U>
where
    Arc<AuthGate<U>>: FromRef<S>,
    S: Send + Sync,
    U: Clone + Send + Sync + 'static,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(authorize_parts(parts, state, Policy::AccessOptional)?))
    }
}

#[async_trait]
impl<S, U> FromRequestParts<S> for FreshAuth<U>
where
    Arc<AuthGate<U>>: FromRef<S>,
    S: Send + Sync,
    U: Clone + Send + Sync + 'static,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = authorize_parts(parts, state, Policy::FreshAccessRequired)?;
        Ok(Self(require(identity)?))
    }
}

#[async_trait]
impl<S, U> FromRequestParts<S> for RefreshAuth<U>
where
    Arc<AuthGate<U>>: FromRef<S>,
    S: Send + Sync,
    U: Clone + Send + Sync + 'static,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = authorize_parts(parts, state, Policy::RefreshRequired)?;
        Ok(Self(require(identity)?))
    }
}
