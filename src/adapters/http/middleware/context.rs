//! Request context resolution.
//!
//! `resolve_context` runs in front of every `/api` route. It decides which
//! tenant and user a request acts for and stores a [`RequestContext`] in the
//! request extensions, where handlers pick it up with the extractor below.
//!
//! Tenant precedence: the tenant header, then the configured default tenant,
//! otherwise the request is rejected.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::config::TenancyConfig;
use crate::domain::foundation::{CommandMetadata, TenantId, UserId};

use crate::adapters::http::error::ErrorResponse;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tenant and acting user resolved for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub tenant_id: TenantId,
    pub user_id: UserId,
    pub request_id: Option<String>,
}

impl RequestContext {
    /// Command metadata for handlers, correlated by request id when present.
    pub fn metadata(&self) -> CommandMetadata {
        let metadata = CommandMetadata::new(self.tenant_id.clone(), self.user_id.clone())
            .with_source("http");
        match &self.request_id {
            Some(id) => metadata.with_correlation_id(id.clone()),
            None => metadata,
        }
    }
}

/// Why a request context could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextRejection {
    TenantRequired,
    InvalidTenant(String),
    UserRequired,
}

impl IntoResponse for ContextRejection {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ContextRejection::TenantRequired => (
                StatusCode::BAD_REQUEST,
                "TENANT_REQUIRED",
                "No tenant header and no default tenant configured".to_string(),
            ),
            ContextRejection::InvalidTenant(reason) => {
                (StatusCode::BAD_REQUEST, "INVALID_TENANT", reason)
            }
            ContextRejection::UserRequired => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHENTICATED",
                "A user id header is required".to_string(),
            ),
        };
        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

/// Resolves the tenant and user of a request from its headers.
pub fn resolve(
    headers: &HeaderMap,
    tenancy: &TenancyConfig,
) -> Result<RequestContext, ContextRejection> {
    let tenant_id = match header(headers, &tenancy.tenant_header) {
        Some(raw) => {
            TenantId::new(raw).map_err(|e| ContextRejection::InvalidTenant(e.to_string()))?
        }
        None => tenancy
            .fallback_tenant()
            .ok_or(ContextRejection::TenantRequired)?,
    };

    let user_id = header(headers, &tenancy.user_header)
        .and_then(|raw| UserId::new(raw).ok())
        .ok_or(ContextRejection::UserRequired)?;

    Ok(RequestContext {
        tenant_id,
        user_id,
        request_id: header(headers, REQUEST_ID_HEADER).map(str::to_string),
    })
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Middleware that rejects requests without a resolvable context.
pub async fn resolve_context(
    State(tenancy): State<Arc<TenancyConfig>>,
    mut request: Request,
    next: Next,
) -> Response {
    match resolve(request.headers(), &tenancy) {
        Ok(context) => {
            request.extensions_mut().insert(context);
            next.run(request).await
        }
        Err(rejection) => {
            tracing::debug!(?rejection, "request context rejected");
            rejection.into_response()
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ContextRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or(ContextRejection::UserRequired)
    }
}
