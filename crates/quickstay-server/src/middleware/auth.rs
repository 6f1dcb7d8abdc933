//! Static bearer-token check for the listing routes
//!
//! This is a placeholder guard: one shared token compared for equality.
//! When no token is configured every request passes.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::AuthConfig;
use crate::error::AppError;

#[derive(Clone, Default)]
pub struct ApiAuth {
    token: Option<Arc<str>>,
}

impl ApiAuth {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .map(Arc::from),
        }
    }

    /// Guard that lets everything through
    pub fn open() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }

    /// Check an `Authorization` header value
    pub fn authorizes(&self, authorization: Option<&str>) -> bool {
        let Some(expected) = self.token.as_deref() else {
            return true;
        };

        authorization
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim() == expected)
            .unwrap_or(false)
    }
}

impl From<&AuthConfig> for ApiAuth {
    fn from(config: &AuthConfig) -> Self {
        Self::new(config.api_token.clone())
    }
}

impl std::fmt::Debug for ApiAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiAuth")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// `from_fn_with_state` middleware rejecting requests without the token
pub async fn require_token(State(auth): State<ApiAuth>, request: Request, next: Next) -> Response {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if auth.authorizes(authorization) {
        next.run(request).await
    } else {
        AppError::Unauthorized.into_response()
    }
}
