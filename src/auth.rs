//! Authentication Module
//!
//! Bearer tokens are verified by the OpenID Connect identity provider's
//! userinfo endpoint. Accepted tokens are cached for a short TTL so repeat
//! requests skip the round trip.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::{self, CacheStore, SharedCache};
use crate::error::{AppError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

// == Principal ==
/// The authenticated caller, as described by the userinfo response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    #[serde(rename = "sub")]
    pub subject: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "preferred_username")]
    pub name: Option<String>,
}

// == Identity Provider ==
pub struct IdentityProvider {
    client: reqwest::Client,
    userinfo_url: String,
    tokens: SharedCache<Principal>,
}

impl IdentityProvider {
    pub fn new(userinfo_url: impl Into<String>, token_ttl: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            userinfo_url: userinfo_url.into(),
            tokens: cache::shared(CacheStore::new(token_ttl)),
        })
    }

    pub fn userinfo_url(&self) -> &str {
        &self.userinfo_url
    }

    /// Cache of verified tokens, swept by the cleanup task.
    pub fn token_cache(&self) -> SharedCache<Principal> {
        self.tokens.clone()
    }

    /// Resolves `token` to its principal.
    ///
    /// # Errors
    /// - `Unauthorized` when the provider rejects the token
    /// - `Unavailable` when the provider cannot be reached or answers unexpectedly
    pub async fn authenticate(&self, token: &str) -> Result<Principal> {
        let cached = self.tokens.write().await.get(token);
        if let Some(principal) = cached {
            debug!(subject = %principal.subject, "Token served from cache");
            return Ok(principal);
        }

        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Identity provider unreachable");
                AppError::Unavailable("Identity provider unavailable".to_string())
            })?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(AppError::Unauthorized("Invalid or expired token".to_string()));
            }
            status => {
                warn!(%status, "Unexpected identity provider response");
                return Err(AppError::Unavailable(
                    "Identity provider unavailable".to_string(),
                ));
            }
        }

        let principal: Principal = response.json().await.map_err(|e| {
            warn!(error = %e, "Malformed userinfo response");
            AppError::Unavailable("Identity provider unavailable".to_string())
        })?;

        debug!(subject = %principal.subject, "Token verified");
        self.tokens.write().await.insert(token, principal.clone());
        Ok(principal)
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

// == Middleware ==
/// Rejects requests without a valid bearer token; stores the [`Principal`]
/// in the request extensions otherwise.
pub async fn require_auth(
    State(identity): State<Arc<IdentityProvider>>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?
        .to_string();

    let principal = identity.authenticate(&token).await?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
