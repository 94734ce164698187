//! GoTrue auth client.
//!
//! Signs users in with email and password, refreshes access tokens, signs
//! them out and keeps the resulting session in the [`SessionVault`] so the
//! next invocation finds it. Every transition is published on a
//! [`SessionBroadcast`], which is what [`AuthClient::on_session_change`]
//! subscribes to.
//!
//! ## Endpoints
//!
//! - `POST /auth/v1/token?grant_type=password`: sign in
//! - `POST /auth/v1/token?grant_type=refresh_token`: refresh
//! - `POST /auth/v1/logout`: revoke the refresh token
//!
//! ## Session Lookup
//!
//! [`AuthClient::current_session`] reads the vault. A session that expires
//! within [`REFRESH_MARGIN_SECS`] is refreshed first. When the service
//! rejects the refresh token the session is treated as expired externally:
//! the vault is cleared and `SignedOut` is broadcast.

use super::{check_status, ApiError, AuthClient};
use crate::libs::config::BackendConfig;
use crate::libs::secret::{SessionVault, VaultError};
use crate::libs::session::{AuthEvent, Session, SessionBroadcast, Subscription, User};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const TOKEN_URL: &str = "auth/v1/token";
const LOGOUT_URL: &str = "auth/v1/logout";
const API_KEY_HEADER: &str = "apikey";

/// Sessions closer than this to expiry are refreshed before use.
pub const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

/// Token endpoint response.
#[derive(Deserialize, Debug)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: User,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or_else(|| now + Duration::seconds(self.expires_in.unwrap_or(3600)));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

#[derive(Debug)]
pub struct GoTrueAuth {
    client: Client,
    config: BackendConfig,
    vault: SessionVault,
    events: SessionBroadcast,
}

impl GoTrueAuth {
    pub fn new(config: &BackendConfig) -> Self {
        Self::with_vault(config, SessionVault::new())
    }

    pub fn with_vault(config: &BackendConfig, vault: SessionVault) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
            vault,
            events: SessionBroadcast::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    async fn token_request<T: Serialize>(&self, grant_type: &str, body: &T) -> Result<Session, ApiError> {
        let response = self
            .client
            .post(self.url(TOKEN_URL))
            .query(&[("grant_type", grant_type)])
            .header(API_KEY_HEADER, &self.config.anon_key)
            .json(body)
            .send()
            .await?;
        let token = check_status(response).await?.json::<TokenResponse>().await?;
        Ok(token.into_session(Utc::now()))
    }

    fn persist(&self, session: &Session) {
        if let Err(e) = self.vault.store(session) {
            tracing::warn!(error = %e, "session could not be persisted");
        }
    }

    fn forget(&self) {
        if let Err(e) = self.vault.clear() {
            tracing::warn!(error = %e, "stored session could not be removed");
        }
    }

    /// The persisted session; an unreadable vault counts as signed out.
    fn stored_session(&self) -> Option<Session> {
        match self.vault.load() {
            Ok(session) => session,
            Err(VaultError::Io(e)) => {
                tracing::warn!(error = %e, "session vault unreadable");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "discarding corrupted session");
                self.forget();
                None
            }
        }
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let session = self.token_request("password", &PasswordGrant { email, password }).await?;
        self.persist(&session);
        tracing::info!(user = %session.user.id, "signed in");
        self.events.emit(AuthEvent::signed_in(session.clone()));
        Ok(session)
    }

    /// Exchanges the refresh token for a new session.
    ///
    /// `Ok(None)` means the service rejected the token: the session ended
    /// outside this client.
    pub async fn refresh(&self, session: &Session) -> Result<Option<Session>, ApiError> {
        match self
            .token_request("refresh_token", &RefreshGrant {
                refresh_token: &session.refresh_token,
            })
            .await
        {
            Ok(refreshed) => {
                self.persist(&refreshed);
                tracing::debug!(user = %refreshed.user.id, "access token refreshed");
                self.events.emit(AuthEvent::token_refreshed(refreshed.clone()));
                Ok(Some(refreshed))
            }
            Err(e) if e.is_auth_rejection() => {
                tracing::info!(error = %e, "refresh rejected, session expired");
                self.forget();
                self.events.emit(AuthEvent::signed_out());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

impl AuthClient for GoTrueAuth {
    async fn current_session(&self) -> Result<Option<Session>, ApiError> {
        let Some(session) = self.stored_session() else {
            return Ok(None);
        };
        if session.expires_within(Utc::now(), Duration::seconds(REFRESH_MARGIN_SECS)) {
            return self.refresh(&session).await;
        }
        Ok(Some(session))
    }

    fn on_session_change(&self) -> Subscription {
        self.events.subscribe()
    }

    /// Revokes the session remotely and always forgets it locally.
    ///
    /// A token the service no longer accepts is already signed out, so only
    /// transport and server failures are reported.
    async fn sign_out(&self) -> Result<(), ApiError> {
        let Some(session) = self.stored_session() else {
            self.events.emit(AuthEvent::signed_out());
            return Ok(());
        };

        let remote = match self
            .client
            .post(self.url(LOGOUT_URL))
            .header(API_KEY_HEADER, &self.config.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await
        {
            Ok(response) => check_status(response).await.map(|_| ()),
            Err(e) => Err(ApiError::from(e)),
        };

        self.forget();
        self.events.emit(AuthEvent::signed_out());

        match remote {
            Err(e) if !e.is_auth_rejection() && !e.is_not_found() => Err(e),
            _ => {
                tracing::info!(user = %session.user.id, "signed out");
                Ok(())
            }
        }
    }
}
