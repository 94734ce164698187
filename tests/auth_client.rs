//! Contract tests for the GoTrue auth client.
//!
//! Each test gets its own mock server and its own session vault.

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use serde_json::json;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};
    use todoer::api::auth::GoTrueAuth;
    use todoer::api::AuthClient;
    use todoer::libs::config::BackendConfig;
    use todoer::libs::secret::{SessionVault, SESSION_FILE};
    use todoer::libs::session::{AuthEventKind, Session, User};
    use wiremock::matchers::{bearer_token, body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ANON_KEY: &str = "anon-key";

    struct AuthTestContext {
        _temp_dir: TempDir,
        server: MockServer,
        vault: SessionVault,
    }

    impl AsyncTestContext for AuthTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let vault = SessionVault::at(temp_dir.path().join(SESSION_FILE));
            AuthTestContext {
                _temp_dir: temp_dir,
                server: MockServer::start().await,
                vault,
            }
        }
    }

    impl AuthTestContext {
        fn auth(&self) -> GoTrueAuth {
            GoTrueAuth::with_vault(&BackendConfig::new(&self.server.uri(), ANON_KEY), self.vault.clone())
        }

        fn stored(&self, expires_in: Duration) -> Session {
            let session = Session {
                access_token: "old-access".to_string(),
                refresh_token: "old-refresh".to_string(),
                expires_at: Utc::now() + expires_in,
                user: User {
                    id: "user-1".to_string(),
                    email: Some("user@example.com".to_string()),
                },
            };
            self.vault.store(&session).unwrap();
            session
        }
    }

    fn token_body(access: &str, refresh: &str) -> serde_json::Value {
        json!({
            "access_token": access,
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": refresh,
            "user": {"id": "user-1", "email": "user@example.com", "aud": "authenticated"}
        })
    }

    #[test_context(AuthTestContext)]
    #[tokio::test]
    async fn test_sign_in_persists_and_broadcasts(ctx: &mut AuthTestContext) {
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(header("apikey", ANON_KEY))
            .and(body_json(json!({"email": "user@example.com", "password": "hunter22"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("new-access", "new-refresh")))
            .expect(1)
            .mount(&ctx.server)
            .await;

        let auth = ctx.auth();
        let mut subscription = auth.on_session_change();
        let session = auth.sign_in_with_password("user@example.com", "hunter22").await.unwrap();

        assert_eq!(session.access_token, "new-access");
        assert_eq!(session.user.display_name(), "user@example.com");
        assert!(session.expires_at > Utc::now() + Duration::minutes(59));
        assert_eq!(ctx.vault.load().unwrap(), Some(session.clone()));

        let event = subscription.try_recv().unwrap();
        assert_eq!(event.kind, AuthEventKind::SignedIn);
        assert_eq!(event.session, Some(session));
    }

    #[test_context(AuthTestContext)]
    #[tokio::test]
    async fn test_rejected_sign_in_reports_reason(ctx: &mut AuthTestContext) {
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            })))
            .mount(&ctx.server)
            .await;

        let error = ctx.auth().sign_in_with_password("user@example.com", "wrong").await.unwrap_err();

        assert!(error.is_auth_rejection());
        assert!(error.to_string().contains("Invalid login credentials"));
        assert_eq!(ctx.vault.load().unwrap(), None);
    }

    #[test_context(AuthTestContext)]
    #[tokio::test]
    async fn test_no_stored_session(ctx: &mut AuthTestContext) {
        assert_eq!(ctx.auth().current_session().await.unwrap(), None);
    }

    #[test_context(AuthTestContext)]
    #[tokio::test]
    async fn test_fresh_session_is_used_as_is(ctx: &mut AuthTestContext) {
        let stored = ctx.stored(Duration::hours(1));

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("unexpected", "unexpected")))
            .expect(0)
            .mount(&ctx.server)
            .await;

        assert_eq!(ctx.auth().current_session().await.unwrap(), Some(stored));
    }

    #[test_context(AuthTestContext)]
    #[tokio::test]
    async fn test_expiring_session_is_refreshed(ctx: &mut AuthTestContext) {
        ctx.stored(Duration::seconds(10));

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "refresh_token"))
            .and(body_json(json!({"refresh_token": "old-refresh"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("new-access", "new-refresh")))
            .expect(1)
            .mount(&ctx.server)
            .await;

        let auth = ctx.auth();
        let mut subscription = auth.on_session_change();
        let session = auth.current_session().await.unwrap().unwrap();

        assert_eq!(session.access_token, "new-access");
        assert_eq!(ctx.vault.load().unwrap(), Some(session.clone()));
        assert_eq!(subscription.try_recv().unwrap().kind, AuthEventKind::TokenRefreshed);
    }

    #[test_context(AuthTestContext)]
    #[tokio::test]
    async fn test_rejected_refresh_signs_out(ctx: &mut AuthTestContext) {
        ctx.stored(Duration::seconds(-30));

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "refresh_token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid Refresh Token: Already Used"
            })))
            .mount(&ctx.server)
            .await;

        let auth = ctx.auth();
        let mut subscription = auth.on_session_change();

        assert_eq!(auth.current_session().await.unwrap(), None);
        assert_eq!(ctx.vault.load().unwrap(), None);
        let event = subscription.try_recv().unwrap();
        assert_eq!(event.kind, AuthEventKind::SignedOut);
        assert_eq!(event.session, None);
    }

    #[test_context(AuthTestContext)]
    #[tokio::test]
    async fn test_refresh_outage_keeps_session(ctx: &mut AuthTestContext) {
        let stored = ctx.stored(Duration::seconds(10));

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&ctx.server)
            .await;

        assert!(ctx.auth().current_session().await.is_err());
        assert_eq!(ctx.vault.load().unwrap(), Some(stored));
    }

    #[test_context(AuthTestContext)]
    #[tokio::test]
    async fn test_corrupted_vault_counts_as_signed_out(ctx: &mut AuthTestContext) {
        std::fs::write(ctx.vault.path(), "definitely not a session").unwrap();

        assert_eq!(ctx.auth().current_session().await.unwrap(), None);
        assert!(!ctx.vault.path().exists());
    }

    #[test_context(AuthTestContext)]
    #[tokio::test]
    async fn test_sign_out_revokes_and_forgets(ctx: &mut AuthTestContext) {
        ctx.stored(Duration::hours(1));

        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .and(header("apikey", ANON_KEY))
            .and(bearer_token("old-access"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&ctx.server)
            .await;

        let auth = ctx.auth();
        let mut subscription = auth.on_session_change();
        auth.sign_out().await.unwrap();

        assert_eq!(ctx.vault.load().unwrap(), None);
        assert_eq!(subscription.try_recv().unwrap().kind, AuthEventKind::SignedOut);
    }

    #[test_context(AuthTestContext)]
    #[tokio::test]
    async fn test_sign_out_with_revoked_token_succeeds(ctx: &mut AuthTestContext) {
        ctx.stored(Duration::hours(1));

        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "invalid JWT"})))
            .mount(&ctx.server)
            .await;

        ctx.auth().sign_out().await.unwrap();
        assert_eq!(ctx.vault.load().unwrap(), None);
    }

    #[test_context(AuthTestContext)]
    #[tokio::test]
    async fn test_sign_out_outage_still_forgets_locally(ctx: &mut AuthTestContext) {
        ctx.stored(Duration::hours(1));

        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&ctx.server)
            .await;

        assert!(ctx.auth().sign_out().await.is_err());
        assert_eq!(ctx.vault.load().unwrap(), None);
    }
}
