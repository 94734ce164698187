//! Contract tests for the PostgREST task backend.
//!
//! These verify the exact requests sent to `/rest/v1/{table}` and how the
//! responses are decoded.

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use serde_json::json;
    use todoer::api::rest::RestTaskBackend;
    use todoer::api::{ApiError, TaskBackend};
    use todoer::libs::config::BackendConfig;
    use todoer::libs::session::{Session, User};
    use todoer::libs::task::{NewTaskRow, Task, TaskId};
    use wiremock::matchers::{bearer_token, body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ANON_KEY: &str = "anon-key";

    fn session() -> Session {
        Session {
            access_token: "user-access-token".to_string(),
            refresh_token: "user-refresh-token".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
            user: User {
                id: "5f0c1a5e-user".to_string(),
                email: Some("user@example.com".to_string()),
            },
        }
    }

    fn backend(server: &MockServer) -> RestTaskBackend {
        RestTaskBackend::new(&BackendConfig::new(&server.uri(), ANON_KEY))
    }

    // ────────────────────────────────────────────────────────────────────────────
    // Select
    // ────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_select_orders_newest_first_and_authenticates() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/tasks"))
            .and(query_param("select", "*"))
            .and(query_param("order", "created_at.desc"))
            .and(header("apikey", ANON_KEY))
            .and(bearer_token("user-access-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 2, "user_id": "5f0c1a5e-user", "text": "Call mom", "completed": false, "created_at": "2024-05-01T10:00:00.123456+00:00"},
                {"id": 1, "user_id": "5f0c1a5e-user", "text": "Buy milk", "completed": true, "created_at": "2024-05-01T09:00:00+00:00"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let rows = backend(&server).select_all(&session()).await.unwrap();
        let tasks: Vec<Task> = rows.into_iter().map(|row| Task::try_from(row).unwrap()).collect();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, TaskId::new("2"));
        assert_eq!(tasks[0].text, "Call mom");
        assert!(tasks[1].completed);
        assert!(tasks[0].created_at > tasks[1].created_at);
    }

    #[tokio::test]
    async fn test_row_without_completed_flag_is_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 3, "text": "Water plants", "created_at": "2024-05-01T11:00:00Z"}
            ])))
            .mount(&server)
            .await;

        let mut rows = backend(&server).select_all(&session()).await.unwrap();
        let row = rows.pop().unwrap();
        assert_eq!(row.completed, None);

        match Task::try_from(row) {
            Err(ApiError::InvalidRow(reason)) => assert!(reason.contains("completed")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_select_uses_configured_table() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/todos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = BackendConfig::new(&format!("{}/", server.uri()), ANON_KEY);
        config.table = "todos".to_string();

        let rows = RestTaskBackend::new(&config).select_all(&session()).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_select_error_carries_service_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/tasks"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": "PGRST301",
                "message": "JWT expired"
            })))
            .mount(&server)
            .await;

        let error = backend(&server).select_all(&session()).await.unwrap_err();

        match error {
            ApiError::Status { status, message } => {
                assert_eq!(status.as_u16(), 401);
                assert_eq!(message, "JWT expired");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    // ────────────────────────────────────────────────────────────────────────────
    // Insert
    // ────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_insert_requests_representation() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/tasks"))
            .and(header("Prefer", "return=representation"))
            .and(header("apikey", ANON_KEY))
            .and(body_json(json!({
                "user_id": "5f0c1a5e-user",
                "text": "Buy milk",
                "completed": false
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([
                {"id": "a1b2", "user_id": "5f0c1a5e-user", "text": "Buy milk", "completed": false, "created_at": "2024-05-01T09:00:00Z"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let row = NewTaskRow::new("5f0c1a5e-user", "Buy milk");
        let created = backend(&server).insert(&session(), &row).await.unwrap();
        let task = Task::try_from(created).unwrap();

        assert_eq!(task.id, TaskId::new("a1b2"));
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
    }

    #[tokio::test]
    async fn test_insert_without_returned_row_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/tasks"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
            .mount(&server)
            .await;

        let row = NewTaskRow::new("5f0c1a5e-user", "Buy milk");
        let result = backend(&server).insert(&session(), &row).await;

        assert!(matches!(result, Err(ApiError::EmptyResponse)));
    }

    // ────────────────────────────────────────────────────────────────────────────
    // Update / Delete
    // ────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_update_filters_by_id() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/rest/v1/tasks"))
            .and(query_param("id", "eq.7"))
            .and(bearer_token("user-access-token"))
            .and(body_json(json!({"completed": true})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        backend(&server).update_completed(&session(), &TaskId::new("7"), true).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_filters_by_id() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/rest/v1/tasks"))
            .and(query_param("id", "eq.7"))
            .and(header("apikey", ANON_KEY))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        backend(&server).delete(&session(), &TaskId::new("7")).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_failure_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/rest/v1/tasks"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let error = backend(&server).delete(&session(), &TaskId::new("7")).await.unwrap_err();

        assert!(matches!(error, ApiError::Status { .. }));
        assert!(!error.is_auth_rejection());
    }
}
