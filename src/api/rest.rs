//! PostgREST client for the tasks relation.
//!
//! Speaks the REST dialect exposed by Supabase projects under `/rest/v1`:
//!
//! | operation | request                                                    |
//! |-----------|------------------------------------------------------------|
//! | select    | `GET /rest/v1/{table}?select=*&order=created_at.desc`      |
//! | insert    | `POST /rest/v1/{table}` + `Prefer: return=representation`  |
//! | update    | `PATCH /rest/v1/{table}?id=eq.{id}`                        |
//! | delete    | `DELETE /rest/v1/{table}?id=eq.{id}`                       |
//!
//! Every request carries the project's anon key as `apikey` and the session's
//! access token as a bearer token, so the row policies on the server decide
//! what the user can see.

use super::{check_status, ApiError, TaskBackend};
use crate::libs::config::BackendConfig;
use crate::libs::session::Session;
use crate::libs::task::{NewTaskRow, TaskId, TaskRow};
use reqwest::{Client, RequestBuilder};
use serde_json::json;

const REST_PATH: &str = "rest/v1";
const API_KEY_HEADER: &str = "apikey";
const PREFER_HEADER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";
const RETURN_MINIMAL: &str = "return=minimal";

#[derive(Debug, Clone)]
pub struct RestTaskBackend {
    client: Client,
    config: BackendConfig,
}

impl RestTaskBackend {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/{}/{}", self.config.api_url.trim_end_matches('/'), REST_PATH, self.config.table)
    }

    fn authorized(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        request
            .header(API_KEY_HEADER, &self.config.anon_key)
            .bearer_auth(&session.access_token)
    }

    fn id_filter(id: &TaskId) -> String {
        format!("eq.{}", id)
    }
}

impl TaskBackend for RestTaskBackend {
    async fn select_all(&self, session: &Session) -> Result<Vec<TaskRow>, ApiError> {
        let request = self
            .client
            .get(self.table_url())
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        let response = check_status(self.authorized(request, session).send().await?).await?;
        let rows = response.json::<Vec<TaskRow>>().await?;
        tracing::debug!(rows = rows.len(), table = %self.config.table, "selected task rows");
        Ok(rows)
    }

    async fn insert(&self, session: &Session, row: &NewTaskRow) -> Result<TaskRow, ApiError> {
        let request = self
            .client
            .post(self.table_url())
            .header(PREFER_HEADER, RETURN_REPRESENTATION)
            .json(row);
        let response = check_status(self.authorized(request, session).send().await?).await?;
        let mut rows = response.json::<Vec<TaskRow>>().await?;
        if rows.is_empty() {
            return Err(ApiError::EmptyResponse);
        }
        let created = rows.swap_remove(0);
        tracing::debug!(id = %created.id, "inserted task row");
        Ok(created)
    }

    async fn update_completed(&self, session: &Session, id: &TaskId, completed: bool) -> Result<(), ApiError> {
        let request = self
            .client
            .patch(self.table_url())
            .query(&[("id", Self::id_filter(id))])
            .header(PREFER_HEADER, RETURN_MINIMAL)
            .json(&json!({ "completed": completed }));
        check_status(self.authorized(request, session).send().await?).await?;
        tracing::debug!(%id, completed, "updated task row");
        Ok(())
    }

    async fn delete(&self, session: &Session, id: &TaskId) -> Result<(), ApiError> {
        let request = self.client.delete(self.table_url()).query(&[("id", Self::id_filter(id))]);
        check_status(self.authorized(request, session).send().await?).await?;
        tracing::debug!(%id, "deleted task row");
        Ok(())
    }
}
