use crate::api::ApiError;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Server-assigned task identifier. Opaque to the client.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        TaskId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A task as the local store keeps it.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Row of the tasks relation exactly as the REST endpoint returns it.
#[derive(Deserialize, Debug, Clone)]
pub struct TaskRow {
    #[serde(deserialize_with = "deserialize_row_id")]
    pub id: String,
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub created_at: Option<String>,
}

/// Body of an insert. `id` and `created_at` are left to the server.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewTaskRow {
    pub user_id: String,
    pub text: String,
    pub completed: bool,
}

impl NewTaskRow {
    pub fn new(user_id: &str, text: &str) -> Self {
        NewTaskRow {
            user_id: user_id.to_string(),
            text: text.to_string(),
            completed: false,
        }
    }
}

// Ids arrive as uuid strings or as bigint identities depending on the schema.
fn deserialize_row_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

/// Parses a `timestamptz` as PostgREST renders it.
///
/// RFC 3339 is the normal form; a bare timestamp without offset is read as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

impl TryFrom<TaskRow> for Task {
    type Error = ApiError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        if row.id.trim().is_empty() {
            return Err(ApiError::InvalidRow("row without id".to_string()));
        }
        let text = match row.text {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(ApiError::InvalidRow(format!("row {} has no text", row.id))),
        };
        let completed = row
            .completed
            .ok_or_else(|| ApiError::InvalidRow(format!("row {} has no completed flag", row.id)))?;
        let created_at = row
            .created_at
            .as_deref()
            .and_then(parse_timestamp)
            .ok_or_else(|| ApiError::InvalidRow(format!("row {} has an invalid created_at", row.id)))?;

        Ok(Task {
            id: TaskId(row.id),
            text,
            completed,
            created_at,
        })
    }
}
