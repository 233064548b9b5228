//! Conversation message types shared by the session, transport and store.

use std::fmt;

use chrono::{DateTime, Utc};
use querychat_common::MessageId;
use serde::{Deserialize, Serialize};

use crate::validator::QueryResponse;

/// Content of the assistant message for a successful query.
pub const SUCCESS_CONTENT: &str = "Consulta ejecutada correctamente";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// How the frontend should render a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visualization {
    Bar,
    Line,
    Table,
}

impl Visualization {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "bar" => Some(Self::Bar),
            "line" => Some(Self::Line),
            "table" => Some(Self::Table),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Table => "table",
        }
    }
}

impl fmt::Display for Visualization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `(role, content)` projection sent to the backend as conversation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

impl From<&Message> for HistoryEntry {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// One entry of the displayed conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visualization: Option<Visualization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: MessageId::new(),
            role: Role::User,
            content: content.into(),
            timestamp,
            sql: None,
            data: None,
            visualization: None,
            error: None,
        }
    }

    /// Assistant reply for a validated payload.
    ///
    /// A payload carrying a backend `error` becomes an error message but
    /// keeps whatever `sql`/`data`/`visualization` came with it.
    pub fn assistant(response: QueryResponse, timestamp: DateTime<Utc>) -> Self {
        let content = match &response.error {
            Some(error) => format!("Error: {error}"),
            None => SUCCESS_CONTENT.to_string(),
        };
        Self {
            id: MessageId::new(),
            role: Role::Assistant,
            content,
            timestamp,
            sql: response.sql,
            data: response.data,
            visualization: response.visualization,
            error: response.error,
        }
    }

    /// Assistant reply for a submission that never produced a usable payload.
    pub fn assistant_error(error: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        let error = error.into();
        Self {
            id: MessageId::new(),
            role: Role::Assistant,
            content: format!("Error: {error}"),
            timestamp,
            sql: None,
            data: None,
            visualization: None,
            error: Some(error),
        }
    }
}
