//! Persisted snapshot format and its upgrade chain.
//!
//! Every schema version has its own type. Reading dispatches on the
//! `version` field and walks the explicit `v1 -> v2 -> v3` upgrades, so
//! nothing is coerced implicitly and each step can be tested on its own.
//!
//! - v1: messages are `{id, role, content, timestamp}` with epoch-millis timestamps.
//! - v2: messages gain optional `sql`, `data` and `visualization`.
//! - v3: messages gain optional `error` and RFC 3339 timestamps; the
//!   envelope gains `saved_at`.

use chrono::{DateTime, TimeZone, Utc};
use querychat_common::{MessageId, StorageError};
use serde::{Deserialize, Serialize};

use crate::message::{HistoryEntry, Message, Role, Visualization};

pub const CURRENT_VERSION: u32 = 3;

// =============================================================================
// Current schema
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotState {
    pub history: Vec<HistoryEntry>,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    pub version: u32,
    pub state: SnapshotState,
    pub saved_at: DateTime<Utc>,
}

impl PersistedSnapshot {
    pub fn new(state: SnapshotState, saved_at: DateTime<Utc>) -> Self {
        Self {
            version: CURRENT_VERSION,
            state,
            saved_at,
        }
    }
}

// =============================================================================
// Legacy schemas
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageV1 {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotStateV1 {
    pub history: Vec<HistoryEntry>,
    pub messages: Vec<MessageV1>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotV1 {
    pub version: u32,
    pub state: SnapshotStateV1,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageV2 {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: i64,
    #[serde(default)]
    pub sql: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub visualization: Option<Visualization>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotStateV2 {
    pub history: Vec<HistoryEntry>,
    pub messages: Vec<MessageV2>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotV2 {
    pub version: u32,
    pub state: SnapshotStateV2,
}

// =============================================================================
// Upgrades
// =============================================================================

/// v1 -> v2: result fields default to absent.
pub fn upgrade_v1(snapshot: SnapshotV1) -> SnapshotV2 {
    let messages = snapshot
        .state
        .messages
        .into_iter()
        .map(|m| MessageV2 {
            id: m.id,
            role: m.role,
            content: m.content,
            timestamp: m.timestamp,
            sql: None,
            data: None,
            visualization: None,
        })
        .collect();

    SnapshotV2 {
        version: 2,
        state: SnapshotStateV2 {
            history: snapshot.state.history,
            messages,
        },
    }
}

/// v2 -> v3: `error` defaults to absent, millis become UTC datetimes, and
/// `saved_at` defaults to the epoch since v2 never recorded it.
pub fn upgrade_v2(snapshot: SnapshotV2) -> PersistedSnapshot {
    let messages = snapshot
        .state
        .messages
        .into_iter()
        .map(|m| Message {
            id: MessageId::from(m.id),
            role: m.role,
            content: m.content,
            timestamp: Utc
                .timestamp_millis_opt(m.timestamp)
                .single()
                .unwrap_or_default(),
            sql: m.sql,
            data: m.data,
            visualization: m.visualization,
            error: None,
        })
        .collect();

    PersistedSnapshot {
        version: CURRENT_VERSION,
        state: SnapshotState {
            history: snapshot.state.history,
            messages,
        },
        saved_at: DateTime::<Utc>::default(),
    }
}

// =============================================================================
// Encoding
// =============================================================================

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

pub fn encode(snapshot: &PersistedSnapshot) -> Result<String, StorageError> {
    serde_json::to_string(snapshot).map_err(|e| StorageError::Encode(e.to_string()))
}

/// Decode any known version and bring it up to [`CURRENT_VERSION`].
pub fn decode(raw: &str) -> Result<PersistedSnapshot, StorageError> {
    let probe: VersionProbe = parse(raw)?;
    match probe.version {
        1 => Ok(upgrade_v2(upgrade_v1(parse(raw)?))),
        2 => Ok(upgrade_v2(parse(raw)?)),
        CURRENT_VERSION => parse(raw),
        other => Err(StorageError::UnsupportedVersion(other)),
    }
}

fn parse<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, StorageError> {
    serde_json::from_str(raw).map_err(|e| StorageError::Decode(e.to_string()))
}
