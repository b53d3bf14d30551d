use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// --- Core Schemas (Mapped to Database) ---

/// LocalAccount
///
/// A local (username/password) account as stored in the `local_account` table.
///
/// Owned exclusively by the account store; everything else refers to it by `id`.
/// `username` is always stored lower-cased and trimmed, and `password_hash` is never
/// clear text.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct LocalAccount {
    // Primary Key, assigned once at creation.
    pub id: Uuid,
    pub username: String,

    // Never serialized outward: the hash leaves the process only through the store.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub created_at_utc: DateTime<Utc>,

    // Both absent until the first successful login.
    pub last_login_ip: Option<String>,
    pub last_login_at_utc: Option<DateTime<Utc>>,
}

impl LocalAccount {
    /// Builds a freshly created account. The caller supplies already-normalized values.
    pub fn new(id: Uuid, username: String, password_hash: String) -> Self {
        Self {
            id,
            username,
            password_hash,
            created_at_utc: Utc::now(),
            last_login_ip: None,
            last_login_at_utc: None,
        }
    }
}

// --- Audit Vocabulary ---

/// EventType
///
/// Coarse category of an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    General,
    Content,
    Settings,
    Authentication,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::General => "general",
            EventType::Content => "content",
            EventType::Settings => "settings",
            EventType::Authentication => "authentication",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// EventId
///
/// Specific audit event. The numeric codes are part of the audit log's external
/// format and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventId {
    SettingsAccountCreated,
    MenuCreated,
    MenuUpdated,
}

impl EventId {
    pub fn code(&self) -> i32 {
        match self {
            EventId::SettingsAccountCreated => 1001,
            EventId::MenuCreated => 2101,
            EventId::MenuUpdated => 2102,
        }
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventId::SettingsAccountCreated => "settings_account_created",
            EventId::MenuCreated => "menu_created",
            EventId::MenuUpdated => "menu_updated",
        };
        write!(f, "{}({})", name, self.code())
    }
}

/// AuditEntry
///
/// One appended audit record, as kept by `MemoryAuditSink`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditEntry {
    pub event_type: EventType,
    pub event_id: EventId,
    pub message: String,
    pub recorded_at: DateTime<Utc>,
}
