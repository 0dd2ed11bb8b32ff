use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Content shown by the transient placeholder while a reply is on its way
pub const PENDING_CONTENT: &str = "...";

/// Prefix that marks a client-generated id on the wire
const LOCAL_PREFIX: &str = "local-";

/// Identity of a message.
///
/// Server-assigned ids and client-generated transient ids live in separate
/// namespaces, so a local id can never collide with a persisted one. Any id
/// the server sends is a server id, whatever its shape; local ids only come
/// back from the wire in their `local-` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageId {
    /// Numeric id assigned by the backend
    Server(i64),
    /// Non-numeric id assigned by the backend (UUIDs, slugs)
    ServerKey(String),
    /// Id generated on the client for optimistic messages
    Local(Uuid),
}

impl MessageId {
    /// Generate a fresh client-side id
    pub fn local() -> Self {
        MessageId::Local(Uuid::new_v4())
    }

    pub fn is_local(&self) -> bool {
        matches!(self, MessageId::Local(_))
    }

    /// Interpret an id received as a string.
    ///
    /// Integers become `Server`, `local-<uuid>` becomes `Local`, everything
    /// else is kept verbatim as `ServerKey`.
    pub fn parse(id: &str) -> Self {
        if let Some(uuid) = id
            .strip_prefix(LOCAL_PREFIX)
            .and_then(|rest| Uuid::parse_str(rest).ok())
        {
            return MessageId::Local(uuid);
        }
        match id.parse::<i64>() {
            Ok(n) => MessageId::Server(n),
            Err(_) => MessageId::ServerKey(id.to_string()),
        }
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageId::Server(id) => write!(f, "{}", id),
            MessageId::ServerKey(id) => f.write_str(id),
            MessageId::Local(id) => write!(f, "{}{}", LOCAL_PREFIX, id.simple()),
        }
    }
}

impl From<i64> for MessageId {
    fn from(id: i64) -> Self {
        MessageId::Server(id)
    }
}

impl Serialize for MessageId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            MessageId::Server(id) => serializer.serialize_i64(*id),
            MessageId::ServerKey(id) => serializer.serialize_str(id),
            MessageId::Local(_) => serializer.collect_str(self),
        }
    }
}

impl<'de> Deserialize<'de> for MessageId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IdVisitor;

        impl<'de> Visitor<'de> for IdVisitor {
            type Value = MessageId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer message id")
            }

            fn visit_str<E>(self, value: &str) -> Result<MessageId, E>
            where
                E: de::Error,
            {
                Ok(MessageId::parse(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<MessageId, E>
            where
                E: de::Error,
            {
                Ok(MessageId::Server(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<MessageId, E>
            where
                E: de::Error,
            {
                Ok(i64::try_from(value)
                    .map(MessageId::Server)
                    .unwrap_or_else(|_| MessageId::ServerKey(value.to_string())))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    #[serde(alias = "human")]
    User,
    #[serde(alias = "assistant")]
    Ai,
    /// Placeholder shown between sending and the first reply byte
    Pending,
}

/// A single chat message.
///
/// Messages are replaced wholesale in the store, never merged field by field,
/// so every update must carry the complete message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message identity. Server payloads without an id get a local one.
    #[serde(default = "MessageId::local")]
    pub id: MessageId,
    pub role: MessageRole,
    #[serde(default)]
    pub content: String,
    /// Whether tokens are still being appended to this message
    #[serde(default)]
    pub is_streaming: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Message {
    /// A user-authored message with a fresh local id
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: MessageId::local(),
            role: MessageRole::User,
            content: content.into(),
            is_streaming: false,
            timestamp: Some(Utc::now()),
        }
    }

    /// The transient "..." placeholder
    pub fn pending(id: MessageId) -> Self {
        Self {
            id,
            role: MessageRole::Pending,
            content: PENDING_CONTENT.to_string(),
            is_streaming: false,
            timestamp: None,
        }
    }

    /// An empty AI message that streamed tokens will fill in
    pub fn streaming_shell(id: MessageId) -> Self {
        Self {
            id,
            role: MessageRole::Ai,
            content: String::new(),
            is_streaming: true,
            timestamp: Some(Utc::now()),
        }
    }

    /// Copy of this message with new content, streaming flag untouched
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..self.clone()
        }
    }

    /// Copy of this message with final content and streaming closed
    pub fn finalized(&self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_streaming: false,
            ..self.clone()
        }
    }

    pub fn is_pending(&self) -> bool {
        self.role == MessageRole::Pending
    }
}
