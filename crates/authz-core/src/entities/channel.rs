//! Channel entity - a text or voice channel, or a category grouping channels

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Channel kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ChannelKind {
    #[default]
    Text = 0,
    Voice = 2,
    /// Groups channels; overrides set here apply to every child channel
    Category = 4,
}

impl ChannelKind {
    #[inline]
    #[must_use]
    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

impl From<i16> for ChannelKind {
    fn from(value: i16) -> Self {
        match value {
            2 => Self::Voice,
            4 => Self::Category,
            _ => Self::Text,
        }
    }
}

/// Channel entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: Snowflake,
    pub program_id: Snowflake,
    pub name: String,
    pub kind: ChannelKind,
    /// Parent category, if any (never set on categories themselves)
    pub category_id: Option<Snowflake>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Channel {
    fn with_kind(id: Snowflake, program_id: Snowflake, name: String, kind: ChannelKind) -> Self {
        let now = Utc::now();
        Self {
            id,
            program_id,
            name,
            kind,
            category_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn new_text(id: Snowflake, program_id: Snowflake, name: String) -> Self {
        Self::with_kind(id, program_id, name, ChannelKind::Text)
    }

    #[must_use]
    pub fn new_voice(id: Snowflake, program_id: Snowflake, name: String) -> Self {
        Self::with_kind(id, program_id, name, ChannelKind::Voice)
    }

    #[must_use]
    pub fn new_category(id: Snowflake, program_id: Snowflake, name: String) -> Self {
        Self::with_kind(id, program_id, name, ChannelKind::Category)
    }

    /// Place this channel under a category
    #[must_use]
    pub fn in_category(mut self, category_id: Snowflake) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[inline]
    #[must_use]
    pub fn is_category(&self) -> bool {
        matches!(self.kind, ChannelKind::Category)
    }
}
