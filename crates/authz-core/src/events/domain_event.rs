//! Domain events - emitted after authorization state changes
//!
//! These events are used for:
//! - Invalidating cached authorities
//! - Audit logging

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{OverrideScope, OverrideTarget};
use crate::value_objects::Snowflake;

/// All possible domain events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    // =========================================================================
    // Program Events
    // =========================================================================
    ProgramCreated(ProgramEvent),
    ProgramDeleted(ProgramEvent),

    // =========================================================================
    // Member Events
    // =========================================================================
    MemberJoined(MemberEvent),
    MemberLeft(MemberEvent),

    // =========================================================================
    // Role Events
    // =========================================================================
    RoleCreated(RoleEvent),
    RoleUpdated(RoleEvent),
    RoleDeleted(RoleEvent),
    RoleAssigned(RoleAssignmentEvent),
    RoleUnassigned(RoleAssignmentEvent),

    // =========================================================================
    // Override Events
    // =========================================================================
    OverrideSet(OverrideEvent),
    OverrideDeleted(OverrideEvent),
}

/// Which cached authorities an event makes stale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    /// Nothing cached depends on this change
    None,
    /// One user's authority in one program
    Member {
        program_id: Snowflake,
        user_id: Snowflake,
    },
    /// Every authority in the program
    Program(Snowflake),
}

impl DomainEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ProgramCreated(_) => "PROGRAM_CREATED",
            Self::ProgramDeleted(_) => "PROGRAM_DELETED",
            Self::MemberJoined(_) => "MEMBER_JOINED",
            Self::MemberLeft(_) => "MEMBER_LEFT",
            Self::RoleCreated(_) => "ROLE_CREATED",
            Self::RoleUpdated(_) => "ROLE_UPDATED",
            Self::RoleDeleted(_) => "ROLE_DELETED",
            Self::RoleAssigned(_) => "ROLE_ASSIGNED",
            Self::RoleUnassigned(_) => "ROLE_UNASSIGNED",
            Self::OverrideSet(_) => "OVERRIDE_SET",
            Self::OverrideDeleted(_) => "OVERRIDE_DELETED",
        }
    }

    /// Program the event belongs to
    pub fn program_id(&self) -> Snowflake {
        match self {
            Self::ProgramCreated(e) | Self::ProgramDeleted(e) => e.program_id,
            Self::MemberJoined(e) | Self::MemberLeft(e) => e.program_id,
            Self::RoleCreated(e) | Self::RoleUpdated(e) | Self::RoleDeleted(e) => e.program_id,
            Self::RoleAssigned(e) | Self::RoleUnassigned(e) => e.program_id,
            Self::OverrideSet(e) | Self::OverrideDeleted(e) => e.program_id,
        }
    }

    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::ProgramCreated(e) | Self::ProgramDeleted(e) => e.timestamp,
            Self::MemberJoined(e) | Self::MemberLeft(e) => e.timestamp,
            Self::RoleCreated(e) | Self::RoleUpdated(e) | Self::RoleDeleted(e) => e.timestamp,
            Self::RoleAssigned(e) | Self::RoleUnassigned(e) => e.timestamp,
            Self::OverrideSet(e) | Self::OverrideDeleted(e) => e.timestamp,
        }
    }

    /// Cached authorities made stale by this event
    ///
    /// Overrides are read per request and never feed the authority cache.
    pub fn invalidation(&self) -> Invalidation {
        match self {
            Self::MemberJoined(e) | Self::MemberLeft(e) => Invalidation::Member {
                program_id: e.program_id,
                user_id: e.user_id,
            },
            Self::RoleAssigned(e) | Self::RoleUnassigned(e) => Invalidation::Member {
                program_id: e.program_id,
                user_id: e.user_id,
            },
            Self::ProgramDeleted(e) => Invalidation::Program(e.program_id),
            Self::RoleUpdated(e) | Self::RoleDeleted(e) => Invalidation::Program(e.program_id),
            Self::ProgramCreated(_)
            | Self::RoleCreated(_)
            | Self::OverrideSet(_)
            | Self::OverrideDeleted(_) => Invalidation::None,
        }
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn program_created(program_id: Snowflake, owner_id: Snowflake) -> Self {
        Self::ProgramCreated(ProgramEvent::new(program_id, owner_id))
    }

    pub fn program_deleted(program_id: Snowflake, actor_id: Snowflake) -> Self {
        Self::ProgramDeleted(ProgramEvent::new(program_id, actor_id))
    }

    pub fn member_joined(program_id: Snowflake, user_id: Snowflake) -> Self {
        Self::MemberJoined(MemberEvent::new(program_id, user_id))
    }

    pub fn member_left(program_id: Snowflake, user_id: Snowflake) -> Self {
        Self::MemberLeft(MemberEvent::new(program_id, user_id))
    }

    pub fn role_created(program_id: Snowflake, role_id: Snowflake, actor_id: Snowflake) -> Self {
        Self::RoleCreated(RoleEvent::new(program_id, role_id, actor_id))
    }

    pub fn role_updated(program_id: Snowflake, role_id: Snowflake, actor_id: Snowflake) -> Self {
        Self::RoleUpdated(RoleEvent::new(program_id, role_id, actor_id))
    }

    pub fn role_deleted(program_id: Snowflake, role_id: Snowflake, actor_id: Snowflake) -> Self {
        Self::RoleDeleted(RoleEvent::new(program_id, role_id, actor_id))
    }

    pub fn role_assigned(
        program_id: Snowflake,
        role_id: Snowflake,
        user_id: Snowflake,
        actor_id: Snowflake,
    ) -> Self {
        Self::RoleAssigned(RoleAssignmentEvent::new(program_id, role_id, user_id, actor_id))
    }

    pub fn role_unassigned(
        program_id: Snowflake,
        role_id: Snowflake,
        user_id: Snowflake,
        actor_id: Snowflake,
    ) -> Self {
        Self::RoleUnassigned(RoleAssignmentEvent::new(program_id, role_id, user_id, actor_id))
    }

    pub fn override_set(
        program_id: Snowflake,
        scope: OverrideScope,
        target: OverrideTarget,
        actor_id: Snowflake,
    ) -> Self {
        Self::OverrideSet(OverrideEvent::new(program_id, scope, target, actor_id))
    }

    pub fn override_deleted(
        program_id: Snowflake,
        scope: OverrideScope,
        target: OverrideTarget,
        actor_id: Snowflake,
    ) -> Self {
        Self::OverrideDeleted(OverrideEvent::new(program_id, scope, target, actor_id))
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramEvent {
    pub program_id: Snowflake,
    pub actor_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

impl ProgramEvent {
    fn new(program_id: Snowflake, actor_id: Snowflake) -> Self {
        Self {
            program_id,
            actor_id,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberEvent {
    pub program_id: Snowflake,
    pub user_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

impl MemberEvent {
    fn new(program_id: Snowflake, user_id: Snowflake) -> Self {
        Self {
            program_id,
            user_id,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEvent {
    pub program_id: Snowflake,
    pub role_id: Snowflake,
    pub actor_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

impl RoleEvent {
    fn new(program_id: Snowflake, role_id: Snowflake, actor_id: Snowflake) -> Self {
        Self {
            program_id,
            role_id,
            actor_id,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignmentEvent {
    pub program_id: Snowflake,
    pub role_id: Snowflake,
    pub user_id: Snowflake,
    pub actor_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

impl RoleAssignmentEvent {
    fn new(program_id: Snowflake, role_id: Snowflake, user_id: Snowflake, actor_id: Snowflake) -> Self {
        Self {
            program_id,
            role_id,
            user_id,
            actor_id,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideEvent {
    pub program_id: Snowflake,
    pub scope: OverrideScope,
    pub target: OverrideTarget,
    pub actor_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

impl OverrideEvent {
    fn new(
        program_id: Snowflake,
        scope: OverrideScope,
        target: OverrideTarget,
        actor_id: Snowflake,
    ) -> Self {
        Self {
            program_id,
            scope,
            target,
            actor_id,
            timestamp: Utc::now(),
        }
    }
}
