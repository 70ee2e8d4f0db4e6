//! Authority tiers
//!
//! Four ordered tiers bound which permissions a role may carry and which
//! roles an actor may create, edit, delete, or assign. Lower numeric value
//! means more authority.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

use super::Permissions;

/// Role authority tier
///
/// The derived ordering follows declaration order, so `Owner < Admin <
/// Moderator < Member` and `min()` picks the most authoritative tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "i16", into = "i16")]
#[repr(u8)]
pub enum Tier {
    Owner = 0,
    Admin = 1,
    Moderator = 2,
    #[default]
    Member = 3,
}

impl Tier {
    /// All tiers, most authoritative first
    pub const ALL: [Tier; 4] = [Tier::Owner, Tier::Admin, Tier::Moderator, Tier::Member];

    /// Numeric value as stored in the database
    #[inline]
    pub const fn as_i16(self) -> i16 {
        self as i16
    }

    /// Maximum permission set a role of this tier may carry
    #[inline]
    pub fn ceiling(self) -> Permissions {
        TierTable::entry(self).ceiling
    }

    /// Whether an actor of this tier may manage roles of `target` tier
    #[inline]
    pub fn can_manage(self, target: Tier) -> bool {
        TierTable::entry(self).manages.contains(target)
    }

    /// Tiers this tier may manage, most authoritative first
    pub fn manageable(self) -> Vec<Tier> {
        Tier::ALL
            .into_iter()
            .filter(|t| self.can_manage(*t))
            .collect()
    }

    /// Check that `permissions` fit under this tier's ceiling
    pub fn check_ceiling(self, permissions: Permissions) -> Result<(), DomainError> {
        let excess = permissions.excess_over(self.ceiling());
        if excess.is_empty() {
            Ok(())
        } else {
            Err(DomainError::PermissionExceedsTier { tier: self, excess })
        }
    }

    /// Human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            Tier::Owner => "Owner",
            Tier::Admin => "Admin",
            Tier::Moderator => "Moderator",
            Tier::Member => "Member",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i16> for Tier {
    type Error = DomainError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Tier::Owner),
            1 => Ok(Tier::Admin),
            2 => Ok(Tier::Moderator),
            3 => Ok(Tier::Member),
            other => Err(DomainError::InvalidTier(other)),
        }
    }
}

impl From<Tier> for i16 {
    fn from(tier: Tier) -> Self {
        tier.as_i16()
    }
}

/// Compact set of tiers, one bit per tier value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TierSet(u8);

impl TierSet {
    pub const EMPTY: Self = Self(0);

    /// Build a set from a list of tiers
    pub const fn of(tiers: &[Tier]) -> Self {
        let mut bits = 0u8;
        let mut i = 0;
        while i < tiers.len() {
            bits |= 1 << tiers[i] as u8;
            i += 1;
        }
        Self(bits)
    }

    #[inline]
    pub const fn contains(self, tier: Tier) -> bool {
        self.0 & (1 << tier as u8) != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Row of the tier table
#[derive(Debug, Clone, Copy)]
pub struct TierEntry {
    pub tier: Tier,
    pub ceiling: Permissions,
    pub manages: TierSet,
}

const MEMBER_CEILING: Permissions = Permissions::CREATE_INVITE
    .union(Permissions::VIEW_CHANNELS)
    .union(Permissions::SEND_MESSAGES)
    .union(Permissions::EMBED_LINKS)
    .union(Permissions::ATTACH_FILES)
    .union(Permissions::ADD_REACTIONS)
    .union(Permissions::READ_MESSAGE_HISTORY)
    .union(Permissions::CONNECT)
    .union(Permissions::SPEAK);

const MODERATOR_CEILING: Permissions = MEMBER_CEILING
    .union(Permissions::MANAGE_ROLES)
    .union(Permissions::KICK_MEMBERS)
    .union(Permissions::MANAGE_NICKNAMES)
    .union(Permissions::MANAGE_MESSAGES)
    .union(Permissions::MENTION_EVERYONE)
    .union(Permissions::MUTE_MEMBERS)
    .union(Permissions::VIEW_AUDIT_LOG);

const ADMIN_CEILING: Permissions = Permissions::ALL.difference(Permissions::ADMINISTRATOR);

/// Static tier table, indexed by tier value
const TABLE: [TierEntry; 4] = [
    TierEntry {
        tier: Tier::Owner,
        ceiling: Permissions::ALL,
        manages: TierSet::of(&[Tier::Owner, Tier::Admin, Tier::Moderator, Tier::Member]),
    },
    TierEntry {
        tier: Tier::Admin,
        ceiling: ADMIN_CEILING,
        manages: TierSet::of(&[Tier::Moderator, Tier::Member]),
    },
    TierEntry {
        tier: Tier::Moderator,
        ceiling: MODERATOR_CEILING,
        manages: TierSet::of(&[Tier::Member]),
    },
    TierEntry {
        tier: Tier::Member,
        ceiling: MEMBER_CEILING,
        manages: TierSet::EMPTY,
    },
];

/// Precomputed tier ceilings and management relation
pub struct TierTable;

impl TierTable {
    /// Look up the table row for a tier
    #[inline]
    pub fn entry(tier: Tier) -> &'static TierEntry {
        &TABLE[tier as usize]
    }

    /// Iterate all rows, most authoritative first
    pub fn entries() -> impl Iterator<Item = &'static TierEntry> {
        TABLE.iter()
    }
}
