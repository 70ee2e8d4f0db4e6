//! Permission bitflags for program access control
//!
//! Defines the closed catalog of 20 permissions stored as a 64-bit integer
//! bitfield. Bit positions are part of the client contract and must never be
//! renumbered.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::DomainError;

bitflags! {
    /// Program permission flags
    ///
    /// Stored as BIGINT in database, serialized as string in JSON for JavaScript safety.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u64 {
        /// Bypass all permission checks and channel overrides
        const ADMINISTRATOR        = 1 << 0;
        /// Edit program settings
        const MANAGE_PROGRAM       = 1 << 1;
        /// Create, edit, delete, assign roles
        const MANAGE_ROLES         = 1 << 2;
        /// Create, edit, delete channels and their overrides
        const MANAGE_CHANNELS      = 1 << 3;
        /// Kick members from program
        const KICK_MEMBERS         = 1 << 4;
        /// Ban members from program
        const BAN_MEMBERS          = 1 << 5;
        /// Create invite links
        const CREATE_INVITE        = 1 << 6;
        /// Change other members' nicknames
        const MANAGE_NICKNAMES     = 1 << 7;
        /// See channels and read messages
        const VIEW_CHANNELS        = 1 << 8;
        /// Send messages in text channels
        const SEND_MESSAGES        = 1 << 9;
        /// Delete or pin other users' messages
        const MANAGE_MESSAGES      = 1 << 10;
        /// Links posted get embedded previews
        const EMBED_LINKS          = 1 << 11;
        /// Upload files and images
        const ATTACH_FILES         = 1 << 12;
        /// Add emoji reactions
        const ADD_REACTIONS        = 1 << 13;
        /// Use @everyone and @here mentions
        const MENTION_EVERYONE     = 1 << 14;
        /// Read messages sent before joining the channel
        const READ_MESSAGE_HISTORY = 1 << 15;
        /// Join voice channels
        const CONNECT              = 1 << 16;
        /// Speak in voice channels
        const SPEAK                = 1 << 17;
        /// Mute other members in voice channels
        const MUTE_MEMBERS         = 1 << 18;
        /// Read the program audit log
        const VIEW_AUDIT_LOG       = 1 << 19;
    }
}

impl Permissions {
    /// Every permission in the catalog (for owners and super admins)
    pub const ALL: Self = Self::all();

    /// Default permissions for the @everyone role
    pub const DEFAULT: Self = Self::VIEW_CHANNELS
        .union(Self::SEND_MESSAGES)
        .union(Self::EMBED_LINKS)
        .union(Self::ATTACH_FILES)
        .union(Self::ADD_REACTIONS)
        .union(Self::READ_MESSAGE_HISTORY)
        .union(Self::CONNECT)
        .union(Self::SPEAK);

    /// Check if the permission set contains a required permission
    ///
    /// Administrators bypass all permission checks.
    #[inline]
    pub fn has(&self, permission: Permissions) -> bool {
        self.has_all(permission)
    }

    /// Check if the permission set has any of the given permissions
    #[inline]
    pub fn has_any(&self, permissions: Permissions) -> bool {
        if self.is_administrator() {
            return true;
        }
        self.intersects(permissions)
    }

    /// Check if the permission set has all of the given permissions
    #[inline]
    pub fn has_all(&self, permissions: Permissions) -> bool {
        if self.is_administrator() {
            return true;
        }
        self.contains(permissions)
    }

    /// Check whether the ADMINISTRATOR bit is set
    #[inline]
    pub fn is_administrator(&self) -> bool {
        self.contains(Permissions::ADMINISTRATOR)
    }

    /// Combine permissions from multiple roles
    pub fn combine<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Permissions>,
    {
        roles.into_iter().fold(Permissions::empty(), |acc, p| acc | p)
    }

    /// Get the raw bits as i64 (for database storage)
    #[inline]
    pub fn to_i64(self) -> i64 {
        self.bits() as i64
    }

    /// Create from raw i64 bits (from database)
    ///
    /// Bits outside the catalog are dropped.
    #[inline]
    pub fn from_i64(bits: i64) -> Self {
        Permissions::from_bits_truncate(bits as u64)
    }

    /// Parse a caller-supplied decimal bitfield
    ///
    /// Unlike values read back from storage, caller input must only use
    /// catalog bits.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let bits = s
            .trim()
            .parse::<u64>()
            .map_err(|_| DomainError::UnknownPermission(s.to_string()))?;
        Self::from_bits_exact(bits)
    }

    /// Build a permission set from raw bits, rejecting bits outside the catalog
    pub fn from_bits_exact(bits: u64) -> Result<Self, DomainError> {
        Permissions::from_bits(bits).ok_or_else(|| {
            let unknown = bits & !Permissions::ALL.bits();
            DomainError::UnknownPermission(format!("bits {unknown:#x}"))
        })
    }

    /// Build a permission set from permission names
    ///
    /// Names are matched exactly (`"SEND_MESSAGES"`). Unknown names fail.
    pub fn from_names<I, S>(names: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().try_fold(Permissions::empty(), |acc, name| {
            let name = name.as_ref();
            Permissions::from_name(name)
                .map(|p| acc | p)
                .ok_or_else(|| DomainError::UnknownPermission(name.to_string()))
        })
    }

    /// Get the names of all individual permissions that are set, in bit order
    pub fn to_names(&self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }

    /// Check if this permission set is a subset of another
    #[inline]
    pub fn is_subset_of(&self, other: Permissions) -> bool {
        (*self & other) == *self
    }

    /// Bits of this set that fall outside `ceiling`
    #[inline]
    pub fn excess_over(&self, ceiling: Permissions) -> Permissions {
        *self - ceiling
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Permissions::empty()
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

// Serialize as string for JSON (JavaScript BigInt safety)
impl Serialize for Permissions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.bits().to_string())
    }
}

// Deserialize from string or number; bits outside the catalog are an error
impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct PermissionsVisitor;

        impl Visitor<'_> for PermissionsVisitor {
            type Value = Permissions;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer representing permission bits")
            }

            fn visit_i64<E>(self, value: i64) -> Result<Permissions, E>
            where
                E: de::Error,
            {
                let bits = u64::try_from(value)
                    .map_err(|_| de::Error::custom("permissions must not be negative"))?;
                self.visit_u64(bits)
            }

            fn visit_u64<E>(self, value: u64) -> Result<Permissions, E>
            where
                E: de::Error,
            {
                Permissions::from_bits_exact(value).map_err(de::Error::custom)
            }

            fn visit_str<E>(self, value: &str) -> Result<Permissions, E>
            where
                E: de::Error,
            {
                Permissions::parse(value).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(PermissionsVisitor)
    }
}

impl From<Permissions> for i64 {
    fn from(perms: Permissions) -> Self {
        perms.bits() as i64
    }
}

impl From<Permissions> for u64 {
    fn from(perms: Permissions) -> Self {
        perms.bits()
    }
}
