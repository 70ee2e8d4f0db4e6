//! Authorization policy
//!
//! Pure functions over already-loaded records. Nothing here touches storage.

mod authority;
mod guard;
mod overrides;

pub use authority::{Authority, AuthoritySource};
pub use guard::{RoleChanges, RoleDraft, RoleMutationGuard};
pub use overrides::{ChannelOverrides, OverrideGuard, OverrideLayer, OverrideResolver};

use crate::error::DomainError;
use crate::value_objects::Permissions;

/// Parse a list of permission names into a set
///
/// Names are matched exactly against the catalog. The first unknown name
/// fails the whole list with `UnknownPermission`.
pub fn validate_permission_names<I, S>(names: I) -> Result<Permissions, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Permissions::from_names(names)
}
