//! Value objects - immutable types that represent domain concepts

mod permissions;
mod snowflake;
mod tier;

pub use permissions::Permissions;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
pub use tier::{Tier, TierEntry, TierSet, TierTable};
