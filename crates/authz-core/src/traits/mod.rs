//! Repository traits (ports)

mod repositories;

pub use repositories::{
    ChannelRepository, MembershipRepository, OverrideRepository, ProgramRepository, RepoResult,
    RoleRepository, UserRepository,
};
