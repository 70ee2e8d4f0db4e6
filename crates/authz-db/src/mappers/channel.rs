//! Channel entity <-> model mapper

use authz_core::entities::{Channel, ChannelKind};
use authz_core::value_objects::Snowflake;

use crate::models::ChannelModel;

/// Convert ChannelModel to Channel entity
impl From<ChannelModel> for Channel {
    fn from(model: ChannelModel) -> Self {
        Channel {
            id: Snowflake::new(model.id),
            program_id: Snowflake::new(model.program_id),
            name: model.name,
            kind: ChannelKind::from(model.kind),
            category_id: model.category_id.map(Snowflake::new),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
