//! Entity creation with collision recovery

use crate::wikibase::{EntityClient, EntityData, EntityId, EntityKind, WikibaseError};

/// Create an entity, taking over a colliding one if the wiki reports a clash
///
/// A label/description collision names the existing entity. That entity is
/// cleared and the creation is retried once against its identifier. A second
/// collision is returned as [`WikibaseError::RepeatedCollision`].
pub async fn create_or_recreate(
    client: &mut dyn EntityClient,
    kind: EntityKind,
    data: &EntityData,
) -> Result<EntityId, WikibaseError> {
    let (id, info) = match client.create_entity(kind, data, None).await {
        Err(WikibaseError::Collision { id, info, .. }) => (id, info),
        other => return other,
    };

    tracing::warn!(
        kind = %kind,
        id = %id,
        label = data.display_label().unwrap_or_default(),
        info = %info,
        "Entity collides with an existing one, clearing and recreating it"
    );

    client.clear_entity(&id).await?;

    match client.create_entity(kind, data, Some(&id)).await {
        Err(WikibaseError::Collision { kind, id, info }) => {
            Err(WikibaseError::RepeatedCollision { kind, id, info })
        }
        other => other,
    }
}
