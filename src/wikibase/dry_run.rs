//! Offline stand-in for [`WikibaseSession`](super::WikibaseSession)
//!
//! Hands out fresh identifiers without touching the network, so a migration can be
//! rehearsed end to end (classification, labels, claim typing) before it is run
//! against a real wiki.

use async_trait::async_trait;

use super::error::WikibaseError;
use super::model::{ClaimMap, EntityData, EntityId, EntityKind};
use super::EntityClient;

/// Dry-run client
#[derive(Debug)]
pub struct DryRunSession {
    next_item: u64,
    next_property: u64,
    created: usize,
    claims: usize,
}

impl DryRunSession {
    /// Identifiers start at `first_id` for both items and properties
    pub fn new(first_id: u64) -> Self {
        Self {
            next_item: first_id,
            next_property: first_id,
            created: 0,
            claims: 0,
        }
    }

    /// Number of entities that would have been created
    pub fn created(&self) -> usize {
        self.created
    }

    /// Number of claims that would have been added
    pub fn claims(&self) -> usize {
        self.claims
    }
}

impl Default for DryRunSession {
    fn default() -> Self {
        Self::new(100)
    }
}

#[async_trait]
impl EntityClient for DryRunSession {
    async fn create_entity(
        &mut self,
        kind: EntityKind,
        data: &EntityData,
        target: Option<&EntityId>,
    ) -> Result<EntityId, WikibaseError> {
        let id = match target {
            Some(id) => id.clone(),
            None => {
                let counter = match kind {
                    EntityKind::Item => &mut self.next_item,
                    EntityKind::Property => &mut self.next_property,
                };
                let id = EntityId::new(kind, *counter);
                *counter += 1;
                id
            }
        };

        self.created += 1;
        tracing::info!(
            kind = %kind,
            id = %id,
            label = data.display_label().unwrap_or_default(),
            "Dry-creating entity"
        );
        Ok(id)
    }

    async fn update_entity_claims(
        &mut self,
        id: &EntityId,
        claims: &ClaimMap,
    ) -> Result<(), WikibaseError> {
        self.claims += claims.values().map(Vec::len).sum::<usize>();
        tracing::debug!(id = %id, properties = claims.len(), "Dry-adding claims");
        Ok(())
    }

    async fn clear_entity(&mut self, id: &EntityId) -> Result<(), WikibaseError> {
        tracing::info!(id = %id, "Dry-clearing entity");
        Ok(())
    }
}
