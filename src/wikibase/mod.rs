//! Wikibase target system
//!
//! This module holds everything the migration needs to know about the target
//! knowledge base:
//!
//! - [`model`] - identifiers and the entity/claim JSON model
//! - [`error`] - API errors, including collision detection
//! - [`session`] - live client for a wiki's `api.php`
//! - [`dry_run`] - offline client that only logs what it would do
//!
//! Both clients implement [`EntityClient`], the capability the migration engine
//! is written against.

pub mod dry_run;
pub mod error;
pub mod model;
pub mod session;

use async_trait::async_trait;

pub use dry_run::DryRunSession;
pub use error::WikibaseError;
pub use model::{
    ClaimMap, DataValue, EntityData, EntityId, EntityKind, EntityRef, LanguageMap,
    PropertyDatatype, Statement,
};
pub use session::{LoginMethod, SessionConfig, WikibaseSession};

/// Create/edit operations on target entities
///
/// Every call is a single round trip; implementations do not retry.
#[async_trait]
pub trait EntityClient: Send {
    /// Create an entity, or overwrite `target` when given
    ///
    /// A label/description conflict is reported as [`WikibaseError::Collision`].
    async fn create_entity(
        &mut self,
        kind: EntityKind,
        data: &EntityData,
        target: Option<&EntityId>,
    ) -> Result<EntityId, WikibaseError>;

    /// Append claims to an existing entity
    async fn update_entity_claims(
        &mut self,
        id: &EntityId,
        claims: &ClaimMap,
    ) -> Result<(), WikibaseError>;

    /// Remove labels, descriptions and claims of an entity
    async fn clear_entity(&mut self, id: &EntityId) -> Result<(), WikibaseError>;
}
