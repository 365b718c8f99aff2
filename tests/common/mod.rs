//! Common test utilities

use async_trait::async_trait;
use std::collections::HashMap;

use ont2wb::config::MigrationConfig;
use ont2wb::links::LinkStore;
use ont2wb::migrate::BOOTSTRAP_TABLE;
use ont2wb::wikibase::{ClaimMap, EntityClient, EntityData, EntityId, EntityKind, WikibaseError};

/// IRI of the sample ontology's own node
#[allow(dead_code)]
pub const BASE_URI: &str = "http://example.org/okh/base";

/// Namespace of the sample ontology
#[allow(dead_code)]
pub const OKH: &str = "http://example.org/okh#";

/// A small hardware ontology exercising every kind of subject
#[allow(dead_code)]
pub const SAMPLE_ONTOLOGY: &str = r#"
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix schema: <http://schema.org/> .
@prefix okh: <http://example.org/okh#> .

<http://example.org/okh/base> a owl:Ontology ;
    rdfs:label "Open Know-How"@en .

okh:Module a owl:Class ;
    rdfs:label "Module"@en , "Modul"@de ;
    rdfs:comment "A piece of open source hardware"@en ;
    rdfs:subClassOf [
        a owl:Restriction ;
        owl:onProperty okh:repo ;
        owl:maxCardinality 1
    ] ;
    okh:hasPart okh:Part ;
    schema:version "1.0" ;
    okh:repo "https://github.com/example/module" .

okh:Part a owl:Class ;
    rdfs:label "Part"@en ;
    rdfs:subClassOf okh:Module .

okh:repo a owl:DatatypeProperty ;
    rdfs:label "repository"@en ;
    rdfs:range xsd:anyURI ;
    rdfs:domain okh:Module .

okh:hasPart a owl:ObjectProperty ;
    rdfs:label "has part"@en .
"#;

/// Migration settings pointing at a link file in `dir`
#[allow(dead_code)]
pub fn test_config(dir: &tempfile::TempDir) -> MigrationConfig {
    MigrationConfig {
        input: String::from("sample.ttl"),
        fallback_input: None,
        base_uri: Some(BASE_URI.to_string()),
        link_file: dir.path().join("links.ttl"),
        ..MigrationConfig::default()
    }
}

/// Link store with every bootstrap term linked to its Wikidata identifier
#[allow(dead_code)]
pub fn wikidata_links() -> LinkStore {
    let mut links = LinkStore::new();
    for entry in BOOTSTRAP_TABLE {
        let id: EntityId = entry.wikidata.parse().expect("valid Wikidata id");
        links.record(entry.iri, id);
    }
    links
}

/// One call received by [`RecordingClient`]
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub enum ClientCall {
    Create {
        kind: EntityKind,
        label: Option<String>,
        target: Option<EntityId>,
        data: EntityData,
    },
    Claims {
        id: EntityId,
        claims: ClaimMap,
    },
    Clear(EntityId),
}

/// In-memory [`EntityClient`] that records every call
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct RecordingClient {
    pub calls: Vec<ClientCall>,
    next_id: u64,
    collisions: HashMap<String, EntityId>,
    fail_on_create: Option<usize>,
}

#[allow(dead_code)]
impl RecordingClient {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// New identifiers start at `first_id`
    pub fn starting_at(first_id: u64) -> Self {
        Self {
            next_id: first_id,
            ..Self::default()
        }
    }

    /// The first creation of an entity labelled `label` collides with `id`
    pub fn with_collision(mut self, label: &str, id: EntityId) -> Self {
        self.collisions.insert(label.to_string(), id);
        self
    }

    /// The `n`th creation (1-based) fails with an HTTP 502
    pub fn failing_on_create(mut self, n: usize) -> Self {
        self.fail_on_create = Some(n);
        self
    }

    pub fn creations(&self) -> Vec<&ClientCall> {
        self.calls
            .iter()
            .filter(|call| matches!(call, ClientCall::Create { .. }))
            .collect()
    }

    /// Claims sent for `id`, flattened
    pub fn claims_of(&self, id: &EntityId) -> Vec<&ClaimMap> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                ClientCall::Claims { id: target, claims } if target == id => Some(claims),
                _ => None,
            })
            .collect()
    }

    /// Payload of the entity created with `label`
    pub fn created_with_label(&self, label: &str) -> Option<&EntityData> {
        self.calls.iter().rev().find_map(|call| match call {
            ClientCall::Create {
                label: Some(l),
                data,
                ..
            } if l == label => Some(data),
            _ => None,
        })
    }
}

#[async_trait]
impl EntityClient for RecordingClient {
    async fn create_entity(
        &mut self,
        kind: EntityKind,
        data: &EntityData,
        target: Option<&EntityId>,
    ) -> Result<EntityId, WikibaseError> {
        if self.fail_on_create == Some(self.creations().len() + 1) {
            return Err(WikibaseError::Status { status: 502 });
        }

        let label = data.display_label().map(str::to_string);
        self.calls.push(ClientCall::Create {
            kind,
            label: label.clone(),
            target: target.cloned(),
            data: data.clone(),
        });

        if target.is_none() {
            if let Some(id) = label.as_ref().and_then(|l| self.collisions.remove(l)) {
                let info = format!(
                    "{kind} [[{}:{id}|{id}]] already has label \"{}\" associated with language code en.",
                    kind.namespace(),
                    label.unwrap_or_default()
                );
                return Err(WikibaseError::from_api(kind, "modification-failed", info));
            }
        }

        let id = match target {
            Some(id) => id.clone(),
            None => {
                let id = EntityId::new(kind, self.next_id);
                self.next_id += 1;
                id
            }
        };
        Ok(id)
    }

    async fn update_entity_claims(
        &mut self,
        id: &EntityId,
        claims: &ClaimMap,
    ) -> Result<(), WikibaseError> {
        self.calls.push(ClientCall::Claims {
            id: id.clone(),
            claims: claims.clone(),
        });
        Ok(())
    }

    async fn clear_entity(&mut self, id: &EntityId) -> Result<(), WikibaseError> {
        self.calls.push(ClientCall::Clear(id.clone()));
        Ok(())
    }
}
