//! Ontology to Wikibase migration engine
//!
//! A run has three steps, all driven by [`Migrator::run`]:
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────┐     ┌──────────────────┐
//! │  Link store  │     │  Creation pass   │     │   Claim pass     │
//! │  load and    │────▶│  one entity per  │────▶│  one claim per   │
//! │  bootstrap   │     │  unlinked node   │     │  typed triple    │
//! └──────────────┘     └──────────────────┘     └──────────────────┘
//!                               │
//!                        link store saved
//! ```
//!
//! The link store is saved between the two passes, so an interrupted claim pass
//! can be resumed without creating anything twice.

pub mod bootstrap;
pub mod claims;
pub mod classify;
pub mod create;
pub mod error;
pub mod labels;

use std::fmt;

use crate::config::MigrationConfig;
use crate::graph::OntologyGraph;
use crate::links::{LinkError, LinkStore};
use crate::wikibase::{EntityClient, EntityData, EntityKind};

pub use bootstrap::{bootstrap, BootstrapEntry, BootstrapKind, BOOTSTRAP_TABLE};
pub use claims::{ClaimTyper, TypedClaim, ValueType};
pub use classify::{classify, classify_node, property_datatype, reference_kind, EntityClass};
pub use create::create_or_recreate;
pub use error::{MigrationError, MigrationResult};
pub use labels::{LabelAggregator, LabelPolicy};

// ============================================================================
// Report
// ============================================================================

/// Counters of one migration run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Well-known terms created from the bootstrap table
    pub bootstrapped: usize,

    /// Entities created in the creation pass
    pub created: usize,

    /// Subjects that were already linked
    pub reused: usize,

    /// Subjects that never become entities
    pub skipped: usize,

    /// Claims sent to the wiki
    pub claims_added: usize,

    /// Triples that produced no claim
    pub claims_skipped: usize,
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bootstrapped, {} created, {} reused, {} skipped entities; {} claims added, {} triples without claim",
            self.bootstrapped,
            self.created,
            self.reused,
            self.skipped,
            self.claims_added,
            self.claims_skipped
        )
    }
}

// ============================================================================
// Migrator
// ============================================================================

/// Drives a migration of one ontology graph
pub struct Migrator<'a> {
    graph: &'a OntologyGraph,
    config: &'a MigrationConfig,
    client: &'a mut dyn EntityClient,
    labels: LabelAggregator,
    links: LinkStore,
    report: MigrationReport,
}

impl<'a> Migrator<'a> {
    pub fn new(
        graph: &'a OntologyGraph,
        config: &'a MigrationConfig,
        client: &'a mut dyn EntityClient,
    ) -> Self {
        Self {
            graph,
            config,
            client,
            labels: LabelAggregator::from_config(config),
            links: LinkStore::new(),
            report: MigrationReport::default(),
        }
    }

    /// Link store as it stands
    pub fn links(&self) -> &LinkStore {
        &self.links
    }

    pub fn report(&self) -> &MigrationReport {
        &self.report
    }

    /// Run the full migration
    pub async fn run(&mut self) -> MigrationResult<MigrationReport> {
        tracing::info!(
            subjects = self.graph.subjects().len(),
            triples = self.graph.len(),
            link_file = %self.config.link_file.display(),
            dry_run = self.config.dry_run,
            "Starting migration"
        );

        self.prepare_links().await?;

        if let Err(err) = self.create_entities().await {
            self.save_after_abort("creation");
            return Err(err);
        }
        self.save_links()?;

        self.create_claims().await?;

        tracing::info!(report = %self.report, "Migration finished");
        Ok(self.report.clone())
    }

    /// Load the link store and bootstrap the well-known terms it still lacks
    pub async fn prepare_links(&mut self) -> MigrationResult<()> {
        let path = &self.config.link_file;

        match LinkStore::load(path)? {
            Some(links) => {
                tracing::info!(path = %path.display(), records = links.len(), "Loaded link store");
                self.links = links;
            }
            None => {
                tracing::info!(path = %path.display(), "No link store yet, starting a fresh one");
            }
        }

        let linked = self.links.len();
        let bootstrapped = bootstrap(
            &mut self.links,
            &mut *self.client,
            &self.config.default_language,
        )
        .await;
        self.report.bootstrapped = self.links.len() - linked;

        if let Err(err) = bootstrapped {
            self.save_after_abort("bootstrap");
            return Err(err);
        }
        Ok(())
    }

    /// Create an entity for every subject that has none yet
    pub async fn create_entities(&mut self) -> MigrationResult<()> {
        let graph = self.graph;
        let base_uri = self.config.base_uri.as_deref();

        for subject in graph.subjects() {
            if let Some(id) = self.links.resolve(subject, false)? {
                tracing::debug!(node = %subject, id = %id, "Subject already linked");
                self.report.reused += 1;
                continue;
            }

            let class = classify_node(graph, subject, base_uri)?;
            let (Some(kind), Some(iri)) = (class.kind(), subject.as_iri()) else {
                tracing::debug!(node = %subject, "Skipping subject");
                self.report.skipped += 1;
                continue;
            };

            let mut data = EntityData::new(
                &self.labels.labels(graph, subject),
                &self.labels.descriptions(graph, subject),
            );
            if kind == EntityKind::Property {
                data = data.with_datatype(property_datatype(graph, subject));
            }

            let id = create_or_recreate(&mut *self.client, kind, &data).await?;
            tracing::info!(
                node = %subject,
                id = %id,
                label = data.display_label().unwrap_or_default(),
                "Created entity"
            );
            self.links.record(iri, id);
            self.report.created += 1;
        }

        Ok(())
    }

    /// Attach a claim for every typed triple of every linked subject
    pub async fn create_claims(&mut self) -> MigrationResult<()> {
        let excluded = self
            .config
            .excluded_property_ids()
            .map_err(|e| MigrationError::InvalidConfig {
                field: "excluded_properties".to_string(),
                reason: format!("{e:#}"),
            })?;

        let graph = self.graph;
        let typer = ClaimTyper::new(graph, &self.links, &self.labels)
            .with_excluded_properties(excluded)
            .with_debug_claims(self.config.debug_claims);
        let base_uri = self.config.base_uri.as_deref();

        for subject in graph.subjects() {
            let id = match self.links.resolve(subject, false)? {
                Some(id) => id,
                None => match classify_node(graph, subject, base_uri)? {
                    EntityClass::Skip => continue,
                    _ => {
                        return Err(LinkError::Missing {
                            node: subject.to_string(),
                        }
                        .into())
                    }
                },
            };

            for statement in graph.statements_of(subject) {
                let Some(claim) =
                    typer.type_claim(subject, &statement.predicate, &statement.object)?
                else {
                    self.report.claims_skipped += 1;
                    continue;
                };

                self.client
                    .update_entity_claims(&id, &claim.statement.into_claims())
                    .await?;
                self.report.claims_added += 1;
            }
        }

        Ok(())
    }

    /// Persist whatever was linked before a pass failed
    fn save_after_abort(&self, pass: &str) {
        if let Err(save_err) = self.save_links() {
            tracing::error!(
                pass,
                error = %save_err,
                "Failed to save link store after aborted pass"
            );
        }
    }

    fn save_links(&self) -> MigrationResult<()> {
        if self.config.dry_run {
            tracing::info!(records = self.links.len(), "Dry run, link store not saved");
            return Ok(());
        }

        self.links.save(&self.config.link_file)?;
        tracing::info!(
            path = %self.config.link_file.display(),
            records = self.links.len(),
            "Saved link store"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::turtle::parse_turtle_str;
    use crate::wikibase::{DryRunSession, EntityId};
    use tempfile::TempDir;

    const ONTOLOGY: &str = r#"
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix ex: <http://example.org/ont#> .

<http://example.org/ont> a owl:Ontology ;
    rdfs:label "Example ontology"@en .

ex:Module a owl:Class ;
    rdfs:label "Module"@en ;
    rdfs:comment "A hardware module"@en .

ex:Part a owl:Class ;
    rdfs:label "Part"@en ;
    rdfs:subClassOf ex:Module .

ex:name a owl:DatatypeProperty ;
    rdfs:label "name"@en ;
    rdfs:domain ex:Module .
"#;

    fn config_in(dir: &TempDir) -> MigrationConfig {
        MigrationConfig {
            link_file: dir.path().join("links.ttl"),
            base_uri: None,
            ..MigrationConfig::default()
        }
    }

    #[test]
    fn test_report_display() {
        let report = MigrationReport {
            created: 3,
            claims_added: 2,
            ..MigrationReport::default()
        };
        assert_eq!(
            report.to_string(),
            "0 bootstrapped, 3 created, 0 reused, 0 skipped entities; 2 claims added, 0 triples without claim"
        );
    }

    #[tokio::test]
    async fn test_run_against_dry_session() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.dry_run = true;
        let graph = parse_turtle_str(ONTOLOGY, "test").unwrap();
        let mut client = DryRunSession::new(1);

        let mut migrator = Migrator::new(&graph, &config, &mut client);
        let report = migrator.run().await.unwrap();

        assert_eq!(report.bootstrapped, BOOTSTRAP_TABLE.len());
        assert_eq!(report.created, 3);
        assert_eq!(report.skipped, 1);
        // rdfs:subClassOf on Part is the only claim
        assert_eq!(report.claims_added, 1);
        assert!(migrator.links().contains("http://example.org/ont#Module"));
        assert!(!dir.path().join("links.ttl").exists());
    }

    #[tokio::test]
    async fn test_link_store_saved_between_passes() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let graph = parse_turtle_str(ONTOLOGY, "test").unwrap();
        let mut client = DryRunSession::new(1);

        Migrator::new(&graph, &config, &mut client).run().await.unwrap();

        let saved = LinkStore::load(&config.link_file).unwrap().unwrap();
        assert_eq!(saved.len(), BOOTSTRAP_TABLE.len() + 3);
    }

    #[tokio::test]
    async fn test_unknown_type_aborts_creation() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let graph = parse_turtle_str(
            "<http://example.org/ont#x> a <http://example.org/ont#Mystery> .",
            "test",
        )
        .unwrap();
        let mut client = DryRunSession::new(1);

        let err = Migrator::new(&graph, &config, &mut client)
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, MigrationError::Classification { .. }));
        // bootstrap results survive the aborted pass
        assert!(config.link_file.exists());
    }

    #[tokio::test]
    async fn test_existing_links_skip_bootstrap() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let mut links = LinkStore::new();
        for entry in BOOTSTRAP_TABLE {
            links.record(entry.iri, EntityId::property(900));
        }
        links.save(&config.link_file).unwrap();

        let graph = parse_turtle_str(ONTOLOGY, "test").unwrap();
        let mut client = DryRunSession::new(1);
        let report = Migrator::new(&graph, &config, &mut client)
            .run()
            .await
            .unwrap();

        assert_eq!(report.bootstrapped, 0);
        assert_eq!(report.created, 3);
    }
}
