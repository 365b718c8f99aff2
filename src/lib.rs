//! ont2wb - RDF/OWL ontology to Wikibase migration
//!
//! Reads an ontology in Turtle, creates one Wikibase item or property per
//! ontology node and attaches every typed triple as a claim.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`graph`] - In-memory RDF graph and Turtle loading
//! - [`links`] - Persistent ontology IRI to Wikibase id mapping
//! - [`wikibase`] - Wikibase API client and entity model
//! - [`migrate`] - Classification, label aggregation, claim typing and the migration driver
//! - [`error`] - Unified error type
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use ont2wb::config::Config;
//! use ont2wb::graph::turtle::load_turtle_file;
//! use ont2wb::migrate::Migrator;
//! use ont2wb::wikibase::DryRunSession;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let graph = load_turtle_file(std::path::Path::new("osh-metadata.ttl"))?;
//!     let mut client = DryRunSession::default();
//!     let report = Migrator::new(&graph, &config.migration, &mut client).run().await?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod links;
pub mod migrate;
pub mod utils;
pub mod wikibase;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Ont2WbError, Result};
    pub use crate::graph::{OntologyGraph, RdfNode, RdfObject};
    pub use crate::links::LinkStore;
    pub use crate::migrate::{MigrationReport, Migrator};
    pub use crate::wikibase::{DryRunSession, EntityClient, EntityId, EntityKind, WikibaseSession};
}

// Direct re-exports for convenience
pub use migrate::{MigrationReport, Migrator};
