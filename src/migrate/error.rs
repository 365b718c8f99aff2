//! Migration errors
//!
//! Every variant aborts the run. The one tolerated failure, an excluded
//! property, never becomes an error and is only logged by the claim typer.

use thiserror::Error;

use crate::graph::GraphError;
use crate::links::LinkError;
use crate::wikibase::WikibaseError;

/// Result type alias for migration operations
pub type MigrationResult<T> = Result<T, MigrationError>;

#[derive(Error, Debug)]
pub enum MigrationError {
    /// A subject's `rdf:type`s match no known entity class
    #[error("RDF subject {node} has unknown type(s): [{}]", .types.join(", "))]
    Classification { node: String, types: Vec<String> },

    /// Identifier resolution failed
    #[error(transparent)]
    Link(#[from] LinkError),

    /// The wiki rejected a request
    #[error(transparent)]
    Wikibase(#[from] WikibaseError),

    /// The ontology could not be loaded
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Invalid migration settings
    #[error("Invalid migration setting '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },
}

impl MigrationError {
    pub fn classification(node: impl Into<String>, types: &[&str]) -> Self {
        Self::Classification {
            node: node.into(),
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }
}
