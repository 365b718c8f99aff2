//! Identifier link store
//!
//! Persistent mapping from ontology IRIs to Wikibase identifiers. The store is
//! the only place identifiers come from: the migration looks nodes up here, and
//! records a node only after the wiki has created an entity for it.
//!
//! On disk the store is itself a small Turtle graph, one
//! `<node> schema:identifier "Q123" .` triple per record, so it can be inspected
//! and merged with ordinary RDF tooling.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use sophia::api::serializer::{Stringifier, TripleSerializer};
use sophia::api::term::{IriRef, SimpleTerm, Term};
use sophia::turtle::serializer::turtle::{TurtleConfig, TurtleSerializer};
use thiserror::Error;

use crate::graph::turtle::parse_turtle_str;
use crate::graph::{vocab, GraphError, RdfNode, RdfObject};
use crate::wikibase::EntityId;

/// Link store errors
#[derive(Error, Debug)]
pub enum LinkError {
    /// A node that must already be materialized has no identifier
    #[error("No Wikibase identifier for {node}")]
    Missing { node: String },

    /// More than one identifier recorded for a node
    #[error("Multiple Wikibase identifiers for {node}: {ids:?}")]
    Duplicate { node: String, ids: Vec<String> },

    /// Blank nodes have no stable identity and are never linked
    #[error("Blank node {node} cannot be linked to a Wikibase entity")]
    BlankNode { node: String },

    /// The link file could not be parsed
    #[error("Failed to load link store {path:?}: {reason}")]
    Load { path: PathBuf, reason: String },

    /// The store could not be serialized as Turtle
    #[error("Failed to encode link of {node}: {reason}")]
    Encode { node: String, reason: String },

    /// The link file could not be written
    #[error("Failed to save link store {path:?}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Ontology IRI -> Wikibase identifier records
#[derive(Debug, Default, Clone)]
pub struct LinkStore {
    records: BTreeMap<String, Vec<EntityId>>,
}

impl LinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the identifier of `node`
    ///
    /// Returns `Ok(None)` for an unknown node unless `required` is set, in which
    /// case [`LinkError::Missing`] is returned. More than one record is always
    /// [`LinkError::Duplicate`].
    pub fn resolve(&self, node: &RdfNode, required: bool) -> Result<Option<EntityId>, LinkError> {
        let iri = match node {
            RdfNode::Iri(iri) => iri,
            RdfNode::Blank(_) if required => {
                return Err(LinkError::BlankNode {
                    node: node.to_string(),
                })
            }
            RdfNode::Blank(_) => return Ok(None),
        };

        self.resolve_iri(iri, required)
    }

    /// [`resolve`](Self::resolve) for a bare IRI
    pub fn resolve_iri(&self, iri: &str, required: bool) -> Result<Option<EntityId>, LinkError> {
        match self.records.get(iri).map(Vec::as_slice) {
            Some([id]) => Ok(Some(id.clone())),
            Some(ids) if ids.len() > 1 => Err(LinkError::Duplicate {
                node: iri.to_string(),
                ids: ids.iter().map(ToString::to_string).collect(),
            }),
            _ if required => Err(LinkError::Missing {
                node: iri.to_string(),
            }),
            _ => Ok(None),
        }
    }

    /// Identifier of a node that must already be linked
    pub fn require(&self, node: &RdfNode) -> Result<EntityId, LinkError> {
        self.resolve(node, true)?.ok_or_else(|| LinkError::Missing {
            node: node.to_string(),
        })
    }

    /// Add a record; callers record each node at most once
    pub fn record(&mut self, iri: impl Into<String>, id: EntityId) {
        let iri = iri.into();
        tracing::debug!(node = %iri, id = %id, "Recording link");
        self.records.entry(iri).or_default().push(id);
    }

    pub fn contains(&self, iri: &str) -> bool {
        self.records.contains_key(iri)
    }

    /// Number of linked nodes
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in IRI order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntityId)> {
        self.records
            .iter()
            .flat_map(|(iri, ids)| ids.iter().map(move |id| (iri.as_str(), id)))
    }

    /// Parse a store from its Turtle form
    pub fn from_turtle(text: &str, source_name: &str) -> Result<Self, LinkError> {
        let load_err = |reason: String| LinkError::Load {
            path: PathBuf::from(source_name),
            reason,
        };

        let graph = parse_turtle_str(text, source_name).map_err(|e| match e {
            GraphError::Parse { reason, .. } => load_err(reason),
            other => load_err(other.to_string()),
        })?;

        let mut store = Self::new();
        for statement in graph.statements() {
            if statement.predicate != vocab::SCHEMA_IDENTIFIER {
                continue;
            }
            let RdfNode::Iri(iri) = &statement.subject else {
                continue;
            };
            let RdfObject::Literal(lit) = &statement.object else {
                return Err(load_err(format!("identifier of <{iri}> is not a literal")));
            };
            let id: EntityId = lit
                .value
                .parse()
                .map_err(|_| load_err(format!("invalid identifier '{}' for <{iri}>", lit.value)))?;
            store.record(iri.clone(), id);
        }

        Ok(store)
    }

    /// Serialize the store as Turtle
    ///
    /// Fails rather than dropping a record whose node is not a valid IRI.
    pub fn to_turtle(&self) -> Result<String, LinkError> {
        let identifier = IriRef::new_unchecked(vocab::SCHEMA_IDENTIFIER);

        let mut triples: Vec<[SimpleTerm<'static>; 3]> = Vec::with_capacity(self.len());
        for (iri, id) in self.iter() {
            let node = IriRef::new(iri.to_string()).map_err(|e| LinkError::Encode {
                node: iri.to_string(),
                reason: e.to_string(),
            })?;
            triples.push([
                node.into_term(),
                identifier.clone().into_term(),
                id.to_string().as_str().into_term(),
            ]);
        }

        let mut serializer =
            TurtleSerializer::new_stringifier_with_config(TurtleConfig::new().with_pretty(true));
        serializer
            .serialize_graph(&triples)
            .map_err(|e| LinkError::Encode {
                node: "<link store>".to_string(),
                reason: e.to_string(),
            })?;

        Ok(serializer.as_str().to_string())
    }

    /// Load the store from `path`, or `None` if the file does not exist yet
    pub fn load(path: &Path) -> Result<Option<Self>, LinkError> {
        if !path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(path).map_err(|e| LinkError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let store = Self::from_turtle(&text, &path.display().to_string())?;
        tracing::info!(path = %path.display(), links = store.len(), "Link store loaded");
        Ok(Some(store))
    }

    /// Save the store atomically (write to temp file, then rename)
    pub fn save(&self, path: &Path) -> Result<(), LinkError> {
        let save_err = |source: std::io::Error| LinkError::Save {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(save_err)?;
            }
        }

        let turtle = self.to_turtle()?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, turtle).map_err(save_err)?;
        fs::rename(&temp_path, path).map_err(save_err)?;

        tracing::info!(path = %path.display(), links = self.len(), "Link store saved");
        Ok(())
    }
}
