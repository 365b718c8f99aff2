//! Entity classification
//!
//! Decides from a node's declared `rdf:type`s whether it becomes a Wikibase item,
//! a property, or nothing at all.

use crate::graph::{vocab, OntologyGraph, RdfNode};
use crate::utils::local_name;
use crate::wikibase::{EntityKind, PropertyDatatype};

use super::error::{MigrationError, MigrationResult};

/// What a subject turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityClass {
    Item,
    Property,
    /// Ontology header, blank node or base URI
    Skip,
}

impl EntityClass {
    /// Target entity kind, `None` for skipped nodes
    pub fn kind(&self) -> Option<EntityKind> {
        match self {
            Self::Item => Some(EntityKind::Item),
            Self::Property => Some(EntityKind::Property),
            Self::Skip => None,
        }
    }
}

impl std::fmt::Display for EntityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Item => f.write_str("item"),
            Self::Property => f.write_str("property"),
            Self::Skip => f.write_str("skip"),
        }
    }
}

fn declares_property(types: &[&str]) -> bool {
    types
        .iter()
        .any(|t| *t == vocab::OWL_OBJECT_PROPERTY || *t == vocab::OWL_DATATYPE_PROPERTY)
}

/// Classify a subject from its declared types
///
/// Unknown type sets are an error: silently dropping the node would leave
/// dangling references in the claims that point at it.
pub fn classify(
    node: &RdfNode,
    types: &[&str],
    base_uri: Option<&str>,
) -> MigrationResult<EntityClass> {
    let iri = match node {
        RdfNode::Blank(_) => return Ok(EntityClass::Skip),
        RdfNode::Iri(iri) => iri.as_str(),
    };

    if base_uri.is_some_and(|base| base == iri) {
        return Ok(EntityClass::Skip);
    }

    if types.contains(&vocab::OWL_CLASS) {
        Ok(EntityClass::Item)
    } else if declares_property(types) {
        Ok(EntityClass::Property)
    } else if types.contains(&vocab::OWL_ONTOLOGY) {
        Ok(EntityClass::Skip)
    } else {
        Err(MigrationError::classification(node.to_string(), types))
    }
}

/// [`classify`] with the types looked up in `graph`
pub fn classify_node(
    graph: &OntologyGraph,
    node: &RdfNode,
    base_uri: Option<&str>,
) -> MigrationResult<EntityClass> {
    classify(node, &graph.types_of(node), base_uri)
}

/// Kind of entity a claim object points at
///
/// Objects that are not declared locally fall back to a naming convention:
/// `CamelCase` local names are classes (items), `camelCase` ones are properties.
pub fn reference_kind(iri: &str, types: &[&str]) -> EntityKind {
    if types.contains(&vocab::OWL_CLASS) {
        EntityKind::Item
    } else if declares_property(types) {
        EntityKind::Property
    } else if local_name(iri).starts_with(char::is_uppercase) {
        EntityKind::Item
    } else {
        EntityKind::Property
    }
}

/// Datatype declared for a new property
pub fn property_datatype(graph: &OntologyGraph, node: &RdfNode) -> PropertyDatatype {
    let types = graph.types_of(node);
    if types.contains(&vocab::OWL_OBJECT_PROPERTY) {
        return PropertyDatatype::WikibaseItem;
    }

    let url_range = graph
        .objects(node, vocab::RDFS_RANGE)
        .filter_map(|obj| obj.as_node().and_then(RdfNode::as_iri))
        .any(|range| range == vocab::XSD_ANY_URI);

    if url_range {
        PropertyDatatype::Url
    } else {
        PropertyDatatype::String
    }
}
