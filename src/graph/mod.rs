//! In-memory ontology graph
//!
//! The source ontology is loaded once into an [`OntologyGraph`]: a flat list of
//! [`RdfStatement`]s plus a per-subject index. Subjects keep the order in which
//! they first appear in the source document, so both migration passes walk the
//! ontology deterministically.
//!
//! # Submodules
//!
//! - [`turtle`] - Turtle loading through `sophia`
//! - [`vocab`] - IRIs of RDF, RDFS, OWL, SKOS, Dublin Core and schema.org terms

pub mod turtle;
pub mod vocab;

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading an ontology graph
#[derive(Error, Debug)]
pub enum GraphError {
    /// The Turtle document could not be parsed
    #[error("Failed to parse Turtle from {source_name}: {reason}")]
    Parse { source_name: String, reason: String },

    /// The input file could not be read
    #[error("Failed to read ontology file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The remote ontology could not be downloaded
    #[error("Failed to download ontology from {url}: {reason}")]
    Download { url: String, reason: String },
}

/// Subject or IRI-object of a statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RdfNode {
    Iri(String),
    Blank(String),
}

impl RdfNode {
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    /// The IRI of this node, `None` for blank nodes
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            Self::Blank(_) => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank(_))
    }
}

impl fmt::Display for RdfNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{iri}>"),
            Self::Blank(id) => write!(f, "_:{id}"),
        }
    }
}

/// Literal object of a statement
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RdfLiteral {
    pub value: String,
    pub language: Option<String>,
    pub datatype: Option<String>,
}

impl RdfLiteral {
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    pub fn tagged(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: Some(language.into()),
            datatype: None,
        }
    }
}

/// Object position of a statement
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfObject {
    Node(RdfNode),
    Literal(RdfLiteral),
}

impl RdfObject {
    pub fn as_node(&self) -> Option<&RdfNode> {
        match self {
            Self::Node(node) => Some(node),
            Self::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&RdfLiteral> {
        match self {
            Self::Node(_) => None,
            Self::Literal(lit) => Some(lit),
        }
    }
}

impl fmt::Display for RdfObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node) => write!(f, "{node}"),
            Self::Literal(lit) => match &lit.language {
                Some(lang) => write!(f, "\"{}\"@{lang}", lit.value),
                None => write!(f, "\"{}\"", lit.value),
            },
        }
    }
}

/// One triple of the source ontology
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RdfStatement {
    pub subject: RdfNode,
    pub predicate: String,
    pub object: RdfObject,
}

/// The source ontology, indexed by subject
#[derive(Debug, Default, Clone)]
pub struct OntologyGraph {
    statements: Vec<RdfStatement>,
    subjects: Vec<RdfNode>,
    by_subject: HashMap<RdfNode, Vec<usize>>,
}

impl OntologyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from already parsed statements
    pub fn from_statements(statements: impl IntoIterator<Item = RdfStatement>) -> Self {
        let mut graph = Self::new();
        for statement in statements {
            graph.insert(statement);
        }
        graph
    }

    /// Add a statement; exact duplicates are ignored
    pub fn insert(&mut self, statement: RdfStatement) {
        if let Some(indices) = self.by_subject.get(&statement.subject) {
            if indices.iter().any(|&i| self.statements[i] == statement) {
                return;
            }
        }

        let index = self.statements.len();
        match self.by_subject.get_mut(&statement.subject) {
            Some(indices) => indices.push(index),
            None => {
                self.subjects.push(statement.subject.clone());
                self.by_subject.insert(statement.subject.clone(), vec![index]);
            }
        }
        self.statements.push(statement);
    }

    /// Distinct subjects in order of first appearance
    pub fn subjects(&self) -> &[RdfNode] {
        &self.subjects
    }

    /// All statements with the given subject
    pub fn statements_of<'a>(
        &'a self,
        subject: &RdfNode,
    ) -> impl Iterator<Item = &'a RdfStatement> + 'a {
        self.by_subject
            .get(subject)
            .map(|indices| indices.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&i| &self.statements[i])
    }

    /// Objects of `(subject, predicate, ?)`
    pub fn objects<'a>(
        &'a self,
        subject: &RdfNode,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a RdfObject> + 'a {
        self.statements_of(subject)
            .filter(move |st| st.predicate == predicate)
            .map(|st| &st.object)
    }

    /// IRIs of the declared `rdf:type`s of a node
    pub fn types_of(&self, node: &RdfNode) -> Vec<&str> {
        self.objects(node, vocab::RDF_TYPE)
            .filter_map(|obj| obj.as_node().and_then(RdfNode::as_iri))
            .collect()
    }

    pub fn statements(&self) -> &[RdfStatement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement(s: &str, p: &str, o: RdfObject) -> RdfStatement {
        RdfStatement {
            subject: RdfNode::iri(s),
            predicate: p.to_string(),
            object: o,
        }
    }

    #[test]
    fn test_subjects_keep_first_appearance_order() {
        let graph = OntologyGraph::from_statements(vec![
            statement("http://x/B", vocab::RDF_TYPE, RdfObject::Node(RdfNode::iri(vocab::OWL_CLASS))),
            statement("http://x/A", vocab::RDF_TYPE, RdfObject::Node(RdfNode::iri(vocab::OWL_CLASS))),
            statement("http://x/B", vocab::RDFS_LABEL, RdfObject::Literal(RdfLiteral::plain("B"))),
        ]);

        let subjects: Vec<_> = graph.subjects().iter().filter_map(RdfNode::as_iri).collect();
        assert_eq!(subjects, vec!["http://x/B", "http://x/A"]);
        assert_eq!(graph.statements_of(&RdfNode::iri("http://x/B")).count(), 2);
    }

    #[test]
    fn test_duplicate_statements_ignored() {
        let st = statement("http://x/A", vocab::RDFS_LABEL, RdfObject::Literal(RdfLiteral::plain("A")));
        let graph = OntologyGraph::from_statements(vec![st.clone(), st]);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_types_of() {
        let node = RdfNode::iri("http://x/p");
        let graph = OntologyGraph::from_statements(vec![
            statement("http://x/p", vocab::RDF_TYPE, RdfObject::Node(RdfNode::iri(vocab::OWL_OBJECT_PROPERTY))),
            statement("http://x/p", vocab::RDF_TYPE, RdfObject::Literal(RdfLiteral::plain("junk"))),
        ]);
        assert_eq!(graph.types_of(&node), vec![vocab::OWL_OBJECT_PROPERTY]);
        assert!(graph.types_of(&RdfNode::iri("http://x/none")).is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(RdfNode::iri("http://x/A").to_string(), "<http://x/A>");
        assert_eq!(RdfNode::Blank("b0".into()).to_string(), "_:b0");
        let lit = RdfObject::Literal(RdfLiteral::tagged("Foo", "en"));
        assert_eq!(lit.to_string(), "\"Foo\"@en");
    }
}
