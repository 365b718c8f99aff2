//! Claim value typing
//!
//! Turns one `(predicate, object)` pair of the ontology into a Wikibase statement.
//! The typer only consults the link store; it never creates entities, so every
//! entity a claim points at must have been created in the first pass.

use std::collections::HashSet;

use crate::graph::{vocab, OntologyGraph, RdfNode, RdfObject};
use crate::links::LinkStore;
use crate::utils::is_valid_url;
use crate::wikibase::{DataValue, EntityId, EntityKind, EntityRef, PropertyDatatype, Statement};

use super::classify::reference_kind;
use super::error::MigrationResult;
use super::labels::LabelAggregator;

/// Inferred type of a claim value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Url,
    Item,
    Property,
}

impl ValueType {
    /// Snak datatype for this value
    pub fn datatype(&self) -> PropertyDatatype {
        match self {
            Self::String => PropertyDatatype::String,
            Self::Url => PropertyDatatype::Url,
            Self::Item => PropertyDatatype::WikibaseItem,
            Self::Property => PropertyDatatype::WikibaseProperty,
        }
    }
}

impl From<EntityKind> for ValueType {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Item => Self::Item,
            EntityKind::Property => Self::Property,
        }
    }
}

/// A claim ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedClaim {
    pub property: EntityId,
    pub value_type: ValueType,
    pub statement: Statement,
}

/// Builds statements from ontology triples
pub struct ClaimTyper<'a> {
    graph: &'a OntologyGraph,
    links: &'a LinkStore,
    non_claim_predicates: HashSet<&'static str>,
    excluded_properties: HashSet<EntityId>,
    debug_claims: bool,
}

impl<'a> ClaimTyper<'a> {
    pub fn new(graph: &'a OntologyGraph, links: &'a LinkStore, labels: &LabelAggregator) -> Self {
        let mut non_claim_predicates: HashSet<&'static str> = [
            vocab::RDF_TYPE,
            vocab::OWL_CARDINALITY,
            vocab::OWL_MAX_CARDINALITY,
            vocab::OWL_MIN_CARDINALITY,
        ]
        .into_iter()
        .collect();
        non_claim_predicates.extend(labels.label_predicates());
        non_claim_predicates.extend(labels.description_predicates());

        Self {
            graph,
            links,
            non_claim_predicates,
            excluded_properties: HashSet::new(),
            debug_claims: false,
        }
    }

    /// Properties whose claims are dropped with a warning
    pub fn with_excluded_properties(mut self, ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.excluded_properties.extend(ids);
        self
    }

    /// Log every built claim at info level
    pub fn with_debug_claims(mut self, enable: bool) -> Self {
        self.debug_claims = enable;
        self
    }

    /// Structural predicates that never become claims
    pub fn is_non_claim(&self, predicate: &str) -> bool {
        self.non_claim_predicates.contains(predicate)
    }

    /// Value type of an object, without resolving anything
    pub fn value_type(&self, object: &RdfObject) -> Option<ValueType> {
        match object {
            RdfObject::Literal(lit) if is_valid_url(&lit.value) => Some(ValueType::Url),
            RdfObject::Literal(_) => Some(ValueType::String),
            RdfObject::Node(RdfNode::Iri(iri)) => {
                let node = RdfNode::Iri(iri.clone());
                Some(reference_kind(iri, &self.graph.types_of(&node)).into())
            }
            RdfObject::Node(RdfNode::Blank(_)) => None,
        }
    }

    /// Type the claim for `subject predicate object`
    ///
    /// `Ok(None)` means the triple intentionally produces no claim.
    pub fn type_claim(
        &self,
        subject: &RdfNode,
        predicate: &str,
        object: &RdfObject,
    ) -> MigrationResult<Option<TypedClaim>> {
        if self.is_non_claim(predicate) {
            return Ok(None);
        }

        if predicate == vocab::RDFS_RANGE || predicate == vocab::RDFS_DOMAIN {
            tracing::debug!(subject = %subject, predicate = %predicate, "Schema predicate, no claim");
            return Ok(None);
        }

        let property = self.links.require(&RdfNode::iri(predicate))?;

        if self.excluded_properties.contains(&property) {
            tracing::warn!(
                subject = %subject,
                predicate = %predicate,
                property = %property,
                "Property is excluded from migration, dropping claim"
            );
            return Ok(None);
        }

        let Some(value_type) = self.value_type(object) else {
            tracing::warn!(
                subject = %subject,
                predicate = %predicate,
                object = %object,
                "Blank node object cannot be referenced, dropping claim"
            );
            return Ok(None);
        };

        let value = match object {
            RdfObject::Literal(lit) => DataValue::String(lit.value.clone()),
            RdfObject::Node(node) => {
                let target = self.links.require(node)?;
                DataValue::EntityId(EntityRef::from(&target))
            }
        };

        let statement = Statement::new(&property, value_type.datatype(), value);

        if self.debug_claims {
            tracing::info!(
                subject = %subject,
                claim = %serde_json::to_string(&statement).unwrap_or_default(),
                "Built claim"
            );
        } else {
            tracing::debug!(
                subject = %subject,
                property = %property,
                datatype = %value_type.datatype(),
                "Built claim"
            );
        }

        Ok(Some(TypedClaim {
            property,
            value_type,
            statement,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{RdfLiteral, RdfStatement};
    use crate::links::LinkError;
    use crate::migrate::error::MigrationError;

    const SUBJECT: &str = "http://x/ont#Module";
    const PRED: &str = "http://x/ont#prop";

    fn typer_fixture() -> (OntologyGraph, LinkStore) {
        let graph = OntologyGraph::from_statements(vec![
            RdfStatement {
                subject: RdfNode::iri("http://x/ont#part"),
                predicate: vocab::RDF_TYPE.into(),
                object: RdfObject::Node(RdfNode::iri(vocab::OWL_CLASS)),
            },
            RdfStatement {
                subject: RdfNode::iri("http://x/ont#Weird"),
                predicate: vocab::RDF_TYPE.into(),
                object: RdfObject::Node(RdfNode::iri(vocab::OWL_OBJECT_PROPERTY)),
            },
        ]);

        let mut links = LinkStore::new();
        links.record(PRED, EntityId::property(10));
        links.record("http://x/ont#part", EntityId::item(5));
        links.record("http://x/ont#Weird", EntityId::property(6));
        links.record("http://x/ont#Other", EntityId::item(7));
        (graph, links)
    }

    fn literal(text: &str) -> RdfObject {
        RdfObject::Literal(RdfLiteral::plain(text))
    }

    #[test]
    fn test_string_literal() {
        let (graph, links) = typer_fixture();
        let typer = ClaimTyper::new(&graph, &links, &LabelAggregator::default());

        let claim = typer
            .type_claim(&RdfNode::iri(SUBJECT), PRED, &literal("not a url"))
            .unwrap()
            .unwrap();
        assert_eq!(claim.property, EntityId::property(10));
        assert_eq!(claim.value_type, ValueType::String);
        assert_eq!(claim.statement.mainsnak.datatype, PropertyDatatype::String);
        assert_eq!(
            claim.statement.mainsnak.datavalue,
            DataValue::String("not a url".into())
        );
    }

    #[test]
    fn test_url_literal() {
        let (graph, links) = typer_fixture();
        let typer = ClaimTyper::new(&graph, &links, &LabelAggregator::default());

        let claim = typer
            .type_claim(&RdfNode::iri(SUBJECT), PRED, &literal("http://example.org"))
            .unwrap()
            .unwrap();
        assert_eq!(claim.value_type, ValueType::Url);
        assert_eq!(claim.statement.mainsnak.datatype, PropertyDatatype::Url);
    }

    #[test]
    fn test_padded_url_stays_a_string() {
        let (graph, links) = typer_fixture();
        let typer = ClaimTyper::new(&graph, &links, &LabelAggregator::default());

        let claim = typer
            .type_claim(&RdfNode::iri(SUBJECT), PRED, &literal(" http://example.org "))
            .unwrap()
            .unwrap();
        assert_eq!(claim.value_type, ValueType::String);
        assert_eq!(
            claim.statement.mainsnak.datavalue,
            DataValue::String(" http://example.org ".into())
        );
    }

    #[test]
    fn test_declared_types_win_over_naming() {
        let (graph, links) = typer_fixture();
        let typer = ClaimTyper::new(&graph, &links, &LabelAggregator::default());
        let subject = RdfNode::iri(SUBJECT);

        let part = RdfObject::Node(RdfNode::iri("http://x/ont#part"));
        let claim = typer.type_claim(&subject, PRED, &part).unwrap().unwrap();
        assert_eq!(claim.value_type, ValueType::Item);
        assert_eq!(
            claim.statement.mainsnak.datavalue,
            DataValue::EntityId(EntityRef {
                entity_type: EntityKind::Item,
                id: "Q5".into(),
                numeric_id: 5,
            })
        );

        let weird = RdfObject::Node(RdfNode::iri("http://x/ont#Weird"));
        let claim = typer.type_claim(&subject, PRED, &weird).unwrap().unwrap();
        assert_eq!(claim.value_type, ValueType::Property);
        assert_eq!(claim.statement.mainsnak.datatype, PropertyDatatype::WikibaseProperty);
    }

    #[test]
    fn test_naming_fallback() {
        let (graph, links) = typer_fixture();
        let typer = ClaimTyper::new(&graph, &links, &LabelAggregator::default());

        let other = RdfObject::Node(RdfNode::iri("http://x/ont#Other"));
        let claim = typer
            .type_claim(&RdfNode::iri(SUBJECT), PRED, &other)
            .unwrap()
            .unwrap();
        assert_eq!(claim.value_type, ValueType::Item);
    }

    #[test]
    fn test_non_claim_predicates() {
        let (graph, links) = typer_fixture();
        let typer = ClaimTyper::new(&graph, &links, &LabelAggregator::default());
        let subject = RdfNode::iri(SUBJECT);

        for predicate in [
            vocab::RDF_TYPE,
            vocab::RDFS_LABEL,
            vocab::SKOS_DEFINITION,
            vocab::OWL_MIN_CARDINALITY,
            vocab::RDFS_RANGE,
        ] {
            assert_eq!(typer.type_claim(&subject, predicate, &literal("x")).unwrap(), None);
        }
    }

    #[test]
    fn test_unresolved_predicate_is_fatal() {
        let (graph, links) = typer_fixture();
        let typer = ClaimTyper::new(&graph, &links, &LabelAggregator::default());

        let err = typer
            .type_claim(&RdfNode::iri(SUBJECT), "http://x/ont#unknown", &literal("x"))
            .unwrap_err();
        assert!(matches!(err, MigrationError::Link(LinkError::Missing { .. })));
    }

    #[test]
    fn test_unresolved_object_is_fatal() {
        let (graph, links) = typer_fixture();
        let typer = ClaimTyper::new(&graph, &links, &LabelAggregator::default());

        let missing = RdfObject::Node(RdfNode::iri("http://x/ont#Missing"));
        let err = typer
            .type_claim(&RdfNode::iri(SUBJECT), PRED, &missing)
            .unwrap_err();
        assert!(matches!(err, MigrationError::Link(LinkError::Missing { .. })));
    }

    #[test]
    fn test_excluded_property_dropped() {
        let (graph, links) = typer_fixture();
        let typer = ClaimTyper::new(&graph, &links, &LabelAggregator::default())
            .with_excluded_properties([EntityId::property(10)]);

        let outcome = typer
            .type_claim(&RdfNode::iri(SUBJECT), PRED, &literal("x"))
            .unwrap();
        assert_eq!(outcome, None);
    }

    #[test]
    fn test_blank_object_dropped() {
        let (graph, links) = typer_fixture();
        let typer = ClaimTyper::new(&graph, &links, &LabelAggregator::default());

        let blank = RdfObject::Node(RdfNode::Blank("r1".into()));
        let outcome = typer
            .type_claim(&RdfNode::iri(SUBJECT), PRED, &blank)
            .unwrap();
        assert_eq!(outcome, None);
    }
}
