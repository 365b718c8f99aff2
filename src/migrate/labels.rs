//! Label and description aggregation
//!
//! Wikibase holds one label and one description per language, while an ontology
//! may carry several (`rdfs:label` next to `skos:prefLabel`, two English
//! comments, ...). All values of one language are joined with a paragraph
//! separator, in predicate priority order and then in document order.

use serde::{Deserialize, Serialize};

use crate::config::MigrationConfig;
use crate::graph::{vocab, OntologyGraph, RdfNode, RdfObject};
use crate::utils::truncate_text;
use crate::wikibase::LanguageMap;

/// Which label/description predicates are consulted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelPolicy {
    /// Every predicate of the priority list contributes
    #[default]
    AllPredicates,
    /// Only the highest-priority predicate (`rdfs:label`, `rdfs:comment`)
    FirstPredicateOnly,
}

impl LabelPolicy {
    fn select(&self, predicates: &'static [&'static str]) -> &'static [&'static str] {
        match self {
            Self::AllPredicates => predicates,
            Self::FirstPredicateOnly => &predicates[..1],
        }
    }
}

/// Builds the label and description maps of a node
#[derive(Debug, Clone)]
pub struct LabelAggregator {
    default_language: String,
    label_separator: String,
    description_separator: String,
    max_description_len: usize,
    policy: LabelPolicy,
}

impl Default for LabelAggregator {
    fn default() -> Self {
        Self::from_config(&MigrationConfig::default())
    }
}

impl LabelAggregator {
    pub fn from_config(config: &MigrationConfig) -> Self {
        Self {
            default_language: config.default_language.clone(),
            label_separator: config.label_separator.clone(),
            description_separator: config.description_separator.clone(),
            max_description_len: config.max_description_len,
            policy: config.label_policy,
        }
    }

    /// Label predicates in use, highest priority first
    pub fn label_predicates(&self) -> &'static [&'static str] {
        self.policy.select(vocab::LABEL_PREDICATES)
    }

    /// Description predicates in use, highest priority first
    pub fn description_predicates(&self) -> &'static [&'static str] {
        self.policy.select(vocab::DESCRIPTION_PREDICATES)
    }

    /// Language -> joined label text
    pub fn labels(&self, graph: &OntologyGraph, node: &RdfNode) -> LanguageMap {
        self.aggregate(graph, node, self.label_predicates(), &self.label_separator)
    }

    /// Language -> joined description text, cut to the wiki's length limit
    pub fn descriptions(&self, graph: &OntologyGraph, node: &RdfNode) -> LanguageMap {
        let mut descriptions = self.aggregate(
            graph,
            node,
            self.description_predicates(),
            &self.description_separator,
        );
        for text in descriptions.values_mut() {
            *text = truncate_text(text, self.max_description_len);
        }
        descriptions
    }

    fn aggregate(
        &self,
        graph: &OntologyGraph,
        node: &RdfNode,
        predicates: &[&str],
        separator: &str,
    ) -> LanguageMap {
        let mut map = LanguageMap::new();

        for predicate in predicates {
            for literal in graph.objects(node, predicate).filter_map(RdfObject::as_literal) {
                let language = literal
                    .language
                    .clone()
                    .unwrap_or_else(|| self.default_language.clone());

                map.entry(language)
                    .and_modify(|text: &mut String| {
                        text.push_str(separator);
                        text.push_str(&literal.value);
                    })
                    .or_insert_with(|| literal.value.clone());
            }
        }

        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{RdfLiteral, RdfStatement};

    fn graph_with(node: &RdfNode, values: Vec<(&str, RdfLiteral)>) -> OntologyGraph {
        OntologyGraph::from_statements(values.into_iter().map(|(predicate, lit)| RdfStatement {
            subject: node.clone(),
            predicate: predicate.to_string(),
            object: RdfObject::Literal(lit),
        }))
    }

    #[test]
    fn test_labels_joined_per_language() {
        let node = RdfNode::iri("http://x/A");
        let graph = graph_with(
            &node,
            vec![
                (vocab::RDFS_LABEL, RdfLiteral::tagged("Foo", "en")),
                (vocab::RDFS_LABEL, RdfLiteral::tagged("Bar", "en")),
                (vocab::RDFS_LABEL, RdfLiteral::tagged("Baz", "fr")),
            ],
        );

        let labels = LabelAggregator::default().labels(&graph, &node);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels["en"], "Foo\n\nBar");
        assert_eq!(labels["fr"], "Baz");
    }

    #[test]
    fn test_untagged_literal_uses_default_language() {
        let node = RdfNode::iri("http://x/A");
        let graph = graph_with(&node, vec![(vocab::RDFS_LABEL, RdfLiteral::plain("Thing"))]);

        let labels = LabelAggregator::default().labels(&graph, &node);
        assert_eq!(labels["en"], "Thing");
    }

    #[test]
    fn test_all_predicates_in_priority_order() {
        let node = RdfNode::iri("http://x/A");
        let graph = graph_with(
            &node,
            vec![
                (vocab::DC_TITLE, RdfLiteral::tagged("dc", "en")),
                (vocab::SKOS_PREF_LABEL, RdfLiteral::tagged("skos", "en")),
                (vocab::RDFS_LABEL, RdfLiteral::tagged("rdfs", "en")),
            ],
        );

        let labels = LabelAggregator::default().labels(&graph, &node);
        assert_eq!(labels["en"], "rdfs\n\nskos\n\ndc");
    }

    #[test]
    fn test_first_predicate_only() {
        let node = RdfNode::iri("http://x/A");
        let graph = graph_with(
            &node,
            vec![
                (vocab::SKOS_PREF_LABEL, RdfLiteral::tagged("skos", "en")),
                (vocab::RDFS_LABEL, RdfLiteral::tagged("rdfs", "en")),
            ],
        );

        let config = MigrationConfig {
            label_policy: LabelPolicy::FirstPredicateOnly,
            ..MigrationConfig::default()
        };
        let aggregator = LabelAggregator::from_config(&config);
        assert_eq!(aggregator.labels(&graph, &node)["en"], "rdfs");
        assert_eq!(aggregator.label_predicates(), &[vocab::RDFS_LABEL]);
    }

    #[test]
    fn test_long_description_truncated() {
        let node = RdfNode::iri("http://x/A");
        let text = "x".repeat(260);
        let graph = graph_with(&node, vec![(vocab::RDFS_COMMENT, RdfLiteral::plain(text.clone()))]);

        let descriptions = LabelAggregator::default().descriptions(&graph, &node);
        let description = &descriptions["en"];
        assert_eq!(description.chars().count(), 250);
        assert_eq!(&description[..247], &text[..247]);
        assert!(description.ends_with("..."));
    }

    #[test]
    fn test_short_description_untouched() {
        let node = RdfNode::iri("http://x/A");
        let text = "y".repeat(250);
        let graph = graph_with(&node, vec![(vocab::RDFS_COMMENT, RdfLiteral::plain(text.clone()))]);

        let descriptions = LabelAggregator::default().descriptions(&graph, &node);
        assert_eq!(descriptions["en"], text);
    }

    #[test]
    fn test_no_literals_no_labels() {
        let node = RdfNode::iri("http://x/A");
        let graph = OntologyGraph::new();
        assert!(LabelAggregator::default().labels(&graph, &node).is_empty());
    }
}
