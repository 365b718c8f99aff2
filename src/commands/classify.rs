use anyhow::{Context, Result};
use serde::Serialize;

use ont2wb::config::Config;
use ont2wb::graph::turtle::load_source;
use ont2wb::graph::{OntologyGraph, RdfNode};
use ont2wb::migrate::{classify_node, property_datatype, EntityClass, LabelAggregator};
use ont2wb::wikibase::LanguageMap;

/// How one subject would be migrated
#[derive(Debug, Serialize)]
struct ClassifiedSubject {
    node: String,
    class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    datatype: Option<String>,
    labels: LanguageMap,
    descriptions: LanguageMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn classify_subject(
    graph: &OntologyGraph,
    node: &RdfNode,
    aggregator: &LabelAggregator,
    base_uri: Option<&str>,
) -> ClassifiedSubject {
    let (class, error) = match classify_node(graph, node, base_uri) {
        Ok(class) => (Some(class), None),
        Err(err) => (None, Some(err.to_string())),
    };

    let datatype = match class {
        Some(EntityClass::Property) => Some(property_datatype(graph, node).to_string()),
        _ => None,
    };

    ClassifiedSubject {
        node: node.to_string(),
        class: class.map(|c| c.to_string()),
        datatype,
        labels: aggregator.labels(graph, node),
        descriptions: aggregator.descriptions(graph, node),
        error,
    }
}

pub async fn classify(config: Config, input: Option<String>, format: &str) -> Result<()> {
    let source = super::ontology_source(&config, input.as_deref());
    let graph = load_source(&source, config.request_timeout())
        .await
        .map_err(|e| super::failure(e, format!("Failed to load ontology from {source}")))?;

    let aggregator = LabelAggregator::from_config(&config.migration);
    let base_uri = config.migration.base_uri.as_deref();

    let subjects: Vec<ClassifiedSubject> = graph
        .subjects()
        .iter()
        .map(|node| classify_subject(&graph, node, &aggregator, base_uri))
        .collect();

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&subjects)
                .context("Failed to serialize classification")?;
            println!("{json}");
        }
        _ => {
            for subject in &subjects {
                let class = subject.class.as_deref().unwrap_or("ERROR");
                let label = subject
                    .labels
                    .get(&config.migration.default_language)
                    .or_else(|| subject.labels.values().next())
                    .map(String::as_str)
                    .unwrap_or("-");
                match (&subject.datatype, &subject.error) {
                    (_, Some(error)) => println!("{class:<9} {}  {error}", subject.node),
                    (Some(datatype), None) => {
                        println!("{class:<9} {}  \"{label}\" ({datatype})", subject.node)
                    }
                    (None, None) => println!("{class:<9} {}  \"{label}\"", subject.node),
                }
            }
        }
    }

    let failures = subjects.iter().filter(|s| s.error.is_some()).count();
    tracing::info!(
        subjects = subjects.len(),
        unclassified = failures,
        "Classification finished"
    );

    if failures > 0 {
        anyhow::bail!("{failures} subject(s) could not be classified");
    }

    Ok(())
}
