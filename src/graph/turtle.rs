//! Turtle loading
//!
//! Parsing is delegated to `sophia`; this module only converts sophia terms into
//! the crate's own [`RdfNode`] / [`RdfObject`] model.

use std::path::Path;
use std::time::Duration;

use sophia::api::prelude::*;
use sophia::api::term::TermKind;
use sophia::turtle::parser::turtle;

use super::{GraphError, OntologyGraph, RdfLiteral, RdfNode, RdfObject, RdfStatement};

/// Where an ontology is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OntologySource {
    File(std::path::PathBuf),
    Url(String),
}

impl OntologySource {
    /// Interpret a CLI/config value as a URL or a local path
    pub fn parse(input: &str) -> Self {
        if input.starts_with("http://") || input.starts_with("https://") {
            Self::Url(input.to_string())
        } else {
            Self::File(input.into())
        }
    }

    /// Pick `primary` if it is a remote URL or an existing file, otherwise `fallback`
    pub fn with_fallback(primary: &str, fallback: Option<&str>) -> Self {
        let source = Self::parse(primary);
        match (&source, fallback) {
            (Self::File(path), Some(fallback)) if !path.exists() => {
                tracing::info!(
                    missing = %path.display(),
                    fallback = %fallback,
                    "Local ontology not found, using fallback"
                );
                Self::parse(fallback)
            }
            _ => source,
        }
    }
}

impl std::fmt::Display for OntologySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Parse a Turtle document held in memory
pub fn parse_turtle_str(text: &str, source_name: &str) -> Result<OntologyGraph, GraphError> {
    let mut graph = OntologyGraph::new();

    turtle::parse_str(text)
        .for_each_triple(|t| {
            if let Some(statement) = convert_triple(&t) {
                graph.insert(statement);
            }
        })
        .map_err(|e| GraphError::Parse {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        })?;

    Ok(graph)
}

/// Read and parse a local Turtle file
pub fn load_turtle_file(path: &Path) -> Result<OntologyGraph, GraphError> {
    let text = std::fs::read_to_string(path).map_err(|source| GraphError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_turtle_str(&text, &path.display().to_string())
}

/// Load an ontology from a file or URL
pub async fn load_source(
    source: &OntologySource,
    timeout: Duration,
) -> Result<OntologyGraph, GraphError> {
    let graph = match source {
        OntologySource::File(path) => load_turtle_file(path)?,
        OntologySource::Url(url) => {
            let text = download(url, timeout).await?;
            parse_turtle_str(&text, url)?
        }
    };

    tracing::info!(
        source = %source,
        statements = graph.len(),
        subjects = graph.subjects().len(),
        "Ontology loaded"
    );

    Ok(graph)
}

async fn download(url: &str, timeout: Duration) -> Result<String, GraphError> {
    let download_err = |reason: String| GraphError::Download {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| download_err(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| download_err(e.to_string()))?;

    if !response.status().is_success() {
        return Err(download_err(format!("HTTP {}", response.status().as_u16())));
    }

    response.text().await.map_err(|e| download_err(e.to_string()))
}

fn convert_triple<T: Triple>(t: &T) -> Option<RdfStatement> {
    let subject = convert_node(t.s())?;
    let predicate = t.p().iri()?.as_str().to_string();
    let object = match t.o().kind() {
        TermKind::Literal => RdfObject::Literal(convert_literal(t.o())?),
        _ => RdfObject::Node(convert_node(t.o())?),
    };

    Some(RdfStatement {
        subject,
        predicate,
        object,
    })
}

fn convert_node<T: Term>(term: T) -> Option<RdfNode> {
    match term.kind() {
        TermKind::Iri => term.iri().map(|iri| RdfNode::Iri(iri.as_str().to_string())),
        TermKind::BlankNode => term
            .bnode_id()
            .map(|id| RdfNode::Blank(id.as_str().to_string())),
        _ => None,
    }
}

fn convert_literal<T: Term>(term: T) -> Option<RdfLiteral> {
    let value = term.lexical_form()?.to_string();
    let language = term.language_tag().map(|tag| tag.as_str().to_string());
    let datatype = term.datatype().map(|dt| dt.as_str().to_string());

    Some(RdfLiteral {
        value,
        language,
        datatype,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::vocab;

    const SAMPLE: &str = r#"
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix ex: <http://example.org/ont#> .

ex:Module a owl:Class ;
    rdfs:label "Module"@en, "Modul"@de ;
    rdfs:comment "A hardware module" .

ex:hasPart a owl:ObjectProperty ;
    rdfs:domain [ a owl:Restriction ] .
"#;

    #[test]
    fn test_parse_turtle_str() {
        let graph = parse_turtle_str(SAMPLE, "sample").unwrap();
        let module = RdfNode::iri("http://example.org/ont#Module");

        assert_eq!(graph.types_of(&module), vec![vocab::OWL_CLASS]);

        let labels: Vec<_> = graph
            .objects(&module, vocab::RDFS_LABEL)
            .filter_map(RdfObject::as_literal)
            .map(|lit| (lit.value.as_str(), lit.language.as_deref()))
            .collect();
        assert!(labels.contains(&("Module", Some("en"))));
        assert!(labels.contains(&("Modul", Some("de"))));

        let comment = graph
            .objects(&module, vocab::RDFS_COMMENT)
            .find_map(RdfObject::as_literal)
            .unwrap();
        assert_eq!(comment.language, None);
    }

    #[test]
    fn test_parse_blank_nodes() {
        let graph = parse_turtle_str(SAMPLE, "sample").unwrap();
        assert!(graph.subjects().iter().any(RdfNode::is_blank));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_turtle_str("this is not turtle", "broken").unwrap_err();
        assert!(matches!(err, GraphError::Parse { .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_source_parse() {
        assert_eq!(
            OntologySource::parse("https://example.org/o.ttl"),
            OntologySource::Url("https://example.org/o.ttl".to_string())
        );
        assert!(matches!(OntologySource::parse("o.ttl"), OntologySource::File(_)));
    }

    #[test]
    fn test_source_fallback() {
        let source = OntologySource::with_fallback(
            "/definitely/missing/ontology.ttl",
            Some("https://example.org/o.ttl"),
        );
        assert!(matches!(source, OntologySource::Url(_)));
    }
}
