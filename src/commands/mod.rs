pub mod classify;
pub mod links;
pub mod migrate;

// Re-export command functions for convenience
pub use classify::classify;
pub use links::links;
pub use migrate::{migrate, MigrateParams};

use ont2wb::config::Config;
use ont2wb::error::{Error, Ont2WbError};
use ont2wb::graph::turtle::OntologySource;

/// Ontology source from an explicit `--input`, or the configured input with its fallback
pub(crate) fn ontology_source(config: &Config, input: Option<&str>) -> OntologySource {
    match input {
        Some(input) => OntologySource::parse(input),
        None => OntologySource::with_fallback(
            &config.migration.input,
            config.migration.fallback_input.as_deref(),
        ),
    }
}

/// Log a library failure with its category and hand it to anyhow with `context`
pub(crate) fn failure(err: impl Into<Error>, context: String) -> anyhow::Error {
    let err = err.into();
    tracing::error!(category = %err.category(), error = %err, "{context}");
    anyhow::Error::new(err).context(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ont2wb::error::ErrorCategory;
    use ont2wb::links::LinkError;

    #[test]
    fn test_failure_keeps_library_error() {
        let err = failure(
            LinkError::Missing {
                node: "http://x/A".into(),
            },
            "Failed to read link store".to_string(),
        );

        assert_eq!(err.to_string(), "Failed to read link store");
        let inner = err.downcast_ref::<Error>().unwrap();
        assert_eq!(inner.category(), ErrorCategory::Resolution);
    }
}
