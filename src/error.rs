//! Unified error handling for the ont2wb crate
//!
//! Each layer has its own error enum; this module wraps them into a single
//! [`Error`] and classifies them for reporting.
//!
//! - [`Ont2WbError`] - Common interface implemented by all error types
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors
//!
//! # Usage
//!
//! ```rust,ignore
//! use ont2wb::error::{Error, Ont2WbError};
//!
//! fn report(err: &Error) {
//!     eprintln!("{} error: {err}", err.category());
//! }
//! ```

use std::fmt;
use thiserror::Error;

pub use crate::graph::GraphError;
pub use crate::links::LinkError;
pub use crate::migrate::MigrationError;
pub use crate::wikibase::WikibaseError;

/// Common trait for all ont2wb error types
pub trait Ont2WbError: std::error::Error {
    /// Whether the migration can carry on after this error
    ///
    /// Only a single naming collision qualifies: the clear-and-recreate
    /// protocol takes over the existing entity.
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Transport errors and non-2xx responses
    Network,
    /// Rejections reported by the wiki's API
    Remote,
    /// Login and token failures
    Auth,
    /// Malformed ontology, link file or API payload
    Parsing,
    /// Nodes that cannot be classified or resolved
    Resolution,
    /// Link store and other file I/O
    Storage,
    /// Configuration and validation errors
    Config,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Network => "network",
            Self::Remote => "remote",
            Self::Auth => "authentication",
            Self::Parsing => "parsing",
            Self::Resolution => "resolution",
            Self::Storage => "storage",
            Self::Config => "configuration",
        };
        f.write_str(name)
    }
}

impl Ont2WbError for WikibaseError {
    fn is_recoverable(&self) -> bool {
        self.is_collision()
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Http(_) | Self::Status { .. } => ErrorCategory::Network,
            Self::Api { .. } | Self::Collision { .. } | Self::RepeatedCollision { .. } => {
                ErrorCategory::Remote
            }
            Self::Login { .. } | Self::Token { .. } => ErrorCategory::Auth,
            Self::InvalidResponse(_) | Self::InvalidEntityId(_) => ErrorCategory::Parsing,
        }
    }
}

impl Ont2WbError for GraphError {
    fn is_recoverable(&self) -> bool {
        false
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Parse { .. } => ErrorCategory::Parsing,
            Self::Read { .. } => ErrorCategory::Storage,
            Self::Download { .. } => ErrorCategory::Network,
        }
    }
}

impl Ont2WbError for LinkError {
    fn is_recoverable(&self) -> bool {
        false
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Missing { .. } | Self::Duplicate { .. } | Self::BlankNode { .. } => {
                ErrorCategory::Resolution
            }
            Self::Load { .. } => ErrorCategory::Parsing,
            Self::Encode { .. } | Self::Save { .. } => ErrorCategory::Storage,
        }
    }
}

impl Ont2WbError for MigrationError {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Wikibase(e) => e.is_recoverable(),
            _ => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Classification { .. } => ErrorCategory::Resolution,
            Self::Link(e) => e.category(),
            Self::Wikibase(e) => e.category(),
            Self::Graph(e) => e.category(),
            Self::InvalidConfig { .. } => ErrorCategory::Config,
        }
    }
}

/// Unified error type for the ont2wb crate
#[derive(Error, Debug)]
pub enum Error {
    /// Migration engine errors
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),

    /// Link store errors
    #[error("Link store error: {0}")]
    Link(#[from] LinkError),

    /// Wikibase API errors
    #[error("Wikibase error: {0}")]
    Wikibase(#[from] WikibaseError),

    /// Ontology loading errors
    #[error("Ontology error: {0}")]
    Graph(#[from] GraphError),
}

impl Ont2WbError for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Migration(e) => e.is_recoverable(),
            Self::Link(e) => e.is_recoverable(),
            Self::Wikibase(e) => e.is_recoverable(),
            Self::Graph(e) => e.is_recoverable(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Migration(e) => e.category(),
            Self::Link(e) => e.category(),
            Self::Wikibase(e) => e.category(),
            Self::Graph(e) => e.category(),
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
