//! Errors reported by the Wikibase API client

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use super::model::{EntityId, EntityKind};

/// Errors that can occur while talking to the Wikibase API
#[derive(Error, Debug)]
pub enum WikibaseError {
    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status from `api.php`
    #[error("Server error: HTTP {status}")]
    Status { status: u16 },

    /// The API answered with an `error` object
    #[error("API error {code}: {info}")]
    Api { code: String, info: String },

    /// An entity with the same label/description already exists
    #[error("{kind} {id} already exists: {info}")]
    Collision {
        kind: EntityKind,
        id: EntityId,
        info: String,
    },

    /// The entity still collided after it was cleared
    #[error("{kind} {id} still collides after being cleared: {info}")]
    RepeatedCollision {
        kind: EntityKind,
        id: EntityId,
        info: String,
    },

    /// Login was rejected
    #[error("Failed to log into Wikibase at {api_url}: {reason}")]
    Login { api_url: String, reason: String },

    /// A token could not be retrieved
    #[error("Failed to get {token_type} token: {reason}")]
    Token { token_type: String, reason: String },

    /// The response did not have the expected shape
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// An identifier string is not of the form `Q123` / `P123`
    #[error("Invalid entity id: '{0}'")]
    InvalidEntityId(String),
}

impl WikibaseError {
    /// Classify an API `error` object for an edit on an entity of `kind`
    ///
    /// MediaWiki reports label/description conflicts with a message such as
    /// `Item [[Item:Q42|Q42]] already has label "Foo" ...`.
    pub fn from_api(kind: EntityKind, code: impl Into<String>, info: impl Into<String>) -> Self {
        let code = code.into();
        let info = info.into();

        if info.contains(" already has ") {
            if let Some(id) = conflicting_id(kind, &info) {
                return Self::Collision { kind, id, info };
            }
        }

        Self::Api { code, info }
    }

    /// Whether the clear-and-recreate protocol can handle this error
    pub fn is_collision(&self) -> bool {
        matches!(self, Self::Collision { .. })
    }
}

/// Extract the bracketed `[[Item:Q123` / `[[Property:P123` reference
pub fn conflicting_id(kind: EntityKind, info: &str) -> Option<EntityId> {
    static ITEM_RE: OnceLock<Regex> = OnceLock::new();
    static PROPERTY_RE: OnceLock<Regex> = OnceLock::new();

    let re = match kind {
        EntityKind::Item => ITEM_RE
            .get_or_init(|| Regex::new(r"\[\[Item:(Q[0-9]+)").expect("Invalid regex pattern")),
        EntityKind::Property => PROPERTY_RE.get_or_init(|| {
            Regex::new(r"\[\[Property:(P[0-9]+)").expect("Invalid regex pattern")
        }),
    };

    re.captures(info)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflicting_id() {
        let info = "Item [[Item:Q42|Q42]] already has label \"Module\" associated with language code en.";
        assert_eq!(conflicting_id(EntityKind::Item, info), Some(EntityId::item(42)));
        assert_eq!(conflicting_id(EntityKind::Property, info), None);

        let info = "Property [[Property:P7|P7]] already has label \"has part\"";
        assert_eq!(
            conflicting_id(EntityKind::Property, info),
            Some(EntityId::property(7))
        );
    }

    #[test]
    fn test_from_api_collision() {
        let err = WikibaseError::from_api(
            EntityKind::Item,
            "modification-failed",
            "Item [[Item:Q42|Q42]] already has label \"Foo\" associated with language code en.",
        );
        assert!(err.is_collision());
    }

    #[test]
    fn test_from_api_other_error_verbatim() {
        let err = WikibaseError::from_api(EntityKind::Item, "badtoken", "Invalid CSRF token.");
        assert!(!err.is_collision());
        assert_eq!(err.to_string(), "API error badtoken: Invalid CSRF token.");
    }

    #[test]
    fn test_from_api_without_reference_is_not_collision() {
        let err = WikibaseError::from_api(
            EntityKind::Item,
            "modification-failed",
            "Something already has a problem",
        );
        assert!(matches!(err, WikibaseError::Api { .. }));
    }
}
