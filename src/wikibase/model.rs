//! Wikibase entity JSON model
//!
//! Only the subset of the Wikibase data model the migration writes:
//! labels, descriptions, property datatypes and single-value statements.
//! See <https://www.mediawiki.org/wiki/Wikibase/DataModel/JSON>.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::WikibaseError;

/// Item or property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Item,
    Property,
}

impl EntityKind {
    /// Identifier prefix (`Q` / `P`)
    pub fn prefix(&self) -> char {
        match self {
            Self::Item => 'Q',
            Self::Property => 'P',
        }
    }

    /// Wiki namespace used in error messages (`[[Item:Q1|...]]`)
    pub fn namespace(&self) -> &'static str {
        match self {
            Self::Item => "Item",
            Self::Property => "Property",
        }
    }

    /// Value of the `new=` parameter of `wbeditentity`
    pub fn api_name(&self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Property => "property",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace())
    }
}

/// Target-system identifier such as `Q42` or `P279`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    kind: EntityKind,
    number: u64,
}

impl EntityId {
    pub fn new(kind: EntityKind, number: u64) -> Self {
        Self { kind, number }
    }

    pub fn item(number: u64) -> Self {
        Self::new(EntityKind::Item, number)
    }

    pub fn property(number: u64) -> Self {
        Self::new(EntityKind::Property, number)
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Numeric suffix (`42` for `Q42`)
    pub fn numeric_id(&self) -> u64 {
        self.number
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.number)
    }
}

impl FromStr for EntityId {
    type Err = WikibaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WikibaseError::InvalidEntityId(s.to_string());
        let s = s.trim();
        let mut chars = s.chars();
        let kind = match chars.next() {
            Some('Q') => EntityKind::Item,
            Some('P') => EntityKind::Property,
            _ => return Err(invalid()),
        };
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let number = digits.parse().map_err(|_| invalid())?;
        Ok(Self { kind, number })
    }
}

impl Serialize for EntityId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Declared value type of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyDatatype {
    String,
    Url,
    WikibaseItem,
    WikibaseProperty,
}

impl PropertyDatatype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Url => "url",
            Self::WikibaseItem => "wikibase-item",
            Self::WikibaseProperty => "wikibase-property",
        }
    }
}

impl fmt::Display for PropertyDatatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{ "language": "en", "value": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonolingualText {
    pub language: String,
    pub value: String,
}

/// Language code -> text
pub type LanguageMap = BTreeMap<String, String>;

/// Property id -> statements
pub type ClaimMap = BTreeMap<String, Vec<Statement>>;

/// Reference to another entity inside a claim value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(rename = "entity-type")]
    pub entity_type: EntityKind,
    pub id: String,
    #[serde(rename = "numeric-id")]
    pub numeric_id: u64,
}

impl From<&EntityId> for EntityRef {
    fn from(id: &EntityId) -> Self {
        Self {
            entity_type: id.kind(),
            id: id.to_string(),
            numeric_id: id.numeric_id(),
        }
    }
}

/// `datavalue` of a snak
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum DataValue {
    #[serde(rename = "string")]
    String(String),
    #[serde(rename = "wikibase-entityid")]
    EntityId(EntityRef),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snak {
    pub snaktype: String,
    pub property: String,
    pub datatype: PropertyDatatype,
    pub datavalue: DataValue,
}

/// A single claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub mainsnak: Snak,
    #[serde(rename = "type")]
    pub statement_type: String,
    pub rank: String,
}

impl Statement {
    /// Build a `value` statement with normal rank
    pub fn new(property: &EntityId, datatype: PropertyDatatype, value: DataValue) -> Self {
        Self {
            mainsnak: Snak {
                snaktype: "value".to_string(),
                property: property.to_string(),
                datatype,
                datavalue: value,
            },
            statement_type: "statement".to_string(),
            rank: "normal".to_string(),
        }
    }

    /// Wrap this statement into a claim map keyed by its property
    pub fn into_claims(self) -> ClaimMap {
        let mut claims = ClaimMap::new();
        claims.insert(self.mainsnak.property.clone(), vec![self]);
        claims
    }
}

/// Payload of `wbeditentity`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityData {
    #[serde(default)]
    pub labels: BTreeMap<String, MonolingualText>,
    #[serde(default)]
    pub descriptions: BTreeMap<String, MonolingualText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<PropertyDatatype>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub claims: ClaimMap,
}

impl EntityData {
    /// Build the payload from language maps
    pub fn new(labels: &LanguageMap, descriptions: &LanguageMap) -> Self {
        let monolingual = |map: &LanguageMap| {
            map.iter()
                .map(|(lang, value)| {
                    (
                        lang.clone(),
                        MonolingualText {
                            language: lang.clone(),
                            value: value.clone(),
                        },
                    )
                })
                .collect()
        };

        Self {
            labels: monolingual(labels),
            descriptions: monolingual(descriptions),
            datatype: None,
            claims: ClaimMap::new(),
        }
    }

    pub fn with_datatype(mut self, datatype: PropertyDatatype) -> Self {
        self.datatype = Some(datatype);
        self
    }

    /// Payload that only carries claims
    pub fn claims_only(claims: ClaimMap) -> Self {
        Self {
            claims,
            ..Self::default()
        }
    }

    /// English label, or the first label in language order
    pub fn display_label(&self) -> Option<&str> {
        self.labels
            .get("en")
            .or_else(|| self.labels.values().next())
            .map(|text| text.value.as_str())
    }
}
