//! Well-known predicates seeded before the first run
//!
//! The ontology reuses a handful of terms from RDFS, schema.org and OBO without
//! declaring them. They are created up front so that claims using them resolve
//! like any other property. Each entry names its Wikidata counterpart, which ends
//! up in the entity description.

use crate::links::LinkStore;
use crate::wikibase::{EntityClient, EntityData, EntityKind, LanguageMap, PropertyDatatype};

use super::create::create_or_recreate;
use super::error::MigrationResult;

/// What a bootstrap entry turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapKind {
    Property(PropertyDatatype),
    /// A referenced individual rather than a predicate
    Item,
}

impl BootstrapKind {
    pub fn entity_kind(&self) -> EntityKind {
        match self {
            Self::Property(_) => EntityKind::Property,
            Self::Item => EntityKind::Item,
        }
    }
}

/// One pre-seeded term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapEntry {
    pub iri: &'static str,
    pub label: &'static str,
    pub kind: BootstrapKind,
    /// Wikidata identifier of the same concept
    pub wikidata: &'static str,
}

impl BootstrapEntry {
    const fn property(
        iri: &'static str,
        label: &'static str,
        datatype: PropertyDatatype,
        wikidata: &'static str,
    ) -> Self {
        Self {
            iri,
            label,
            kind: BootstrapKind::Property(datatype),
            wikidata,
        }
    }

    /// Link to the Wikidata counterpart
    pub fn wikidata_url(&self) -> String {
        let page = if self.wikidata.starts_with('P') {
            "Property:"
        } else {
            ""
        };
        format!("https://www.wikidata.org/wiki/{page}{}", self.wikidata)
    }

    /// Entity payload with label and description in `language`
    pub fn entity_data(&self, language: &str) -> EntityData {
        let mut labels = LanguageMap::new();
        labels.insert(language.to_string(), self.label.to_string());

        let mut descriptions = LanguageMap::new();
        descriptions.insert(
            language.to_string(),
            format!("Equivalent of {} ({})", self.wikidata, self.wikidata_url()),
        );

        let data = EntityData::new(&labels, &descriptions);
        match self.kind {
            BootstrapKind::Property(datatype) => data.with_datatype(datatype),
            BootstrapKind::Item => data,
        }
    }
}

/// Terms created before the main pass, in creation order
pub const BOOTSTRAP_TABLE: &[BootstrapEntry] = &[
    BootstrapEntry::property(
        "http://www.w3.org/2000/01/rdf-schema#subClassOf",
        "subclass of",
        PropertyDatatype::WikibaseItem,
        "P279",
    ),
    BootstrapEntry::property(
        "http://www.w3.org/2000/01/rdf-schema#subPropertyOf",
        "subproperty of",
        PropertyDatatype::WikibaseProperty,
        "P1647",
    ),
    BootstrapEntry::property(
        "http://schema.org/inLanguage",
        "language of work or name",
        PropertyDatatype::String,
        "P305",
    ),
    BootstrapEntry::property(
        "http://schema.org/version",
        "software version identifier",
        PropertyDatatype::String,
        "P348",
    ),
    BootstrapEntry::property(
        "http://schema.org/isBasedOn",
        "based on",
        PropertyDatatype::WikibaseItem,
        "P144",
    ),
    BootstrapEntry::property(
        "http://schema.org/copyrightHolder",
        "copyright holder",
        PropertyDatatype::WikibaseItem,
        "P3931",
    ),
    BootstrapEntry::property(
        "http://schema.org/licenseDeclared",
        "copyright license",
        PropertyDatatype::WikibaseItem,
        "P2479",
    ),
    BootstrapEntry::property(
        "http://schema.org/creativeWorkStatus",
        "version type",
        PropertyDatatype::WikibaseItem,
        "P548",
    ),
    BootstrapEntry::property(
        "http://schema.org/image",
        "image available at URL",
        PropertyDatatype::Url,
        "P4765",
    ),
    BootstrapEntry::property(
        "http://schema.org/hasPart",
        "has part",
        PropertyDatatype::WikibaseItem,
        "P527",
    ),
    BootstrapEntry::property(
        "http://schema.org/codeRepository",
        "source code repository",
        PropertyDatatype::Url,
        "P1324",
    ),
    BootstrapEntry::property(
        "http://schema.org/value",
        "supported metadata",
        PropertyDatatype::String,
        "P8203",
    ),
    BootstrapEntry::property(
        "http://purl.obolibrary.org/obo/BFO_0000016",
        "function",
        PropertyDatatype::String,
        "P7535",
    ),
    BootstrapEntry::property(
        "http://schema.org/amount",
        "quantity",
        PropertyDatatype::String,
        "P1114",
    ),
    BootstrapEntry {
        iri: "http://schema.org/URL",
        label: "URL",
        kind: BootstrapKind::Item,
        wikidata: "Q42253",
    },
];

/// Create and link every table entry not yet in `links`
///
/// Returns the number of entities created.
pub async fn bootstrap(
    links: &mut LinkStore,
    client: &mut dyn EntityClient,
    language: &str,
) -> MigrationResult<usize> {
    let mut created = 0;

    for entry in BOOTSTRAP_TABLE {
        if links.contains(entry.iri) {
            tracing::debug!(node = entry.iri, "Bootstrap entry already linked");
            continue;
        }

        let kind = entry.kind.entity_kind();
        let id = create_or_recreate(client, kind, &entry.entity_data(language)).await?;
        tracing::info!(
            node = entry.iri,
            id = %id,
            wikidata = entry.wikidata,
            "Bootstrapped well-known term"
        );
        links.record(entry.iri, id);
        created += 1;
    }

    Ok(created)
}
