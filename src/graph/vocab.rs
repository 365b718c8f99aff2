//! IRIs of the vocabularies the migration understands

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
pub const RDFS_DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
pub const RDFS_SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
pub const RDFS_SUB_PROPERTY_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subPropertyOf";

pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
pub const OWL_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
pub const OWL_DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
pub const OWL_ONTOLOGY: &str = "http://www.w3.org/2002/07/owl#Ontology";
pub const OWL_CARDINALITY: &str = "http://www.w3.org/2002/07/owl#cardinality";
pub const OWL_MAX_CARDINALITY: &str = "http://www.w3.org/2002/07/owl#maxCardinality";
pub const OWL_MIN_CARDINALITY: &str = "http://www.w3.org/2002/07/owl#minCardinality";

pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
pub const SKOS_DEFINITION: &str = "http://www.w3.org/2004/02/skos/core#definition";

pub const DCTERMS_TITLE: &str = "http://purl.org/dc/terms/title";
pub const DCTERMS_DESCRIPTION: &str = "http://purl.org/dc/terms/description";
pub const DC_TITLE: &str = "http://purl.org/dc/elements/1.1/title";
pub const DC_DESCRIPTION: &str = "http://purl.org/dc/elements/1.1/description";

pub const XSD_ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";

pub const SCHEMA: &str = "http://schema.org/";
pub const SCHEMA_IDENTIFIER: &str = "http://schema.org/identifier";

pub const OBO: &str = "http://purl.obolibrary.org/obo/";

/// Label predicates, highest priority first
pub const LABEL_PREDICATES: &[&str] = &[RDFS_LABEL, SKOS_PREF_LABEL, DCTERMS_TITLE, DC_TITLE];

/// Description predicates, highest priority first
pub const DESCRIPTION_PREDICATES: &[&str] = &[
    RDFS_COMMENT,
    SKOS_DEFINITION,
    DCTERMS_DESCRIPTION,
    DC_DESCRIPTION,
];
