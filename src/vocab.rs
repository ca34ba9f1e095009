//! Well-known vocabulary terms used by the form language.
//!
//! The `rdf`, `rdfs` and `xsd` namespaces come from `oxigraph::model::vocab`;
//! this module adds the ones oxigraph does not ship.

use oxigraph::model::NamedNodeRef;

/// The form language itself (`http://www.w3.org/ns/ui#`).
pub mod ui {
    use super::NamedNodeRef;

    pub const NS: &str = "http://www.w3.org/ns/ui#";

    // Field types.
    pub const FORM: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#Form");
    pub const GROUP: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#Group");
    pub const OPTIONS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#Options");
    pub const MULTIPLE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#Multiple");
    pub const CHOICE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#Choice");
    pub const CLASSIFIER: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#Classifier");
    pub const BOOLEAN_FIELD: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#BooleanField");
    pub const TRISTATE_FIELD: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#TristateField");
    pub const MULTI_LINE_TEXT_FIELD: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#MultiLineTextField");
    pub const COMMENT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#Comment");
    pub const HEADING: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#Heading");
    pub const AUTOCOMPLETE_FIELD: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#AutocompleteField");

    // Schema edges.
    pub const PARTS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#parts");
    pub const PART: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#part");
    pub const PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#property");
    pub const SEQUENCE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#sequence");
    pub const DEPENDING_ON: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#dependingOn");
    pub const CASE: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#case");
    pub const FOR: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#for");
    pub const USE: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#use");
    pub const ORDERED: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#ordered");
    pub const REVERSE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#reverse");
    pub const MIN: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#min");
    pub const FROM: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#from");
    pub const FOLLOW: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#follow");
    pub const CAN_MINT_NEW: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#canMintNew");
    pub const CATEGORY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#category");
    pub const DEFAULT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#default");
    pub const SUPPRESS_EMPTY_UNEDITABLE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#suppressEmptyUneditable");
    pub const SUPPRESS_IF_UNEDITABLE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#suppressIfUneditable");
    pub const LABEL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#label");
    pub const CONTENTS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#contents");
    pub const STYLE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#style");
    pub const SIZE: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#size");
    pub const MAX_LENGTH: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#maxLength");
    pub const BACKGROUND_COLOR: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#backgroundColor");
    pub const CREATION_FORM: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#creationForm");
    pub const ANNOTATION_FORM: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#annotationForm");

    // Autocomplete data sources.
    pub const DATA_SOURCE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#dataSource");
    pub const TARGET_CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#targetClass");
    pub const LABEL_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#labelProperty");
    pub const ENDPOINT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#endpoint");
    pub const SEARCH_BY_NAME_QUERY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#searchByNameQuery");
    pub const SEARCH_BY_NAME_URI: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#searchByNameURI");
    pub const INSTITUTE_DETAILS_QUERY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/ui#insitituteDetailsQuery");
}

/// OWL terms needed for class catalogs and disjoint unions.
pub mod owl {
    use super::NamedNodeRef;

    pub const CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Class");
    pub const OBJECT_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#ObjectProperty");
    pub const DATATYPE_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#DatatypeProperty");
    pub const DISJOINT_UNION_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#disjointUnionOf");
    pub const SAME_AS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#sameAs");
}

/// schema.org terms used by autocomplete data sources.
pub mod schema {
    use super::NamedNodeRef;

    pub const NAME: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://schema.org/name");
    pub const LOGO: NamedNodeRef<'_> = NamedNodeRef::new_unchecked("http://schema.org/logo");
}

/// Generic descriptive properties offered for every class.
pub mod generic {
    use super::NamedNodeRef;

    pub const DC_TITLE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/elements/1.1/title");
    pub const FOAF_NAME: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://xmlns.com/foaf/0.1/name");
    pub const FOAF_HOMEPAGE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://xmlns.com/foaf/0.1/homepage");
}
