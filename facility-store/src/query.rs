//! Translation of a [`FacilityFilters`] set into a typed [`Predicate`].
//!
//! The predicate renders to a MongoDB filter document for the real store and
//! can also be evaluated directly against a [`Facility`], which is how the
//! in-memory store answers queries.

use crate::filters::FacilityFilters;
use crate::model::Facility;
use bson::{Bson, Document, doc};

/// A location inside a facility record that filters can target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FacilityId,
    Name,
    City,
    State,
    Zip,
    Sic,
    Naics,
    SourceType,
    /// `FacilityName` inside the extension payload
    PayloadName,
    /// `facilityName` inside the extension payload
    PayloadNameLowerCamel,
}

impl Field {
    /// Dotted document path of the field in the store
    pub fn path(self) -> &'static str {
        match self {
            Field::FacilityId => "FRS_ID",
            Field::Name => "FacilityName",
            Field::City => "City",
            Field::State => "State",
            Field::Zip => "Zip",
            Field::Sic => "SIC",
            Field::Naics => "NAICS",
            Field::SourceType => "source.type",
            Field::PayloadName => "facilityData.FacilityName",
            Field::PayloadNameLowerCamel => "facilityData.facilityName",
        }
    }

    /// Reads the field's text value from a record
    pub fn value_in(self, facility: &Facility) -> Option<&str> {
        match self {
            Field::FacilityId => facility.frs_id.as_deref(),
            Field::Name => facility.name.as_deref(),
            Field::City => facility.city.as_deref(),
            Field::State => facility.state.as_deref(),
            Field::Zip => facility.zip.as_deref(),
            Field::Sic => facility.sic.as_deref(),
            Field::Naics => facility.naics.as_deref(),
            Field::SourceType => facility
                .source
                .as_ref()
                .and_then(|source| source.source_type.as_deref()),
            Field::PayloadName => facility.payload_str("FacilityName"),
            Field::PayloadNameLowerCamel => facility.payload_str("facilityName"),
        }
    }
}

/// Matching conditions for a facility query
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Every child must match. An empty list matches everything.
    All(Vec<Predicate>),
    /// At least one child must match. An empty list matches nothing.
    Any(Vec<Predicate>),
    /// Case-insensitive substring match
    Contains { field: Field, needle: String },
    /// Exact match
    Equals { field: Field, value: String },
}

impl Predicate {
    /// A predicate that matches every record
    pub fn everything() -> Self {
        Predicate::All(Vec::new())
    }

    pub fn contains(field: Field, needle: impl Into<String>) -> Self {
        Predicate::Contains {
            field,
            needle: needle.into(),
        }
    }

    pub fn equals(field: Field, value: impl Into<String>) -> Self {
        Predicate::Equals {
            field,
            value: value.into(),
        }
    }

    /// Lookup used by the single-record endpoint: an exact identifier match
    /// or a name containing the given text.
    pub fn by_identifier(id: &str) -> Self {
        Predicate::Any(vec![
            Predicate::equals(Field::FacilityId, id),
            Predicate::contains(Field::Name, id),
        ])
    }

    /// Renders the predicate as a MongoDB filter document
    pub fn to_document(&self) -> Document {
        match self {
            Predicate::All(children) => {
                let rendered: Vec<Document> = children.iter().map(Self::to_document).collect();
                let mut merged = Document::new();
                let mut collided = false;
                for (key, value) in rendered.iter().flat_map(|document| document.iter()) {
                    if merged.contains_key(key) {
                        collided = true;
                        break;
                    }
                    merged.insert(key.clone(), value.clone());
                }
                if collided {
                    doc! { "$and": rendered }
                } else {
                    merged
                }
            }
            Predicate::Any(children) if children.is_empty() => doc! { "$expr": false },
            Predicate::Any(children) => {
                let rendered: Vec<Document> = children.iter().map(Self::to_document).collect();
                doc! { "$or": rendered }
            }
            Predicate::Contains { field, needle } => doc! {
                (field.path()): {
                    "$regex": regex::escape(needle),
                    "$options": "i",
                }
            },
            Predicate::Equals { field, value } => doc! { (field.path()): Bson::String(value.clone()) },
        }
    }

    /// Evaluates the predicate against a record
    pub fn matches(&self, facility: &Facility) -> bool {
        match self {
            Predicate::All(children) => children.iter().all(|child| child.matches(facility)),
            Predicate::Any(children) => children.iter().any(|child| child.matches(facility)),
            Predicate::Contains { field, needle } => field
                .value_in(facility)
                .is_some_and(|value| value.to_lowercase().contains(&needle.to_lowercase())),
            Predicate::Equals { field, value } => field.value_in(facility) == Some(value.as_str()),
        }
    }
}

/// Builds the predicate for a filter set. Absent filters contribute nothing.
pub fn build_predicate(filters: &FacilityFilters) -> Predicate {
    let mut conditions = Vec::new();

    if let Some(state) = &filters.state {
        conditions.push(Predicate::contains(Field::State, state.to_uppercase()));
    }
    if let Some(city) = &filters.city {
        conditions.push(Predicate::contains(Field::City, city));
    }
    if let Some(zip) = &filters.zip {
        conditions.push(Predicate::equals(Field::Zip, zip));
    }
    if let Some(sic) = &filters.sic {
        conditions.push(Predicate::contains(Field::Sic, sic));
    }
    if let Some(naics) = &filters.naics {
        conditions.push(Predicate::contains(Field::Naics, naics));
    }
    if let Some(fragment) = &filters.facility_id_fragment {
        conditions.push(Predicate::contains(Field::FacilityId, fragment));
    }
    if let Some(fragment) = &filters.name_fragment {
        conditions.push(Predicate::Any(vec![
            Predicate::contains(Field::Name, fragment),
            Predicate::contains(Field::PayloadName, fragment),
            Predicate::contains(Field::PayloadNameLowerCamel, fragment),
        ]));
    }
    if let Some(source_type) = &filters.source_type {
        conditions.push(Predicate::equals(Field::SourceType, source_type.to_lowercase()));
    }

    Predicate::All(conditions)
}
