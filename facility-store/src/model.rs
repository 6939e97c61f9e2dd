use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single facility document as stored by the ingestion pipeline.
///
/// Field names follow the stored document, so the same names appear in API
/// responses. Every field is optional because upstream sources are uneven.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    /// Document identifier; ObjectIds are rendered as 24-character hex
    #[serde(
        rename = "_id",
        default,
        deserialize_with = "lenient::identifier",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    /// FRS identifier
    #[serde(
        rename = "FRS_ID",
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub frs_id: Option<String>,

    #[serde(
        rename = "FacilityName",
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,

    #[serde(
        rename = "City",
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub city: Option<String>,

    #[serde(
        rename = "State",
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub state: Option<String>,

    #[serde(
        rename = "Zip",
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub zip: Option<String>,

    #[serde(
        rename = "County",
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub county: Option<String>,

    #[serde(
        rename = "Latitude",
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub latitude: Option<f64>,

    #[serde(
        rename = "Longitude",
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub longitude: Option<f64>,

    /// Standard Industrial Classification code
    #[serde(
        rename = "SIC",
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub sic: Option<String>,

    /// North American Industry Classification System code
    #[serde(
        rename = "NAICS",
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub naics: Option<String>,

    /// Source specific fields passed through untouched
    #[serde(
        rename = "facilityData",
        default,
        deserialize_with = "lenient::map"
    )]
    pub facility_data: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<FacilitySource>,

    #[serde(
        rename = "createdAt",
        default,
        deserialize_with = "stored_datetime::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(
        rename = "updatedAt",
        default,
        deserialize_with = "stored_datetime::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Where the ingestion process fetched a record from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacilitySource {
    /// Upstream program, e.g. `cwa`, `air` or `rcra`
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_type: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub folder: Option<String>,

    #[serde(
        rename = "fetchedAt",
        default,
        deserialize_with = "stored_datetime::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub fetched_at: Option<DateTime<Utc>>,

    #[serde(
        rename = "queryParams",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub query_params: Option<Value>,
}

impl Facility {
    /// Looks up a string value at the top level of the extension payload
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.facility_data.get(key).and_then(Value::as_str)
    }
}

/// Deserializers that accept whatever scalar the ingestion process wrote.
///
/// A single record with a numeric ZIP must not fail a whole page.
mod lenient {
    use bson::Bson;
    use serde::{Deserialize, Deserializer};
    use serde_json::{Map, Value};

    pub fn identifier<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(match Option::<Bson>::deserialize(deserializer)? {
            Some(Bson::ObjectId(id)) => Some(id.to_hex()),
            Some(Bson::String(s)) => Some(s),
            Some(Bson::Int32(n)) => Some(n.to_string()),
            Some(Bson::Int64(n)) => Some(n.to_string()),
            Some(Bson::Double(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            _ => None,
        })
    }

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn map<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Map<String, Value>, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        })
    }
}

mod stored_datetime {
    use bson::Bson;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Ok(match Option::<Bson>::deserialize(deserializer)? {
            Some(Bson::DateTime(dt)) => Some(dt.to_chrono()),
            Some(Bson::String(s)) => DateTime::parse_from_rfc3339(&s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            Some(Bson::Int64(millis)) => DateTime::from_timestamp_millis(millis),
            _ => None,
        })
    }
}
