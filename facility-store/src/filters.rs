use serde::{Deserialize, Serialize};

/// Optional constraints a caller can put on a facility listing.
///
/// Serialized with the names callers use on the query string, so the set can
/// be echoed back verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naics: Option<String>,
    /// Fragment of the FRS identifier
    #[serde(rename = "frsId", default, skip_serializing_if = "Option::is_none")]
    pub facility_id_fragment: Option<String>,
    /// Fragment of the facility name
    #[serde(rename = "name", default, skip_serializing_if = "Option::is_none")]
    pub name_fragment: Option<String>,
    /// Upstream program the record came from
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
}

impl FacilityFilters {
    /// Builds a filter set from raw query pairs.
    ///
    /// Unknown names and blank values are ignored. A name given more than
    /// once with a non-blank value is not a single string, so that filter is
    /// treated as absent.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filters = Self::default();
        let mut repeated = Vec::new();
        for (name, value) in pairs {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let Some(slot) = filters.slot_mut(name) else {
                continue;
            };
            if slot.is_none() {
                *slot = Some(value.to_string());
            } else {
                repeated.push(name);
            }
        }
        for name in repeated {
            if let Some(slot) = filters.slot_mut(name) {
                *slot = None;
            }
        }
        filters
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
        Some(match name {
            "state" => &mut self.state,
            "city" => &mut self.city,
            "zip" => &mut self.zip,
            "sic" => &mut self.sic,
            "naics" => &mut self.naics,
            "frsId" => &mut self.facility_id_fragment,
            "name" => &mut self.name_fragment,
            "type" => &mut self.source_type,
            _ => return None,
        })
    }

    /// Returns true when no filter is present
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
