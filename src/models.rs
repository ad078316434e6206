use serde::{Deserialize, Deserializer, Serialize};

/// A town (commune) returned by the town search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Town {
    /// ARCEP internal town identifier.
    pub comid: i64,
    #[serde(default)]
    pub nom: Option<String>,
    /// INSEE code of the commune.
    #[serde(default)]
    pub code_insee: Option<String>,
}

/// A street address candidate, scoped to one town.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Identifier of the building the address belongs to.
    pub immeubleid: i64,
    #[serde(default)]
    pub nom: Option<String>,
}

/// Building record as sent by the API.
///
/// Every field is optional on the wire; [`BuildingRecord::into_building`]
/// enforces the presence of the address code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingRecord {
    /// Usually a string; numeric codes are kept as their decimal text.
    #[serde(default, deserialize_with = "string_or_number")]
    pub code_adr: Option<String>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub nom_commune: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Code>::deserialize(deserializer)? {
        Some(Code::Text(text)) => Some(text),
        // Zero carries no code, same as an empty string
        Some(Code::Number(n)) if n.as_f64() == Some(0.0) => None,
        Some(Code::Number(n)) => Some(n.to_string()),
        None => None,
    })
}

/// A building with a usable address code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Building {
    /// Join key for the eligibility lookup. Never empty.
    pub code_adr: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub nom_commune: Option<String>,
}

impl BuildingRecord {
    /// Returns `None` when the address code is missing or empty.
    pub fn into_building(self) -> Option<Building> {
        let code_adr = self.code_adr.filter(|code| !code.is_empty())?;
        Some(Building {
            code_adr,
            longitude: self.longitude,
            latitude: self.latitude,
            nom_commune: self.nom_commune,
        })
    }
}

/// Arguments of the `get_fixed_line_eligibilities` tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityRequest {
    /// e.g. "10 rue de la Paix"
    pub street_address: String,
    /// e.g. "Paris"
    pub town_name: String,
}
