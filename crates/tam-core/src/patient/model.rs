//! PatientProfile domain model.
//!
//! The profile is entered once during registration and then forwarded with
//! every chat request. Apart from the greeting, the client treats it as
//! opaque: unknown fields survive a load/forward cycle untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{Result, TamError};

pub const FIRST_NAME_FIELD: &str = "firstName";
pub const LAST_NAME_FIELD: &str = "lastName";

/// Patient record as stored under the `patientData` key.
///
/// Only `firstName` is interpreted (it must be a string). Every other field
/// keeps whatever JSON shape it was stored with, nulls included, and is
/// forwarded unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct PatientProfile {
    fields: Map<String, Value>,
}

impl PatientProfile {
    /// Creates a profile holding the two name fields.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(FIRST_NAME_FIELD.to_string(), Value::String(first_name.into()));
        fields.insert(LAST_NAME_FIELD.to_string(), Value::String(last_name.into()));
        Self { fields }
    }

    /// Parses a profile from its stored JSON form.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Serializes the profile to the JSON form kept in client storage.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn first_name(&self) -> &str {
        // Checked at construction.
        self.fields
            .get(FIRST_NAME_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Raw value of any stored field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Sets a field other than `firstName`.
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        if key == FIRST_NAME_FIELD {
            return Err(TamError::validation("first name", "is fixed at creation"));
        }
        self.fields.insert(key, value.into());
        Ok(())
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// "First Last", or just the first name when no string last name is stored.
    pub fn full_name(&self) -> String {
        let first = self.first_name().trim();
        match self.field(LAST_NAME_FIELD).and_then(Value::as_str).map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {}", first, last),
            _ => first.to_string(),
        }
    }
}

impl TryFrom<Map<String, Value>> for PatientProfile {
    type Error = TamError;

    fn try_from(fields: Map<String, Value>) -> Result<Self> {
        match fields.get(FIRST_NAME_FIELD) {
            Some(Value::String(_)) => Ok(Self { fields }),
            Some(_) => Err(TamError::validation("first name", "must be a string")),
            None => Err(TamError::validation("first name", "is missing")),
        }
    }
}

impl From<PatientProfile> for Map<String, Value> {
    fn from(profile: PatientProfile) -> Self {
        profile.fields
    }
}

/// Opaque patient identifier issued by the registration backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(String);

impl PatientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn round_trip(raw: &str) -> Value {
        let profile = PatientProfile::from_json(raw).unwrap();
        serde_json::from_str(&profile.to_json().unwrap()).unwrap()
    }

    #[test]
    fn test_parse_browser_profile() {
        let raw = r#"{
            "firstName": "Maria",
            "lastName": "Santos",
            "age": "34",
            "sex": "Female",
            "contactNumber": "0917",
            "medicalHistory": "Asthma"
        }"#;

        let profile = PatientProfile::from_json(raw).unwrap();
        assert_eq!(profile.first_name(), "Maria");
        assert_eq!(profile.full_name(), "Maria Santos");
        assert_eq!(profile.field("age"), Some(&json!("34")));
        assert!(profile.field("address").is_none());
    }

    #[test]
    fn test_any_field_shape_is_accepted() {
        let profile =
            PatientProfile::from_json(r#"{"firstName":"Maria","age":34.5,"contactNumber":9171234567}"#)
                .unwrap();
        assert_eq!(profile.field("age"), Some(&json!(34.5)));
        assert_eq!(profile.field("contactNumber"), Some(&json!(9171234567u64)));
    }

    #[test]
    fn test_forwarded_json_matches_stored_json() {
        let raw = r#"{"firstName":"Maria","age":"34","sex":null,"address":null,"bloodType":"O+"}"#;
        let stored: Value = serde_json::from_str(raw).unwrap();

        assert_eq!(round_trip(raw), stored);
        assert!(round_trip(raw).get("lastName").is_none());
    }

    #[test]
    fn test_first_name_must_be_a_string() {
        let missing = PatientProfile::from_json(r#"{"lastName":"Santos"}"#);
        assert!(missing.unwrap_err().is_serialization());

        let numeric = PatientProfile::from_json(r#"{"firstName":7}"#);
        assert!(numeric.is_err());
    }

    #[test]
    fn test_set_field_cannot_replace_first_name() {
        let mut profile = PatientProfile::new("Jo", "Cruz");
        profile.set_field("age", 7).unwrap();
        assert_eq!(profile.field("age"), Some(&json!(7)));

        assert!(profile.set_field(FIRST_NAME_FIELD, 1).is_err());
        assert_eq!(profile.first_name(), "Jo");
    }

    #[test]
    fn test_full_name_without_last_name() {
        let profile = PatientProfile::new("Jo", "  ");
        assert_eq!(profile.full_name(), "Jo");
        let no_last = PatientProfile::from_json(r#"{"firstName":"Jo","lastName":null}"#).unwrap();
        assert_eq!(no_last.full_name(), "Jo");
    }
}
