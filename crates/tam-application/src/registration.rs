//! Patient registration.
//!
//! Turns what the user typed into a [`PatientProfile`] and stores it where
//! [`crate::ChatClient::load`] looks for it.

use tam_core::TamError;
use tam_core::error::Result;
use tam_core::patient::{PatientId, PatientProfile};
use tam_core::storage::{ClientStorage, PATIENT_DATA_KEY, PATIENT_ID_KEY};

const MAX_AGE: u64 = 150;

/// Raw registration input, one string per form field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub age: String,
    pub sex: String,
    pub address: String,
    pub contact_number: String,
    pub medical_history: String,
    pub patient_id: String,
}

impl RegistrationForm {
    /// Validates the form and builds the profile to store.
    ///
    /// Names are required; every other field is optional and dropped when
    /// blank.
    pub fn validate(&self) -> Result<(PatientProfile, Option<PatientId>)> {
        let first_name = self.first_name.trim();
        if first_name.is_empty() {
            return Err(TamError::validation("first name", "is required"));
        }
        let last_name = self.last_name.trim();
        if last_name.is_empty() {
            return Err(TamError::validation("last name", "is required"));
        }

        let mut profile = PatientProfile::new(first_name, last_name);
        if let Some(years) = parse_age(&self.age)? {
            profile.set_field("age", years)?;
        }
        let optional_fields = [
            ("sex", &self.sex),
            ("address", &self.address),
            ("contactNumber", &self.contact_number),
            ("medicalHistory", &self.medical_history),
        ];
        for (key, value) in optional_fields {
            if let Some(value) = optional(value) {
                profile.set_field(key, value)?;
            }
        }

        let patient_id = optional(&self.patient_id).map(PatientId::new);
        Ok((profile, patient_id))
    }
}

/// Validates `form` and replaces the stored patient with it.
///
/// A form without a patient id removes any id left from a previous patient.
pub fn register_patient(storage: &dyn ClientStorage, form: &RegistrationForm) -> Result<PatientProfile> {
    let (profile, patient_id) = form.validate()?;

    storage.set_item(PATIENT_DATA_KEY, &profile.to_json()?)?;
    match &patient_id {
        Some(id) => storage.set_item(PATIENT_ID_KEY, id.as_str())?,
        None => storage.remove_item(PATIENT_ID_KEY)?,
    }

    tracing::info!(has_patient_id = patient_id.is_some(), "Patient registered");
    Ok(profile)
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_age(value: &str) -> Result<Option<u64>> {
    let Some(raw) = optional(value) else {
        return Ok(None);
    };

    let years: u64 = raw
        .parse()
        .map_err(|_| TamError::validation("age", "must be a whole number"))?;
    if years > MAX_AGE {
        return Err(TamError::validation(
            "age",
            format!("must be at most {}", MAX_AGE),
        ));
    }
    Ok(Some(years))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tam_core::storage::InMemoryStorage;

    fn form() -> RegistrationForm {
        RegistrationForm {
            first_name: " Maria ".to_string(),
            last_name: "Santos".to_string(),
            age: "34".to_string(),
            sex: "Female".to_string(),
            medical_history: "Asthma".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_builds_profile() {
        let (profile, patient_id) = form().validate().unwrap();

        assert_eq!(profile.first_name(), "Maria");
        assert_eq!(profile.field("age"), Some(&serde_json::json!(34)));
        assert_eq!(profile.field("medicalHistory"), Some(&serde_json::json!("Asthma")));
        assert!(profile.field("address").is_none());
        assert!(patient_id.is_none());
    }

    #[test]
    fn test_names_are_required() {
        let mut missing_first = form();
        missing_first.first_name = "  ".to_string();
        assert_eq!(
            missing_first.validate().unwrap_err(),
            TamError::validation("first name", "is required")
        );

        let mut missing_last = form();
        missing_last.last_name.clear();
        assert!(missing_last.validate().is_err());
    }

    #[test]
    fn test_age_must_be_a_plausible_number() {
        let mut words = form();
        words.age = "thirty".to_string();
        assert!(words.validate().is_err());

        let mut too_old = form();
        too_old.age = "151".to_string();
        assert!(too_old.validate().is_err());

        let mut blank = form();
        blank.age = " ".to_string();
        assert!(blank.validate().unwrap().0.field("age").is_none());
    }

    #[test]
    fn test_register_stores_profile_and_id() {
        let storage = InMemoryStorage::new();
        let mut with_id = form();
        with_id.patient_id = "42".to_string();

        register_patient(&storage, &with_id).unwrap();

        let stored = storage.get_item(PATIENT_DATA_KEY).unwrap().unwrap();
        assert_eq!(PatientProfile::from_json(&stored).unwrap().first_name(), "Maria");
        assert_eq!(storage.get_item(PATIENT_ID_KEY).unwrap().as_deref(), Some("42"));
    }

    #[test]
    fn test_register_without_id_clears_previous_id() {
        let storage = InMemoryStorage::new();
        storage.set_item(PATIENT_ID_KEY, "old").unwrap();

        register_patient(&storage, &form()).unwrap();

        assert!(storage.get_item(PATIENT_ID_KEY).unwrap().is_none());
    }

    #[test]
    fn test_invalid_form_stores_nothing() {
        let storage = InMemoryStorage::new();
        let mut invalid = form();
        invalid.first_name.clear();

        assert!(register_patient(&storage, &invalid).is_err());
        assert!(storage.get_item(PATIENT_DATA_KEY).unwrap().is_none());
    }
}
