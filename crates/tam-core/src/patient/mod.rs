//! Patient profile domain model.

mod model;

pub use model::{FIRST_NAME_FIELD, LAST_NAME_FIELD, PatientId, PatientProfile};
