use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub specialization: String,
    pub phone: String,
    pub image_filename: Option<String>,
}

/// Form fields for doctor create/update. The image reference travels
/// separately so a missing upload leaves the stored filename untouched.
#[derive(Debug, Clone)]
pub struct DoctorFields {
    pub name: String,
    pub specialization: String,
    pub phone: String,
}
