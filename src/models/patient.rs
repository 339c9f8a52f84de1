use serde::{Deserialize, Serialize};

use super::enums::FeeStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub contact: String,
    pub fee_status: FeeStatus,
    pub visit_id: i64,
    pub serial_no: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub contact: String,
    #[serde(default)]
    pub fee_status: FeeStatus,
}

/// Partial update: only fields explicitly supplied are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub fee_status: Option<FeeStatus>,
}
