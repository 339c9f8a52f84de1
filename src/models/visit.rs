use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visit {
    pub id: i64,
    pub date: NaiveDate,
    pub doctor_id: i64,
}

/// Read-time projection of a visit with its patient count.
/// `total_patients` is computed at fetch, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct VisitSummary {
    pub id: i64,
    pub date: NaiveDate,
    pub doctor_id: i64,
    #[serde(rename = "totalPatients")]
    pub total_patients: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewVisit {
    pub date: NaiveDate,
}
