use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Standalone availability row. Matched to doctors by name text only,
/// not by foreign key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorSchedule {
    pub id: i64,
    pub name: String,
    pub specialization: String,
    pub image_filename: Option<String>,
    pub contact_number: Option<String>,
    pub day_of_week: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub specific_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct ScheduleFields {
    pub name: String,
    pub specialization: String,
    pub day_of_week: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub specific_date: Option<NaiveDate>,
    pub contact_number: Option<String>,
}

/// Partial update: `None` leaves the stored value unchanged.
/// `specific_date: Some(None)` clears the date.
#[derive(Debug, Clone, Default)]
pub struct ScheduleUpdate {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub day_of_week: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub is_available: Option<bool>,
    pub specific_date: Option<Option<NaiveDate>>,
    pub contact_number: Option<String>,
}
