//! Request handlers, one module per resource.
//!
//! Handlers parse input, call the repository / identity resolver / image
//! store, and map absence to 404. Shared multipart plumbing lives here.

pub mod doctors;
pub mod gallery;
pub mod patients;
pub mod schedules;
pub mod visits;

use std::collections::HashMap;

use axum::extract::Multipart;
use chrono::{NaiveDate, NaiveTime};

use crate::api::error::ApiError;

/// A file part pulled out of a multipart form.
pub(crate) struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Collected multipart form: text fields by name plus the optional `image`
/// file part.
pub(crate) struct Form {
    fields: HashMap<String, String>,
    pub image: Option<UploadedFile>,
}

impl Form {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut fields = HashMap::new();
        let mut image = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
        {
            let name = field.name().unwrap_or("").to_string();
            if name == "image" {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file data: {e}")))?;
                // Browsers send an empty file part when nothing was selected
                if !bytes.is_empty() {
                    image = Some(UploadedFile {
                        filename,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read field: {e}")))?;
                fields.insert(name, value);
            }
        }

        Ok(Self { fields, image })
    }

    pub fn required(&self, name: &str) -> Result<String, ApiError> {
        self.fields
            .get(name)
            .cloned()
            .ok_or_else(|| ApiError::BadRequest(format!("Missing required field: {name}")))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Parse a wall-clock time from `HH:MM:SS` or `HH:MM`.
pub(crate) fn parse_time(value: &str) -> Result<NaiveTime, ApiError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| ApiError::BadRequest(format!("Invalid time: {value}")))
}

/// Parse an ISO calendar date (`YYYY-MM-DD`).
pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("Invalid date: {value}")))
}

pub(crate) fn parse_bool(value: &str) -> Result<bool, ApiError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ApiError::BadRequest(format!("Invalid boolean: {value}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_time_accepts_both_forms() {
        assert_eq!(
            parse_time("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert_eq!(
            parse_time("09:30:15").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 15).unwrap()
        );
        assert!(parse_time("9am").is_err());
    }

    #[test]
    fn parse_date_is_iso_only() {
        assert!(parse_date("2024-06-07").is_ok());
        assert!(parse_date("07/06/2024").is_err());
    }

    #[test]
    fn parse_bool_variants() {
        assert!(parse_bool("True").unwrap());
        assert!(parse_bool("1").unwrap());
        assert!(!parse_bool("false").unwrap());
        assert!(parse_bool("yes").is_err());
    }
}
