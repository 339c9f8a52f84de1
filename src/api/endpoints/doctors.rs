//! Doctor endpoints: CRUD with image upload, image serving, and the
//! per-doctor unique patient count.

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::api::endpoints::Form;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;
use crate::identity;
use crate::models::{Doctor, DoctorFields};
use crate::uploads::ImageCategory;

/// `GET /doctors`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Doctor>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(repository::list_doctors(&conn)?))
}

fn doctor_fields(form: &Form) -> Result<DoctorFields, ApiError> {
    Ok(DoctorFields {
        name: form.required("name")?,
        specialization: form.required("specialization")?,
        phone: form.required("phone")?,
    })
}

/// `POST /doctors` — multipart form with optional image.
pub async fn create(
    State(ctx): State<ApiContext>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Doctor>), ApiError> {
    let form = Form::from_multipart(multipart).await?;
    let fields = doctor_fields(&form)?;

    // File first, then the row: a failed write must not commit a dangling
    // reference.
    let image_filename = match &form.image {
        Some(file) => Some(ctx.images.save(ImageCategory::Doctor, &file.filename, &file.bytes)?),
        None => None,
    };

    let conn = ctx.open_db()?;
    let doctor = match repository::insert_doctor(&conn, &fields, image_filename.as_deref()) {
        Ok(doctor) => doctor,
        Err(e) => {
            if let Some(filename) = &image_filename {
                ctx.images.remove(ImageCategory::Doctor, filename);
            }
            return Err(e.into());
        }
    };

    Ok((StatusCode::CREATED, Json(doctor)))
}

/// `PUT /doctors/:id` — full field replacement; image only replaced when a
/// new upload is present. The old file is removed only after the row points
/// at the new one.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<Doctor>, ApiError> {
    let form = Form::from_multipart(multipart).await?;
    let fields = doctor_fields(&form)?;

    let conn = ctx.open_db()?;
    let existing = repository::get_doctor(&conn, id)?
        .ok_or_else(|| ApiError::NotFound("Doctor not found".into()))?;

    let new_image = match &form.image {
        Some(file) => Some(ctx.images.save(ImageCategory::Doctor, &file.filename, &file.bytes)?),
        None => None,
    };

    let updated = match repository::update_doctor(&conn, id, &fields, new_image.as_deref()) {
        Ok(Some(doctor)) => doctor,
        Ok(None) => return Err(ApiError::NotFound("Doctor not found".into())),
        Err(e) => {
            if let Some(filename) = &new_image {
                ctx.images.remove(ImageCategory::Doctor, filename);
            }
            return Err(e.into());
        }
    };

    if new_image.is_some() {
        if let Some(old) = &existing.image_filename {
            ctx.images.remove(ImageCategory::Doctor, old);
        }
    }

    Ok(Json(updated))
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// `DELETE /doctors/:id` — cascades through visits to patients, then removes
/// the backing image file.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let cascade = repository::delete_doctor_cascade(&conn, id)?
        .ok_or_else(|| ApiError::NotFound("Doctor not found".into()))?;

    if let Some(filename) = &cascade.image_filename {
        ctx.images.remove(ImageCategory::Doctor, filename);
    }

    Ok(Json(DeleteResponse {
        message: "Doctor deleted successfully".into(),
    }))
}

/// `GET /doctors/images/:filename` — serve a stored doctor image.
pub async fn image(
    State(ctx): State<ApiContext>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    if filename.contains('/') || filename.contains("..") {
        return Err(ApiError::BadRequest("Invalid filename".into()));
    }
    let path = ctx.images.path_of(ImageCategory::Doctor, &filename);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| ApiError::NotFound("Image not found".into()))?;
    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    Ok(([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response())
}

#[derive(Serialize)]
pub struct PatientCountResponse {
    pub doctor_id: i64,
    pub unique_patient_count: usize,
    pub total_visits: usize,
}

/// `GET /doctors/:id/patient-count` — unique patients (by derived identity)
/// who visited this doctor, plus the raw visit count.
pub async fn patient_count(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<PatientCountResponse>, ApiError> {
    let conn = ctx.open_db()?;
    if repository::get_doctor(&conn, id)?.is_none() {
        return Err(ApiError::NotFound("Doctor not found".into()));
    }

    let unique_patient_count = identity::unique_patient_count_for_doctor(&conn, id)?;
    let total_visits = repository::list_visits_for_doctor(&conn, id)?.len();

    Ok(Json(PatientCountResponse {
        doctor_id: id,
        unique_patient_count,
        total_visits,
    }))
}
