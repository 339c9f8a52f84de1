//! Patient endpoints, including the fee-status toggle and the unique
//! identity listing.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;
use crate::identity::{self, UniquePatient};
use crate::models::{NewPatient, Patient, PatientUpdate};

#[derive(Deserialize)]
pub struct ListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// `GET /patients` — all patients, paginated.
pub async fn list_all(
    State(ctx): State<ApiContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    let conn = ctx.open_db()?;
    let patients = repository::list_patients(
        &conn,
        query.skip.unwrap_or(0),
        query.limit.unwrap_or(100),
    )?;
    Ok(Json(patients))
}

/// `GET /patients/:visit_id`
pub async fn list_for_visit(
    State(ctx): State<ApiContext>,
    Path(visit_id): Path<i64>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(repository::list_patients_for_visit(&conn, visit_id)?))
}

/// `POST /patients/:visit_id` — serial_no is assigned as 1 + existing count
/// for the visit at creation time.
pub async fn create(
    State(ctx): State<ApiContext>,
    Path(visit_id): Path<i64>,
    Json(payload): Json<NewPatient>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let conn = ctx.open_db()?;
    if repository::get_visit(&conn, visit_id)?.is_none() {
        return Err(ApiError::NotFound("Visit not found".into()));
    }
    let patient = repository::insert_patient(&conn, visit_id, &payload)?;
    Ok((StatusCode::CREATED, Json(patient)))
}

/// `PATCH /patients/patient/:patient_id` — flip fee status due↔paid.
pub async fn toggle_fee(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<i64>,
) -> Result<Json<Patient>, ApiError> {
    let conn = ctx.open_db()?;
    repository::toggle_fee_status(&conn, patient_id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))
}

/// `PUT /patients/patient/:patient_id` — partial update.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<i64>,
    Json(payload): Json<PatientUpdate>,
) -> Result<Json<Patient>, ApiError> {
    let conn = ctx.open_db()?;
    repository::update_patient(&conn, patient_id, &payload)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))
}

/// `DELETE /patients/patient/:patient_id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.open_db()?;
    if !repository::delete_patient(&conn, patient_id)? {
        return Err(ApiError::NotFound("Patient not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /patients/unique` — one record per distinct (name, contact) pair
/// with the set of doctors visited.
pub async fn unique(State(ctx): State<ApiContext>) -> Result<Json<Vec<UniquePatient>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(identity::resolve_unique_patients(&conn)?))
}
