//! Visit endpoints. Reads return the `VisitSummary` projection with its
//! computed patient count; deletion cascades to patients atomically.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;
use crate::models::{NewVisit, VisitSummary};

/// `GET /visits/:doctor_id`
pub async fn list_for_doctor(
    State(ctx): State<ApiContext>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Vec<VisitSummary>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(repository::list_visits_for_doctor(&conn, doctor_id)?))
}

/// `GET /visits/detail/:visit_id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(visit_id): Path<i64>,
) -> Result<Json<VisitSummary>, ApiError> {
    let conn = ctx.open_db()?;
    repository::get_visit(&conn, visit_id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Visit not found".into()))
}

/// `POST /visits/:doctor_id` — the doctor must exist.
pub async fn create(
    State(ctx): State<ApiContext>,
    Path(doctor_id): Path<i64>,
    Json(payload): Json<NewVisit>,
) -> Result<(StatusCode, Json<VisitSummary>), ApiError> {
    let conn = ctx.open_db()?;
    if repository::get_doctor(&conn, doctor_id)?.is_none() {
        return Err(ApiError::NotFound("Doctor not found".into()));
    }
    let visit = repository::insert_visit(&conn, doctor_id, payload.date)?;
    Ok((StatusCode::CREATED, Json(visit)))
}

/// `DELETE /visits/:visit_id` — removes the visit and all its patients.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(visit_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.open_db()?;
    repository::delete_visit_cascade(&conn, visit_id)?
        .ok_or_else(|| ApiError::NotFound("Visit not found".into()))?;
    Ok(StatusCode::NO_CONTENT)
}
