//! Schedule endpoints. Schedules are standalone availability rows matched
//! to doctors by name text, not by foreign key.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::endpoints::{parse_bool, parse_date, parse_time, Form};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;
use crate::models::{DoctorSchedule, ScheduleFields, ScheduleUpdate};
use crate::uploads::ImageCategory;

/// `GET /schedules`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<DoctorSchedule>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(repository::list_schedules(&conn)?))
}

/// `POST /schedules` — multipart form. Times are `HH:MM[:SS]`, the optional
/// specific date is `YYYY-MM-DD`; availability defaults to true.
pub async fn create(
    State(ctx): State<ApiContext>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<DoctorSchedule>), ApiError> {
    let form = Form::from_multipart(multipart).await?;
    let fields = ScheduleFields {
        name: form.required("name")?,
        specialization: form.required("specialization")?,
        day_of_week: form.required("day_of_week")?,
        start_time: parse_time(&form.required("start_time")?)?,
        end_time: parse_time(&form.required("end_time")?)?,
        is_available: match form.get("is_available") {
            Some(v) => parse_bool(v)?,
            None => true,
        },
        specific_date: form.get("specific_date").map(parse_date).transpose()?,
        contact_number: form.get("contact_number").map(str::to_string),
    };

    let image_filename = match &form.image {
        Some(file) => Some(ctx.images.save(ImageCategory::Schedule, &file.filename, &file.bytes)?),
        None => None,
    };

    let conn = ctx.open_db()?;
    let schedule = match repository::insert_schedule(&conn, &fields, image_filename.as_deref()) {
        Ok(schedule) => schedule,
        Err(e) => {
            if let Some(filename) = &image_filename {
                ctx.images.remove(ImageCategory::Schedule, filename);
            }
            return Err(e.into());
        }
    };

    Ok((StatusCode::CREATED, Json(schedule)))
}

/// `PUT /schedules/:id` — partial multipart form: absent fields keep their
/// stored values; an empty `specific_date` clears the date. The image is
/// replaced only when a new upload is present, old file removed after the
/// row points at the new one.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<DoctorSchedule>, ApiError> {
    let form = Form::from_multipart(multipart).await?;
    let update = ScheduleUpdate {
        name: form.get("name").map(str::to_string),
        specialization: form.get("specialization").map(str::to_string),
        day_of_week: form.get("day_of_week").map(str::to_string),
        start_time: form.get("start_time").map(parse_time).transpose()?,
        end_time: form.get("end_time").map(parse_time).transpose()?,
        is_available: form.get("is_available").map(parse_bool).transpose()?,
        specific_date: match form.get("specific_date") {
            Some("") => Some(None),
            Some(v) => Some(Some(parse_date(v)?)),
            None => None,
        },
        contact_number: form.get("contact_number").map(str::to_string),
    };

    let conn = ctx.open_db()?;
    let existing = repository::get_schedule(&conn, id)?
        .ok_or_else(|| ApiError::NotFound("Schedule not found".into()))?;

    let new_image = match &form.image {
        Some(file) => Some(ctx.images.save(ImageCategory::Schedule, &file.filename, &file.bytes)?),
        None => None,
    };

    let updated = match repository::update_schedule(&conn, id, &update, new_image.as_deref()) {
        Ok(Some(schedule)) => schedule,
        Ok(None) => return Err(ApiError::NotFound("Schedule not found".into())),
        Err(e) => {
            if let Some(filename) = &new_image {
                ctx.images.remove(ImageCategory::Schedule, filename);
            }
            return Err(e.into());
        }
    };

    if new_image.is_some() {
        if let Some(old) = &existing.image_filename {
            ctx.images.remove(ImageCategory::Schedule, old);
        }
    }

    Ok(Json(updated))
}

/// `DELETE /schedules/:id` — removes the backing image file after the row.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.open_db()?;
    let image = repository::delete_schedule(&conn, id)?
        .ok_or_else(|| ApiError::NotFound("Schedule not found".into()))?;

    if let Some(filename) = &image {
        ctx.images.remove(ImageCategory::Schedule, filename);
    }

    Ok(StatusCode::NO_CONTENT)
}
