//! Gallery endpoints. Rows carry a public URL under `/uploads/gallery/`;
//! listing is ordered by `order_index` and hides inactive rows by default.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::endpoints::{parse_bool, Form};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository;
use crate::models::{GalleryImage, GalleryImageUpdate, NewGalleryImage};
use crate::uploads::{ImageCategory, ImageStore, UploadError};

#[derive(Deserialize)]
pub struct ListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub active_only: Option<bool>,
}

/// `GET /gallery?skip&limit&active_only`
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<GalleryImage>>, ApiError> {
    let conn = ctx.open_db()?;
    let images = repository::list_gallery_images(
        &conn,
        query.skip.unwrap_or(0),
        query.limit.unwrap_or(100),
        query.active_only.unwrap_or(true),
    )?;
    Ok(Json(images))
}

/// `GET /gallery/:id`
pub async fn get(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<GalleryImage>, ApiError> {
    let conn = ctx.open_db()?;
    repository::get_gallery_image(&conn, id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Gallery image not found".into()))
}

/// `POST /gallery` — multipart form, image required. A non-image
/// content-type is rejected before anything touches disk.
pub async fn create(
    State(ctx): State<ApiContext>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<GalleryImage>), ApiError> {
    let form = Form::from_multipart(multipart).await?;
    let file = form
        .image
        .as_ref()
        .ok_or_else(|| ApiError::BadRequest("Missing required field: image".into()))?;
    if !file.content_type.starts_with("image/") {
        return Err(UploadError::NotAnImage.into());
    }

    let title = form.required("title")?;
    let description = form.get("description").map(str::to_string);
    let order_index = match form.get("order_index") {
        Some(v) => v
            .parse()
            .map_err(|_| ApiError::BadRequest(format!("Invalid order_index: {v}")))?,
        None => 0,
    };
    let is_active = match form.get("is_active") {
        Some(v) => parse_bool(v)?,
        None => true,
    };

    let filename = ctx.images.save(ImageCategory::Gallery, &file.filename, &file.bytes)?;
    let new = NewGalleryImage {
        title,
        description,
        image_url: ImageStore::public_url(ImageCategory::Gallery, &filename),
        order_index,
        is_active,
    };

    let conn = ctx.open_db()?;
    let image = match repository::insert_gallery_image(&conn, &new) {
        Ok(image) => image,
        Err(e) => {
            ctx.images.remove(ImageCategory::Gallery, &filename);
            return Err(e.into());
        }
    };

    Ok((StatusCode::CREATED, Json(image)))
}

/// `PUT /gallery/:id` — JSON partial update of metadata; the image file
/// itself is immutable once stored.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
    Json(payload): Json<GalleryImageUpdate>,
) -> Result<Json<GalleryImage>, ApiError> {
    let conn = ctx.open_db()?;
    repository::update_gallery_image(&conn, id, &payload)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Gallery image not found".into()))
}

/// `DELETE /gallery/:id` — removes the backing file after the row is gone.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.open_db()?;
    let url = repository::delete_gallery_image(&conn, id)?
        .ok_or_else(|| ApiError::NotFound("Gallery image not found".into()))?;

    if let Some(filename) = url.rsplit('/').next() {
        ctx.images.remove(ImageCategory::Gallery, filename);
    }

    Ok(StatusCode::NO_CONTENT)
}
