use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::{GalleryImage, GalleryImageUpdate, NewGalleryImage};

const GALLERY_SELECT: &str =
    "SELECT id, title, description, image_url, order_index, is_active FROM gallery_images";

fn gallery_from_row(row: &rusqlite::Row) -> rusqlite::Result<GalleryImage> {
    Ok(GalleryImage {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        image_url: row.get(3)?,
        order_index: row.get(4)?,
        is_active: row.get::<_, i64>(5)? != 0,
    })
}

/// Listing order is always ascending `order_index`; `active_only` hides
/// rows whose `is_active` flag is cleared.
pub fn list_gallery_images(
    conn: &Connection,
    skip: i64,
    limit: i64,
    active_only: bool,
) -> Result<Vec<GalleryImage>, DatabaseError> {
    let filter = if active_only { "WHERE is_active = 1" } else { "" };
    let mut stmt = conn.prepare(&format!(
        "{GALLERY_SELECT} {filter} ORDER BY order_index LIMIT ?1 OFFSET ?2"
    ))?;
    let rows = stmt.query_map(params![limit, skip], gallery_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn get_gallery_image(conn: &Connection, id: i64) -> Result<Option<GalleryImage>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{GALLERY_SELECT} WHERE id = ?1"))?;
    match stmt.query_row(params![id], gallery_from_row) {
        Ok(image) => Ok(Some(image)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn insert_gallery_image(
    conn: &Connection,
    new: &NewGalleryImage,
) -> Result<GalleryImage, DatabaseError> {
    conn.execute(
        "INSERT INTO gallery_images (title, description, image_url, order_index, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            new.title,
            new.description,
            new.image_url,
            new.order_index,
            new.is_active as i64,
        ],
    )?;
    Ok(GalleryImage {
        id: conn.last_insert_rowid(),
        title: new.title.clone(),
        description: new.description.clone(),
        image_url: new.image_url.clone(),
        order_index: new.order_index,
        is_active: new.is_active,
    })
}

/// Metadata-only partial update; the backing file and URL never change here.
pub fn update_gallery_image(
    conn: &Connection,
    id: i64,
    update: &GalleryImageUpdate,
) -> Result<Option<GalleryImage>, DatabaseError> {
    let Some(existing) = get_gallery_image(conn, id)? else {
        return Ok(None);
    };
    let merged = GalleryImage {
        id,
        title: update.title.clone().unwrap_or(existing.title),
        description: update.description.clone().or(existing.description),
        image_url: existing.image_url,
        order_index: update.order_index.unwrap_or(existing.order_index),
        is_active: update.is_active.unwrap_or(existing.is_active),
    };
    conn.execute(
        "UPDATE gallery_images SET title = ?2, description = ?3, order_index = ?4, is_active = ?5
         WHERE id = ?1",
        params![id, merged.title, merged.description, merged.order_index, merged.is_active as i64],
    )?;
    Ok(Some(merged))
}

/// Delete a gallery row. Returns the stored URL so the caller can remove
/// the backing file after the commit.
pub fn delete_gallery_image(conn: &Connection, id: i64) -> Result<Option<String>, DatabaseError> {
    let Some(existing) = get_gallery_image(conn, id)? else {
        return Ok(None);
    };
    conn.execute("DELETE FROM gallery_images WHERE id = ?1", params![id])?;
    Ok(Some(existing.image_url))
}
