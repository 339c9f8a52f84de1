use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::{DoctorSchedule, ScheduleFields, ScheduleUpdate};

const SCHEDULE_SELECT: &str = "SELECT id, name, specialization, image_filename, contact_number,
 day_of_week, start_time, end_time, is_available, specific_date FROM doctor_schedules";

fn schedule_from_row(row: &rusqlite::Row) -> rusqlite::Result<DoctorSchedule> {
    Ok(DoctorSchedule {
        id: row.get(0)?,
        name: row.get(1)?,
        specialization: row.get(2)?,
        image_filename: row.get(3)?,
        contact_number: row.get(4)?,
        day_of_week: row.get(5)?,
        start_time: row.get(6)?,
        end_time: row.get(7)?,
        is_available: row.get::<_, i64>(8)? != 0,
        specific_date: row.get(9)?,
    })
}

pub fn list_schedules(conn: &Connection) -> Result<Vec<DoctorSchedule>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{SCHEDULE_SELECT} ORDER BY id"))?;
    let rows = stmt.query_map([], schedule_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn get_schedule(conn: &Connection, id: i64) -> Result<Option<DoctorSchedule>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{SCHEDULE_SELECT} WHERE id = ?1"))?;
    match stmt.query_row(params![id], schedule_from_row) {
        Ok(schedule) => Ok(Some(schedule)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn insert_schedule(
    conn: &Connection,
    fields: &ScheduleFields,
    image_filename: Option<&str>,
) -> Result<DoctorSchedule, DatabaseError> {
    conn.execute(
        "INSERT INTO doctor_schedules
         (name, specialization, image_filename, contact_number, day_of_week,
          start_time, end_time, is_available, specific_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            fields.name,
            fields.specialization,
            image_filename,
            fields.contact_number,
            fields.day_of_week,
            fields.start_time,
            fields.end_time,
            fields.is_available as i64,
            fields.specific_date,
        ],
    )?;
    let id = conn.last_insert_rowid();
    Ok(DoctorSchedule {
        id,
        name: fields.name.clone(),
        specialization: fields.specialization.clone(),
        image_filename: image_filename.map(|s| s.to_string()),
        contact_number: fields.contact_number.clone(),
        day_of_week: fields.day_of_week.clone(),
        start_time: fields.start_time,
        end_time: fields.end_time,
        is_available: fields.is_available,
        specific_date: fields.specific_date,
    })
}

/// Partial update. The image reference is only touched when a new filename
/// is supplied.
pub fn update_schedule(
    conn: &Connection,
    id: i64,
    update: &ScheduleUpdate,
    image_filename: Option<&str>,
) -> Result<Option<DoctorSchedule>, DatabaseError> {
    let Some(existing) = get_schedule(conn, id)? else {
        return Ok(None);
    };
    let merged = DoctorSchedule {
        id,
        name: update.name.clone().unwrap_or(existing.name),
        specialization: update.specialization.clone().unwrap_or(existing.specialization),
        image_filename: match image_filename {
            Some(f) => Some(f.to_string()),
            None => existing.image_filename,
        },
        contact_number: update.contact_number.clone().or(existing.contact_number),
        day_of_week: update.day_of_week.clone().unwrap_or(existing.day_of_week),
        start_time: update.start_time.unwrap_or(existing.start_time),
        end_time: update.end_time.unwrap_or(existing.end_time),
        is_available: update.is_available.unwrap_or(existing.is_available),
        specific_date: match update.specific_date {
            Some(d) => d,
            None => existing.specific_date,
        },
    };
    conn.execute(
        "UPDATE doctor_schedules SET name = ?2, specialization = ?3, image_filename = ?4,
         contact_number = ?5, day_of_week = ?6, start_time = ?7, end_time = ?8,
         is_available = ?9, specific_date = ?10
         WHERE id = ?1",
        params![
            id,
            merged.name,
            merged.specialization,
            merged.image_filename,
            merged.contact_number,
            merged.day_of_week,
            merged.start_time,
            merged.end_time,
            merged.is_available as i64,
            merged.specific_date,
        ],
    )?;
    Ok(Some(merged))
}

/// Delete a schedule. Returns the image filename that backed it (if any)
/// so the caller can remove the file after the row is gone.
pub fn delete_schedule(conn: &Connection, id: i64) -> Result<Option<Option<String>>, DatabaseError> {
    let Some(existing) = get_schedule(conn, id)? else {
        return Ok(None);
    };
    conn.execute("DELETE FROM doctor_schedules WHERE id = ?1", params![id])?;
    Ok(Some(existing.image_filename))
}
