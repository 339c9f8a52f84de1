use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::{Doctor, DoctorFields};

fn doctor_from_row(row: &rusqlite::Row) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(0)?,
        name: row.get(1)?,
        specialization: row.get(2)?,
        phone: row.get(3)?,
        image_filename: row.get(4)?,
    })
}

pub fn list_doctors(conn: &Connection) -> Result<Vec<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, specialization, phone, image_filename FROM doctors ORDER BY id",
    )?;
    let rows = stmt.query_map([], doctor_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn get_doctor(conn: &Connection, id: i64) -> Result<Option<Doctor>, DatabaseError> {
    let mut stmt = conn
        .prepare("SELECT id, name, specialization, phone, image_filename FROM doctors WHERE id = ?1")?;
    match stmt.query_row(params![id], doctor_from_row) {
        Ok(doctor) => Ok(Some(doctor)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Insert a doctor and return the persisted row with its generated id.
pub fn insert_doctor(
    conn: &Connection,
    fields: &DoctorFields,
    image_filename: Option<&str>,
) -> Result<Doctor, DatabaseError> {
    conn.execute(
        "INSERT INTO doctors (name, specialization, phone, image_filename)
         VALUES (?1, ?2, ?3, ?4)",
        params![fields.name, fields.specialization, fields.phone, image_filename],
    )?;
    let id = conn.last_insert_rowid();
    Ok(Doctor {
        id,
        name: fields.name.clone(),
        specialization: fields.specialization.clone(),
        phone: fields.phone.clone(),
        image_filename: image_filename.map(|s| s.to_string()),
    })
}

/// Replace a doctor's fields. The image reference is only touched when a
/// new filename is supplied; `None` preserves the stored one.
pub fn update_doctor(
    conn: &Connection,
    id: i64,
    fields: &DoctorFields,
    image_filename: Option<&str>,
) -> Result<Option<Doctor>, DatabaseError> {
    let Some(existing) = get_doctor(conn, id)? else {
        return Ok(None);
    };
    let image = match image_filename {
        Some(f) => Some(f.to_string()),
        None => existing.image_filename,
    };
    conn.execute(
        "UPDATE doctors SET name = ?2, specialization = ?3, phone = ?4, image_filename = ?5
         WHERE id = ?1",
        params![id, fields.name, fields.specialization, fields.phone, image],
    )?;
    get_doctor(conn, id)
}

/// Outcome of a doctor cascade-delete, so the boundary can clean up the
/// backing image file after the transaction commits.
#[derive(Debug)]
pub struct DoctorCascade {
    pub image_filename: Option<String>,
    pub visits_deleted: usize,
    pub patients_deleted: usize,
}

/// Delete a doctor, its visits, and transitively all patients under those
/// visits. The whole cascade runs in one transaction; a concurrent patient
/// create for a deleted visit fails on the missing foreign key.
pub fn delete_doctor_cascade(
    conn: &Connection,
    id: i64,
) -> Result<Option<DoctorCascade>, DatabaseError> {
    let Some(doctor) = get_doctor(conn, id)? else {
        return Ok(None);
    };

    let tx = conn.unchecked_transaction()?;
    let patients_deleted = tx.execute(
        "DELETE FROM patients WHERE visit_id IN (SELECT id FROM visits WHERE doctor_id = ?1)",
        params![id],
    )?;
    let visits_deleted = tx.execute("DELETE FROM visits WHERE doctor_id = ?1", params![id])?;
    tx.execute("DELETE FROM doctors WHERE id = ?1", params![id])?;
    tx.commit()?;

    tracing::info!(
        doctor_id = id,
        visits = visits_deleted,
        patients = patients_deleted,
        "Doctor cascade-deleted"
    );

    Ok(Some(DoctorCascade {
        image_filename: doctor.image_filename,
        visits_deleted,
        patients_deleted,
    }))
}
