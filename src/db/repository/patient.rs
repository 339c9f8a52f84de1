use std::str::FromStr;

use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::{FeeStatus, NewPatient, Patient, PatientUpdate};

fn patient_from_row(row: &rusqlite::Row) -> rusqlite::Result<Patient> {
    let fee: String = row.get(3)?;
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        contact: row.get(2)?,
        // Unknown values in storage surface as the default rather than a panic
        fee_status: FeeStatus::from_str(&fee).unwrap_or_default(),
        visit_id: row.get(4)?,
        serial_no: row.get(5)?,
    })
}

const PATIENT_SELECT: &str =
    "SELECT id, name, contact, fee_status, visit_id, serial_no FROM patients";

pub fn list_patients(
    conn: &Connection,
    skip: i64,
    limit: i64,
) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{PATIENT_SELECT} ORDER BY id LIMIT ?1 OFFSET ?2"))?;
    let rows = stmt.query_map(params![limit, skip], patient_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn list_patients_for_visit(
    conn: &Connection,
    visit_id: i64,
) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt =
        conn.prepare(&format!("{PATIENT_SELECT} WHERE visit_id = ?1 ORDER BY serial_no"))?;
    let rows = stmt.query_map(params![visit_id], patient_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Option<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{PATIENT_SELECT} WHERE id = ?1"))?;
    match stmt.query_row(params![id], patient_from_row) {
        Ok(patient) => Ok(Some(patient)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Insert a patient under a visit. `serial_no` is 1 + the number of patients
/// already registered for the visit, assigned inside the same transaction as
/// the insert so concurrent registrations cannot share a serial. Serials are
/// never renumbered when siblings are deleted.
pub fn insert_patient(
    conn: &Connection,
    visit_id: i64,
    new: &NewPatient,
) -> Result<Patient, DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    let existing: i64 = tx.query_row(
        "SELECT COUNT(*) FROM patients WHERE visit_id = ?1",
        params![visit_id],
        |row| row.get(0),
    )?;
    let serial_no = existing + 1;
    tx.execute(
        "INSERT INTO patients (name, contact, fee_status, visit_id, serial_no)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![new.name, new.contact, new.fee_status.as_str(), visit_id, serial_no],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;

    Ok(Patient {
        id,
        name: new.name.clone(),
        contact: new.contact.clone(),
        fee_status: new.fee_status,
        visit_id,
        serial_no,
    })
}

/// Apply only the fields present in the update; unset fields keep their
/// stored values.
pub fn update_patient(
    conn: &Connection,
    id: i64,
    update: &PatientUpdate,
) -> Result<Option<Patient>, DatabaseError> {
    let Some(existing) = get_patient(conn, id)? else {
        return Ok(None);
    };
    let name = update.name.as_ref().unwrap_or(&existing.name);
    let contact = update.contact.as_ref().unwrap_or(&existing.contact);
    let fee_status = update.fee_status.unwrap_or(existing.fee_status);
    conn.execute(
        "UPDATE patients SET name = ?2, contact = ?3, fee_status = ?4 WHERE id = ?1",
        params![id, name, contact, fee_status.as_str()],
    )?;
    get_patient(conn, id)
}

/// Flip fee status between due and paid as a single read-modify-write.
pub fn toggle_fee_status(conn: &Connection, id: i64) -> Result<Option<Patient>, DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    let current: Option<String> = match tx.query_row(
        "SELECT fee_status FROM patients WHERE id = ?1",
        params![id],
        |row| row.get(0),
    ) {
        Ok(v) => Some(v),
        Err(rusqlite::Error::QueryReturnedNoRows) => None,
        Err(e) => return Err(e.into()),
    };
    let Some(current) = current else {
        return Ok(None);
    };
    let toggled = FeeStatus::from_str(&current).unwrap_or_default().toggled();
    tx.execute(
        "UPDATE patients SET fee_status = ?2 WHERE id = ?1",
        params![id, toggled.as_str()],
    )?;
    tx.commit()?;
    get_patient(conn, id)
}

pub fn delete_patient(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let deleted = conn.execute("DELETE FROM patients WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}
