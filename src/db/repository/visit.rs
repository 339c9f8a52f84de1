use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::VisitSummary;

const VISIT_SELECT: &str = "SELECT v.id, v.date, v.doctor_id,
 (SELECT COUNT(*) FROM patients p WHERE p.visit_id = v.id) AS total_patients
 FROM visits v";

fn visit_from_row(row: &rusqlite::Row) -> rusqlite::Result<VisitSummary> {
    Ok(VisitSummary {
        id: row.get(0)?,
        date: row.get(1)?,
        doctor_id: row.get(2)?,
        total_patients: row.get(3)?,
    })
}

/// All visits for a doctor, each annotated with its patient count.
pub fn list_visits_for_doctor(
    conn: &Connection,
    doctor_id: i64,
) -> Result<Vec<VisitSummary>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{VISIT_SELECT} WHERE v.doctor_id = ?1 ORDER BY v.id"))?;
    let rows = stmt.query_map(params![doctor_id], visit_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn get_visit(conn: &Connection, id: i64) -> Result<Option<VisitSummary>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("{VISIT_SELECT} WHERE v.id = ?1"))?;
    match stmt.query_row(params![id], visit_from_row) {
        Ok(visit) => Ok(Some(visit)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Insert a visit under a doctor. The doctor must exist (enforced by the
/// foreign key; callers check first to surface a not-found instead of a
/// constraint error).
pub fn insert_visit(
    conn: &Connection,
    doctor_id: i64,
    date: NaiveDate,
) -> Result<VisitSummary, DatabaseError> {
    conn.execute(
        "INSERT INTO visits (date, doctor_id) VALUES (?1, ?2)",
        params![date, doctor_id],
    )?;
    Ok(VisitSummary {
        id: conn.last_insert_rowid(),
        date,
        doctor_id,
        total_patients: 0,
    })
}

/// Delete a visit and all patient rows referencing it, atomically.
/// Returns the number of patients removed, or `None` if the visit is unknown.
pub fn delete_visit_cascade(conn: &Connection, id: i64) -> Result<Option<usize>, DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    let patients_deleted =
        tx.execute("DELETE FROM patients WHERE visit_id = ?1", params![id])?;
    let deleted = tx.execute("DELETE FROM visits WHERE id = ?1", params![id])?;
    if deleted == 0 {
        // Nothing to delete; roll the patient removal back as well.
        drop(tx);
        return Ok(None);
    }
    tx.commit()?;

    tracing::info!(visit_id = id, patients = patients_deleted, "Visit cascade-deleted");
    Ok(Some(patients_deleted))
}
