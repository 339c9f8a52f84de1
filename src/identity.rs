//! Patient identity resolution.
//!
//! Walk-in registration creates a new Patient row per visit, so the same
//! person shows up once per registration. There is no identity table; the
//! canonical identity is derived at read time from the exact (name, contact)
//! pair, case-sensitive, no normalization.

use std::collections::HashMap;
use std::str::FromStr;

use rusqlite::Connection;
use serde::Serialize;

use crate::db::DatabaseError;
use crate::models::FeeStatus;

/// One projection record per distinct (name, contact) pair. Representative
/// fields come from the first-encountered row in ascending id order.
#[derive(Debug, Clone, Serialize)]
pub struct UniquePatient {
    pub id: i64,
    pub name: String,
    pub contact: String,
    pub fee_status: FeeStatus,
    pub doctor_visits: Vec<i64>,
}

/// Collapse all patient rows into unique identities, each carrying the
/// distinct set of doctors visited (insertion order, deduplicated).
///
/// Rows whose visit no longer resolves still group by key; they just add no
/// doctor entry for that occurrence.
pub fn resolve_unique_patients(conn: &Connection) -> Result<Vec<UniquePatient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.name, p.contact, p.fee_status, v.doctor_id
         FROM patients p
         LEFT JOIN visits v ON v.id = p.visit_id
         ORDER BY p.id",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, Option<i64>>(4)?,
        ))
    })?;

    // Keyed map plus a separate key order, so output follows first-seen order.
    let mut by_key: HashMap<String, UniquePatient> = HashMap::new();
    let mut key_order: Vec<String> = Vec::new();

    for row in rows {
        let (id, name, contact, fee_status, doctor_id) = row?;
        let key = format!("{name}-{contact}");

        let entry = by_key.entry(key.clone()).or_insert_with(|| {
            key_order.push(key);
            UniquePatient {
                id,
                name,
                contact,
                fee_status: FeeStatus::from_str(&fee_status).unwrap_or_default(),
                doctor_visits: Vec::new(),
            }
        });

        if let Some(doctor_id) = doctor_id {
            if !entry.doctor_visits.contains(&doctor_id) {
                entry.doctor_visits.push(doctor_id);
            }
        }
    }

    Ok(key_order
        .into_iter()
        .filter_map(|key| by_key.remove(&key))
        .collect())
}

/// How many unique identities include the given doctor in their visit set.
pub fn unique_patient_count_for_doctor(
    conn: &Connection,
    doctor_id: i64,
) -> Result<usize, DatabaseError> {
    let unique = resolve_unique_patients(conn)?;
    Ok(unique
        .iter()
        .filter(|p| p.doctor_visits.contains(&doctor_id))
        .count())
}
