use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use crate::database::DatabasePool;
use crate::models::entry::{EntryRecord, Measurements, NewEntryRecord};
use super::errors::RepositoryError;

const SELECT_COLUMNS: &str =
    "SELECT id, user_name, dob, comment, timestamp, systolic1, diastolic1, systolic2, diastolic2
     FROM bp_entries";

/// SQLite storage operations for entries
pub struct DatabaseStorage;

impl DatabaseStorage {
    /// Insert an entry and return it with its assigned id
    pub fn store_entry(pool: &DatabasePool, entry: NewEntryRecord) -> Result<EntryRecord, RepositoryError> {
        let conn = pool.get()?;

        conn.execute(
            "INSERT INTO bp_entries
             (user_name, dob, comment, timestamp, systolic1, diastolic1, systolic2, diastolic2)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                entry.user_name,
                entry.dob,
                entry.comment,
                entry.timestamp,
                entry.measurements.systolic1,
                entry.measurements.diastolic1,
                entry.measurements.systolic2,
                entry.measurements.diastolic2,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!("Stored entry in database: id={}", id);
        Ok(EntryRecord::from_new(id, entry))
    }

    /// Get all entries, oldest first
    pub fn get_all(pool: &DatabasePool) -> Result<Vec<EntryRecord>, RepositoryError> {
        let conn = pool.get()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY timestamp ASC, id ASC", SELECT_COLUMNS))?;

        let rows = stmt.query_map([], map_row)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Get an entry by id
    pub fn get_by_id(pool: &DatabasePool, id: i64) -> Result<Option<EntryRecord>, RepositoryError> {
        let conn = pool.get()?;
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))?;

        Ok(stmt.query_row([id], map_row).optional()?)
    }

    /// Replace the measurements of an entry. Returns `None` if no row has `id`.
    pub fn update_measurements(
        pool: &DatabasePool,
        id: i64,
        measurements: Measurements,
    ) -> Result<Option<EntryRecord>, RepositoryError> {
        let changed = {
            let conn = pool.get()?;
            conn.execute(
                "UPDATE bp_entries
                 SET systolic1 = ?1, diastolic1 = ?2, systolic2 = ?3, diastolic2 = ?4
                 WHERE id = ?5",
                params![
                    measurements.systolic1,
                    measurements.diastolic1,
                    measurements.systolic2,
                    measurements.diastolic2,
                    id,
                ],
            )?
        };

        if changed == 0 {
            return Ok(None);
        }
        debug!("Updated entry in database: id={}", id);
        Self::get_by_id(pool, id)
    }

    /// Delete an entry. Returns whether a row was removed.
    pub fn delete(pool: &DatabasePool, id: i64) -> Result<bool, RepositoryError> {
        let conn = pool.get()?;
        let changed = conn.execute("DELETE FROM bp_entries WHERE id = ?1", [id])?;
        debug!("Deleted entry from database: id={}, removed={}", id, changed > 0);
        Ok(changed > 0)
    }

    /// Get entries whose timestamp lies within the inclusive bounds, oldest first
    pub fn get_range(
        pool: &DatabasePool,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<EntryRecord>, RepositoryError> {
        let conn = pool.get()?;

        let mut query = String::from(SELECT_COLUMNS);
        let mut where_clauses = Vec::new();
        let mut bounds: Vec<&str> = Vec::new();

        if let Some(start) = start {
            where_clauses.push("timestamp >= ?");
            bounds.push(start);
        }
        if let Some(end) = end {
            where_clauses.push("timestamp <= ?");
            bounds.push(end);
        }
        if !where_clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&where_clauses.join(" AND "));
        }
        query.push_str(" ORDER BY timestamp ASC, id ASC");

        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(bounds.iter()), map_row)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<EntryRecord> {
    Ok(EntryRecord {
        id: row.get(0)?,
        user_name: row.get(1)?,
        dob: row.get(2)?,
        comment: row.get(3)?,
        timestamp: row.get(4)?,
        systolic1: row.get(5)?,
        diastolic1: row.get(6)?,
        systolic2: row.get(7)?,
        diastolic2: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::open_in_memory_pool;

    fn new_entry(timestamp: &str, systolic1: i32) -> NewEntryRecord {
        NewEntryRecord {
            user_name: Some("Ada".to_string()),
            dob: Some("1970-01-01".to_string()),
            comment: None,
            timestamp: timestamp.to_string(),
            measurements: Measurements {
                systolic1,
                diastolic1: 80,
                systolic2: 118,
                diastolic2: 78,
            },
        }
    }

    #[test]
    fn test_store_and_fetch() {
        let pool = open_in_memory_pool().unwrap();

        let stored = DatabaseStorage::store_entry(&pool, new_entry("2024-03-01 08:00:00", 120)).unwrap();
        assert!(stored.id > 0);

        let fetched = DatabaseStorage::get_by_id(&pool, stored.id).unwrap().unwrap();
        assert_eq!(fetched, stored);
        assert!(DatabaseStorage::get_by_id(&pool, stored.id + 100).unwrap().is_none());
    }

    #[test]
    fn test_get_all_is_chronological() {
        let pool = open_in_memory_pool().unwrap();
        DatabaseStorage::store_entry(&pool, new_entry("2024-03-02 08:00:00", 2)).unwrap();
        DatabaseStorage::store_entry(&pool, new_entry("2024-03-01 08:00:00", 1)).unwrap();

        let all = DatabaseStorage::get_all(&pool).unwrap();
        let values: Vec<i32> = all.iter().map(|e| e.systolic1).collect();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn test_update_and_delete() {
        let pool = open_in_memory_pool().unwrap();
        let stored = DatabaseStorage::store_entry(&pool, new_entry("2024-03-01 08:00:00", 120)).unwrap();

        let updated = DatabaseStorage::update_measurements(
            &pool,
            stored.id,
            Measurements { systolic1: 140, diastolic1: 90, systolic2: 135, diastolic2: 88 },
        )
        .unwrap()
        .unwrap();
        assert_eq!(updated.systolic1, 140);
        assert_eq!(updated.diastolic2, 88);
        assert_eq!(updated.timestamp, stored.timestamp);

        assert!(DatabaseStorage::delete(&pool, stored.id).unwrap());
        assert!(!DatabaseStorage::delete(&pool, stored.id).unwrap());
        assert!(DatabaseStorage::update_measurements(&pool, stored.id, stored.measurements())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_get_range_is_inclusive() {
        let pool = open_in_memory_pool().unwrap();
        DatabaseStorage::store_entry(&pool, new_entry("2024-03-01 00:00:00", 1)).unwrap();
        DatabaseStorage::store_entry(&pool, new_entry("2024-03-02 12:00:00", 2)).unwrap();
        DatabaseStorage::store_entry(&pool, new_entry("2024-03-03 23:59:00", 3)).unwrap();
        DatabaseStorage::store_entry(&pool, new_entry("2024-03-04 00:00:00", 4)).unwrap();

        let range = DatabaseStorage::get_range(
            &pool,
            Some("2024-03-01 00:00:00"),
            Some("2024-03-03 23:59:00"),
        )
        .unwrap();
        let values: Vec<i32> = range.iter().map(|e| e.systolic1).collect();
        assert_eq!(values, vec![1, 2, 3]);

        let open_ended = DatabaseStorage::get_range(&pool, Some("2024-03-03 00:00:00"), None).unwrap();
        assert_eq!(open_ended.len(), 2);
    }
}
