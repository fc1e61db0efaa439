use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::error::StoreError;

/// Collection keys. One whole-collection JSON blob per key, the layout the
/// mobile app has always persisted.
pub const STUDENTS_KEY: &str = "students_data";
pub const ATTENDANCE_KEY: &str = "attendance_records";
pub const GRADES_KEY: &str = "grades_data";
pub const SCHEDULE_KEY: &str = "schedule_data";
pub const FACE_DATA_KEY: &str = "face_recognition_data";
pub const CALENDAR_EVENTS_KEY: &str = "calendar_events";
pub const NOTIFICATIONS_KEY: &str = "user_notifications";

/// Per-student free-form grade list lives under its own key.
pub fn grades_key(student_id: &str) -> String {
    format!("grades_{student_id}")
}

/// Durable key-value store backing every repository: a single `kv` table in
/// a SQLite file under the workspace directory.
pub struct KvStore {
    conn: Connection,
}

impl KvStore {
    pub fn open(workspace: &Path) -> anyhow::Result<KvStore> {
        std::fs::create_dir_all(workspace)?;
        let db_path = workspace.join("kairos.sqlite3");
        let conn = Connection::open(db_path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv(
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(KvStore { conn })
    }

    pub fn contains(&self, key: &str) -> Result<bool, StoreError> {
        let hit = self
            .conn
            .query_row("SELECT 1 FROM kv WHERE key = ?", [key], |r| {
                r.get::<_, i64>(0)
            })
            .optional()?;
        Ok(hit.is_some())
    }

    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?", [key], |r| r.get(0))
            .optional()?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT INTO kv(key, value) VALUES(?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (key, raw),
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM kv WHERE key = ?", [key])?;
        Ok(())
    }

    /// Read-modify-write of one collection under a transaction. The closure
    /// sees the current value (None when the key is absent) and returns the
    /// replacement plus the operation result; an Err leaves the stored blob
    /// untouched. Mutations on the same collection cannot lose updates.
    pub fn update_json<T, R>(
        &self,
        key: &str,
        apply: impl FnOnce(Option<T>) -> Result<(T, R), StoreError>,
    ) -> Result<R, StoreError>
    where
        T: Serialize + DeserializeOwned,
    {
        let tx = self.conn.unchecked_transaction()?;
        let raw: Option<String> = tx
            .query_row("SELECT value FROM kv WHERE key = ?", [key], |r| r.get(0))
            .optional()?;
        let current = match raw {
            Some(raw) => Some(serde_json::from_str(&raw)?),
            None => None,
        };
        let (next, result) = apply(current)?;
        let raw = serde_json::to_string(&next)?;
        tx.execute(
            "INSERT INTO kv(key, value) VALUES(?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (key, raw),
        )?;
        tx.commit()?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_workspace(prefix: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "{}-{}",
            prefix,
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ))
    }

    #[test]
    fn get_set_round_trip_preserves_value_types() {
        let store = KvStore::open(&temp_workspace("kairos-store-roundtrip")).expect("open");
        let value = serde_json::json!([{ "id": "1", "score": 17.5, "flag": true }]);
        store.set_json("sample", &value).expect("set");
        let back: serde_json::Value = store.get_json("sample").expect("get").expect("present");
        assert_eq!(back, value);
        assert!(back[0]["score"].is_f64());
    }

    #[test]
    fn absent_key_reads_as_none() {
        let store = KvStore::open(&temp_workspace("kairos-store-absent")).expect("open");
        let got: Option<Vec<String>> = store.get_json("nope").expect("get");
        assert!(got.is_none());
        assert!(!store.contains("nope").expect("contains"));
    }

    #[test]
    fn failed_update_leaves_blob_untouched() {
        let store = KvStore::open(&temp_workspace("kairos-store-update")).expect("open");
        store.set_json("counter", &vec![1, 2, 3]).expect("set");
        let err = store
            .update_json("counter", |_: Option<Vec<i64>>| {
                Err::<(Vec<i64>, ()), _>(crate::error::StoreError::invalid("rejected"))
            })
            .expect_err("update must fail");
        assert_eq!(err.code(), "bad_params");
        let back: Vec<i64> = store.get_json("counter").expect("get").expect("present");
        assert_eq!(back, vec![1, 2, 3]);
    }

    #[test]
    fn remove_drops_the_key() {
        let store = KvStore::open(&temp_workspace("kairos-store-remove")).expect("open");
        store.set_json("gone", &"x").expect("set");
        store.remove("gone").expect("remove");
        assert!(!store.contains("gone").expect("contains"));
    }
}
