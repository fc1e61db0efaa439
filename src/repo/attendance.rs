use chrono::Local;

use crate::calc::{attendance_stats, AttendanceStats};
use crate::error::StoreError;
use crate::model::{date_only, fresh_id, AttendanceRecord, AttendanceStatus};
use crate::store::{KvStore, ATTENDANCE_KEY};

/// Owns the attendance collection; at most one record per (student, day).
pub struct AttendanceRepo<'a> {
    store: &'a KvStore,
}

impl<'a> AttendanceRepo<'a> {
    pub fn new(store: &'a KvStore) -> Self {
        AttendanceRepo { store }
    }

    /// Registers today's attendance for a student. A second registration on
    /// the same day replaces the first record rather than appending.
    /// `absence_date` is only honored for absent students and defaults to
    /// the record date.
    pub fn register(
        &self,
        student_id: &str,
        arrival_time: Option<String>,
        status: AttendanceStatus,
        absence_date: Option<String>,
    ) -> Result<AttendanceRecord, StoreError> {
        let today = Local::now().format("%Y-%m-%d").to_string();
        self.register_on(&today, student_id, arrival_time, status, absence_date)
    }

    pub(crate) fn register_on(
        &self,
        date: &str,
        student_id: &str,
        arrival_time: Option<String>,
        status: AttendanceStatus,
        absence_date: Option<String>,
    ) -> Result<AttendanceRecord, StoreError> {
        self.store
            .update_json(ATTENDANCE_KEY, |current: Option<Vec<AttendanceRecord>>| {
                let mut records = current.unwrap_or_default();
                let record = AttendanceRecord {
                    id: fresh_id(|id| records.iter().any(|r| r.id == id)),
                    student_id: student_id.to_string(),
                    date: date.to_string(),
                    arrival_time: match status {
                        AttendanceStatus::Present => arrival_time,
                        AttendanceStatus::Absent => None,
                    },
                    status,
                    absence_date: match status {
                        AttendanceStatus::Absent => {
                            Some(absence_date.unwrap_or_else(|| date.to_string()))
                        }
                        AttendanceStatus::Present => None,
                    },
                };
                let existing = records
                    .iter_mut()
                    .find(|r| r.student_id == student_id && date_only(&r.date) == date);
                match existing {
                    Some(slot) => *slot = record.clone(),
                    None => records.push(record.clone()),
                }
                Ok((records, record))
            })
    }

    pub fn all(&self) -> Result<Vec<AttendanceRecord>, StoreError> {
        Ok(self.store.get_json(ATTENDANCE_KEY)?.unwrap_or_default())
    }

    /// Records for one calendar day; both sides of the comparison are
    /// normalized to `YYYY-MM-DD` first.
    pub fn by_date(&self, date: &str) -> Result<Vec<AttendanceRecord>, StoreError> {
        let wanted = date_only(date).to_string();
        let mut records = self.all()?;
        records.retain(|r| date_only(&r.date) == wanted);
        Ok(records)
    }

    pub fn by_student(&self, student_id: &str) -> Result<Vec<AttendanceRecord>, StoreError> {
        let mut records = self.all()?;
        records.retain(|r| r.student_id == student_id);
        Ok(records)
    }

    pub fn stats(&self, start_date: &str, end_date: &str) -> Result<AttendanceStats, StoreError> {
        let records = self.all()?;
        Ok(attendance_stats(records.iter(), start_date, end_date))
    }
}
