use serde_json::json;
use std::collections::BTreeMap;

use crate::calc::promedio;
use crate::error::StoreError;
use crate::model::fresh_id;
use crate::store::{grades_key, KvStore, GRADES_KEY};

/// Synthetic period holding the computed per-subject average.
pub const PROMEDIO: &str = "Promedio";

pub type SubjectGrades = BTreeMap<String, f64>;
pub type GradeBook = BTreeMap<String, SubjectGrades>;
type AllBooks = BTreeMap<String, GradeBook>;

/// Owns the per-student grade books and keeps Promedio consistent.
///
/// Two grade surfaces coexist, as persisted by the app: the canonical
/// subject/period mapping under `grades_data` (validated, aggregated) and a
/// free-form per-student entry list under `grades_<studentId>` (neither).
pub struct GradeRepo<'a> {
    store: &'a KvStore,
}

impl<'a> GradeRepo<'a> {
    pub fn new(store: &'a KvStore) -> Self {
        GradeRepo { store }
    }

    pub fn for_student(&self, student_id: &str) -> Result<GradeBook, StoreError> {
        let books: AllBooks = self.store.get_json(GRADES_KEY)?.unwrap_or_default();
        books
            .get(student_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(format!("grades for student {student_id}")))
    }

    /// Writes one period score and recomputes the subject's Promedio in the
    /// same blob write; a rejected score leaves everything untouched.
    /// Returns the new Promedio.
    pub fn update_score(
        &self,
        student_id: &str,
        subject: &str,
        period: &str,
        score: f64,
    ) -> Result<f64, StoreError> {
        if !(0.0..=20.0).contains(&score) {
            return Err(StoreError::invalid("score must be between 0 and 20"));
        }
        if period == PROMEDIO {
            return Err(StoreError::invalid("Promedio is computed, not assignable"));
        }
        self.store.update_json(GRADES_KEY, |current: Option<AllBooks>| {
            let mut books = current.unwrap_or_default();
            let book = books
                .get_mut(student_id)
                .ok_or_else(|| StoreError::not_found(format!("grades for student {student_id}")))?;
            let periods = book.get_mut(subject).ok_or_else(|| {
                StoreError::not_found(format!("subject {subject} for student {student_id}"))
            })?;
            periods.insert(period.to_string(), score);
            let average = promedio(
                periods
                    .iter()
                    .filter(|(p, _)| p.as_str() != PROMEDIO)
                    .map(|(_, s)| *s),
            );
            periods.insert(PROMEDIO.to_string(), average);
            Ok((books, average))
        })
    }

    pub fn entries(&self, student_id: &str) -> Result<Vec<serde_json::Value>, StoreError> {
        Ok(self
            .store
            .get_json(&grades_key(student_id))?
            .unwrap_or_default())
    }

    /// Appends to the free-form list. No score bound, no aggregation; an id
    /// is assigned when the entry carries none.
    pub fn add_entry(
        &self,
        student_id: &str,
        entry: serde_json::Value,
    ) -> Result<serde_json::Value, StoreError> {
        if !entry.is_object() {
            return Err(StoreError::invalid("grade entry must be an object"));
        }
        self.store.update_json(
            &grades_key(student_id),
            |current: Option<Vec<serde_json::Value>>| {
                let mut entries = current.unwrap_or_default();
                let mut entry = entry;
                if entry.get("id").is_none() {
                    let id = fresh_id(|candidate| {
                        entries
                            .iter()
                            .any(|e| e.get("id").and_then(|v| v.as_str()) == Some(candidate))
                    });
                    entry["id"] = json!(id);
                }
                entries.push(entry.clone());
                Ok((entries, entry))
            },
        )
    }
}
