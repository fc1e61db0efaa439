use chrono::Utc;
use serde::{Deserialize, Serialize};

/// School level. Wire values stay Spanish for compatibility with blobs
/// written by earlier versions of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "inicial")]
    Initial,
    #[serde(rename = "primaria")]
    Primary,
}

impl Level {
    pub fn code_prefix(self) -> char {
        match self {
            Level::Initial => 'A',
            Level::Primary => 'B',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub student_code: String,
    pub level: Level,
    pub section: String,
    /// Display label derived from level and section, e.g. "Sección II",
    /// "3° Grado". Stored as written by the client.
    pub grade: String,
    pub parent_id: Option<String>,
    pub photo_url: Option<String>,
}

/// Input for `students.add`. The code is generated when absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub student_code: Option<String>,
    pub level: Level,
    pub section: String,
    pub grade: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Partial update for `students.update`; absent fields keep their value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatch {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub student_code: Option<String>,
    #[serde(default)]
    pub level: Option<Level>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    #[serde(rename = "presente")]
    Present,
    #[serde(rename = "ausente")]
    Absent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub student_id: String,
    /// Calendar date of the record, ISO `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`, only set when the student is present.
    pub arrival_time: Option<String>,
    pub status: AttendanceStatus,
    /// Only set when the student is absent; defaults to the record date.
    pub absence_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub subject: String,
    pub teacher: String,
    pub room: String,
}

/// One schedule hit from the per-teacher grid scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherClass {
    pub day: String,
    pub time_slot: String,
    #[serde(flatten)]
    pub info: ClassInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentClass {
    pub time_slot: String,
    #[serde(flatten)]
    pub info: ClassInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceProfile {
    pub id: String,
    pub name: String,
    pub grade: String,
    pub face_id: Option<String>,
}

/// Outcome of the recognition contract:
/// `recognize(image) -> Match { studentId, confidence } | NoMatch`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum MatchResult {
    Match {
        student_id: String,
        name: String,
        grade: String,
        confidence: f64,
    },
    NoMatch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: String,
    #[serde(default)]
    pub read_at: Option<String>,
}

/// Current-time-derived id, bumped past any taken value so two entities
/// created in the same millisecond still get distinct ids.
pub(crate) fn fresh_id(mut is_taken: impl FnMut(&str) -> bool) -> String {
    let mut candidate = Utc::now().timestamp_millis();
    loop {
        let id = candidate.to_string();
        if !is_taken(&id) {
            return id;
        }
        candidate += 1;
    }
}

/// Strips an accidental time component off a stored date string, so
/// `2025-03-10T08:00:00Z` and `2025-03-10` compare equal.
pub(crate) fn date_only(date: &str) -> &str {
    date.split('T').next().unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_round_trips_without_field_drops() {
        let student = Student {
            id: "1700000000000".to_string(),
            first_name: "Ana".to_string(),
            last_name: "García".to_string(),
            student_code: "B3A001".to_string(),
            level: Level::Primary,
            section: "A".to_string(),
            grade: "3° Grado".to_string(),
            parent_id: Some("101".to_string()),
            photo_url: None,
        };
        let raw = serde_json::to_string(&student).expect("serialize");
        let back: Student = serde_json::from_str(&raw).expect("deserialize");
        assert_eq!(back, student);
        // Spanish wire value for the level enum.
        assert!(raw.contains("\"level\":\"primaria\""));
    }

    #[test]
    fn attendance_record_round_trips_and_keeps_status_wire_values() {
        let record = AttendanceRecord {
            id: "1700000000001".to_string(),
            student_id: "1".to_string(),
            date: "2025-03-10".to_string(),
            arrival_time: Some("08:05".to_string()),
            status: AttendanceStatus::Present,
            absence_date: None,
        };
        let raw = serde_json::to_string(&record).expect("serialize");
        assert!(raw.contains("\"status\":\"presente\""));
        let back: AttendanceRecord = serde_json::from_str(&raw).expect("deserialize");
        assert_eq!(back, record);
    }

    #[test]
    fn date_only_tolerates_full_timestamps() {
        assert_eq!(date_only("2025-03-10"), "2025-03-10");
        assert_eq!(date_only("2025-03-10T08:00:00.000Z"), "2025-03-10");
    }

    #[test]
    fn fresh_id_bumps_past_taken_values() {
        let mut taken = Vec::new();
        let a = fresh_id(|id| taken.contains(&id.to_string()));
        taken.push(a.clone());
        let b = fresh_id(|id| taken.contains(&id.to_string()));
        assert_ne!(a, b);
    }
}
