use serde::Serialize;

use crate::model::{date_only, AttendanceRecord, AttendanceStatus};

/// Rounding rule used for Promedio everywhere in the app:
/// round-half-up, `floor(x + 0.5)`, so 17.5 rounds to 18.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Round-half-up mean of a set of period scores; 0 when empty.
pub fn promedio<I>(scores: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut sum = 0.0;
    let mut count: usize = 0;
    for score in scores {
        sum += score;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        round_half_up(sum / count as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub present_pct: f64,
    pub absent_pct: f64,
}

/// Attendance counts and percentages over an inclusive date range. ISO
/// dates compare correctly as strings, so the filter is lexicographic.
pub fn attendance_stats<'a, I>(records: I, start_date: &str, end_date: &str) -> AttendanceStats
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut total: usize = 0;
    let mut present: usize = 0;
    let mut absent: usize = 0;
    for record in records {
        let date = date_only(&record.date);
        if date < start_date || date > end_date {
            continue;
        }
        total += 1;
        match record.status {
            AttendanceStatus::Present => present += 1,
            AttendanceStatus::Absent => absent += 1,
        }
    }
    let pct = |count: usize| {
        if total == 0 {
            0.0
        } else {
            100.0 * count as f64 / total as f64
        }
    };
    AttendanceStats {
        total,
        present,
        absent,
        present_pct: pct(present),
        absent_pct: pct(absent),
    }
}
