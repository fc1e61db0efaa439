use chrono::{Datelike, Local, NaiveDateTime, Timelike, Weekday};
use std::collections::BTreeMap;

use crate::error::StoreError;
use crate::model::{ClassInfo, CurrentClass, TeacherClass};
use crate::seed;
use crate::store::{KvStore, SCHEDULE_KEY};

pub const WEEKDAYS: [&str; 5] = ["Lunes", "Martes", "Miércoles", "Jueves", "Viernes"];

pub type DaySchedule = BTreeMap<String, ClassInfo>;
pub type WeekSchedule = BTreeMap<String, DaySchedule>;

fn weekday_name(weekday: Weekday) -> Option<&'static str> {
    match weekday {
        Weekday::Mon => Some("Lunes"),
        Weekday::Tue => Some("Martes"),
        Weekday::Wed => Some("Miércoles"),
        Weekday::Thu => Some("Jueves"),
        Weekday::Fri => Some("Viernes"),
        Weekday::Sat | Weekday::Sun => None,
    }
}

/// Owns the weekly schedule grid, keyed day -> time slot.
pub struct ScheduleRepo<'a> {
    store: &'a KvStore,
}

impl<'a> ScheduleRepo<'a> {
    pub fn new(store: &'a KvStore) -> Self {
        ScheduleRepo { store }
    }

    /// Seeds the default weekly template on first use.
    pub fn ensure_default(&self) -> Result<bool, StoreError> {
        if self.store.contains(SCHEDULE_KEY)? {
            return Ok(false);
        }
        self.store.set_json(SCHEDULE_KEY, &seed::default_schedule())?;
        Ok(true)
    }

    pub fn full(&self) -> Result<WeekSchedule, StoreError> {
        Ok(self.store.get_json(SCHEDULE_KEY)?.unwrap_or_default())
    }

    pub fn for_day(&self, day: &str) -> Result<DaySchedule, StoreError> {
        Ok(self.full()?.remove(day).unwrap_or_default())
    }

    /// Upserts one class; (day, timeSlot) identifies at most one entry and
    /// the day bucket is created when missing.
    pub fn update_class(
        &self,
        day: &str,
        time_slot: &str,
        info: ClassInfo,
    ) -> Result<(), StoreError> {
        self.store
            .update_json(SCHEDULE_KEY, |current: Option<WeekSchedule>| {
                let mut week = current.unwrap_or_default();
                week.entry(day.to_string())
                    .or_default()
                    .insert(time_slot.to_string(), info);
                Ok((week, ()))
            })
    }

    /// Full grid scan, exact match on the teacher field. Results come back
    /// in weekday order, then by slot.
    pub fn for_teacher(&self, teacher: &str) -> Result<Vec<TeacherClass>, StoreError> {
        let mut classes = Vec::new();
        for (day, slots) in self.full()? {
            for (time_slot, info) in slots {
                if info.teacher == teacher {
                    classes.push(TeacherClass {
                        day: day.clone(),
                        time_slot,
                        info,
                    });
                }
            }
        }
        classes.sort_by_key(|c| {
            (
                WEEKDAYS
                    .iter()
                    .position(|d| *d == c.day)
                    .unwrap_or(WEEKDAYS.len()),
                c.time_slot.clone(),
            )
        });
        Ok(classes)
    }

    pub fn current(&self) -> Result<Vec<CurrentClass>, StoreError> {
        self.current_at(Local::now().naive_local())
    }

    /// Classes in progress at the given wall-clock time. Weekends have no
    /// classes regardless of the hour; slots whose label does not parse as
    /// `"H:MM - H:MM"` are skipped.
    pub fn current_at(&self, now: NaiveDateTime) -> Result<Vec<CurrentClass>, StoreError> {
        let Some(day) = weekday_name(now.weekday()) else {
            return Ok(Vec::new());
        };
        let hour = now.hour();
        let mut classes = Vec::new();
        for (time_slot, info) in self.for_day(day)? {
            let Some((start, end)) = slot_hours(&time_slot) else {
                continue;
            };
            if start <= hour && hour < end {
                classes.push(CurrentClass { time_slot, info });
            }
        }
        Ok(classes)
    }
}

/// Hour bounds of a `"7:00 - 8:00"` slot label.
fn slot_hours(slot: &str) -> Option<(u32, u32)> {
    let (start, end) = slot.split_once('-')?;
    let hour = |s: &str| s.trim().split(':').next()?.parse::<u32>().ok();
    Some((hour(start)?, hour(end)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_store(prefix: &str) -> KvStore {
        let workspace: PathBuf = std::env::temp_dir().join(format!(
            "{}-{}",
            prefix,
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ));
        KvStore::open(&workspace).expect("open store")
    }

    fn at(date: (i32, u32, u32), hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(date.0, date.1, date.2)
            .expect("valid date")
            .and_hms_opt(hour, 30, 0)
            .expect("valid time")
    }

    #[test]
    fn slot_hours_parses_the_template_labels() {
        assert_eq!(slot_hours("7:00 - 8:00"), Some((7, 8)));
        assert_eq!(slot_hours("13:00 - 14:00"), Some((13, 14)));
        assert_eq!(slot_hours("Recreo"), None);
    }

    #[test]
    fn weekend_has_no_current_classes_regardless_of_hour() {
        let store = temp_store("kairos-schedule-weekend");
        let repo = ScheduleRepo::new(&store);
        repo.ensure_default().expect("seed");
        // 2025-03-08 is a Saturday, 2025-03-09 a Sunday.
        assert!(repo.current_at(at((2025, 3, 8), 9)).expect("sat").is_empty());
        assert!(repo.current_at(at((2025, 3, 9), 9)).expect("sun").is_empty());
    }

    #[test]
    fn current_class_matches_the_in_progress_slot() {
        let store = temp_store("kairos-schedule-current");
        let repo = ScheduleRepo::new(&store);
        repo.ensure_default().expect("seed");
        // 2025-03-10 is a Monday; 9:30 falls inside "9:00 - 10:00".
        let classes = repo.current_at(at((2025, 3, 10), 9)).expect("current");
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].time_slot, "9:00 - 10:00");
        assert_eq!(classes[0].info.subject, "Ciencias");
    }

    #[test]
    fn out_of_hours_weekday_has_no_current_classes() {
        let store = temp_store("kairos-schedule-late");
        let repo = ScheduleRepo::new(&store);
        repo.ensure_default().expect("seed");
        let classes = repo.current_at(at((2025, 3, 10), 20)).expect("current");
        assert!(classes.is_empty());
    }

    #[test]
    fn ensure_default_seeds_only_once() {
        let store = temp_store("kairos-schedule-seed");
        let repo = ScheduleRepo::new(&store);
        assert!(repo.ensure_default().expect("first"));
        assert!(!repo.ensure_default().expect("second"));
    }
}
