use crate::error::StoreError;
use crate::model::{fresh_id, Level, NewStudent, Student, StudentPatch};
use crate::store::{KvStore, STUDENTS_KEY};

/// Owns the student collection and student-code generation.
pub struct StudentRepo<'a> {
    store: &'a KvStore,
}

impl<'a> StudentRepo<'a> {
    pub fn new(store: &'a KvStore) -> Self {
        StudentRepo { store }
    }

    pub fn list(&self) -> Result<Vec<Student>, StoreError> {
        Ok(self.store.get_json(STUDENTS_KEY)?.unwrap_or_default())
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Student>, StoreError> {
        Ok(self.list()?.into_iter().find(|s| s.id == id))
    }

    pub fn get_by_code(&self, code: &str) -> Result<Option<Student>, StoreError> {
        Ok(self.list()?.into_iter().find(|s| s.student_code == code))
    }

    pub fn generate_code(
        &self,
        level: Level,
        grade: &str,
        section: &str,
    ) -> Result<String, StoreError> {
        Ok(next_code(&self.list()?, level, grade, section))
    }

    pub fn add(&self, new: NewStudent) -> Result<Student, StoreError> {
        self.store
            .update_json(STUDENTS_KEY, |current: Option<Vec<Student>>| {
                let mut students = current.unwrap_or_default();
                let student_code = match new.student_code {
                    Some(code) => {
                        if students.iter().any(|s| s.student_code == code) {
                            return Err(StoreError::invalid(format!(
                                "student code {code} is already assigned"
                            )));
                        }
                        code
                    }
                    None => next_code(&students, new.level, &new.grade, &new.section),
                };
                let id = fresh_id(|id| students.iter().any(|s| s.id == id));
                let student = Student {
                    id,
                    first_name: new.first_name,
                    last_name: new.last_name,
                    student_code,
                    level: new.level,
                    section: new.section,
                    grade: new.grade,
                    parent_id: new.parent_id,
                    photo_url: new.photo_url,
                };
                students.push(student.clone());
                Ok((students, student))
            })
    }

    /// Shallow merge of the patch into the stored record.
    pub fn update(&self, id: &str, patch: StudentPatch) -> Result<Student, StoreError> {
        self.store
            .update_json(STUDENTS_KEY, |current: Option<Vec<Student>>| {
                let mut students = current.unwrap_or_default();
                let idx = students
                    .iter()
                    .position(|s| s.id == id)
                    .ok_or_else(|| StoreError::not_found(format!("student {id}")))?;
                if let Some(code) = &patch.student_code {
                    if students
                        .iter()
                        .any(|s| s.id != id && s.student_code == *code)
                    {
                        return Err(StoreError::invalid(format!(
                            "student code {code} is already assigned"
                        )));
                    }
                }
                let student = &mut students[idx];
                if let Some(v) = patch.first_name {
                    student.first_name = v;
                }
                if let Some(v) = patch.last_name {
                    student.last_name = v;
                }
                if let Some(v) = patch.student_code {
                    student.student_code = v;
                }
                if let Some(v) = patch.level {
                    student.level = v;
                }
                if let Some(v) = patch.section {
                    student.section = v;
                }
                if let Some(v) = patch.grade {
                    student.grade = v;
                }
                if let Some(v) = patch.parent_id {
                    student.parent_id = Some(v);
                }
                if let Some(v) = patch.photo_url {
                    student.photo_url = Some(v);
                }
                let updated = student.clone();
                Ok((students, updated))
            })
    }

    /// Removes the student row only; attendance and grade rows referencing
    /// the id are left in place.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.store
            .update_json(STUDENTS_KEY, |current: Option<Vec<Student>>| {
                let mut students = current.unwrap_or_default();
                let before = students.len();
                students.retain(|s| s.id != id);
                let removed = students.len() != before;
                Ok((students, removed))
            })
    }
}

/// Deterministic code generation: `<prefix><gradeNumber><section>` plus the
/// next free 3-digit sequence scoped to that base. The sequence is one past
/// the highest suffix in use, so deleting a student never frees a code for
/// reuse.
pub(crate) fn next_code(students: &[Student], level: Level, grade: &str, section: &str) -> String {
    let base = code_base(level, grade, section);
    let next = students
        .iter()
        .filter_map(|s| s.student_code.strip_prefix(base.as_str()))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .unwrap_or(0)
        + 1;
    format!("{base}{next:03}")
}

fn code_base(level: Level, grade: &str, section: &str) -> String {
    let prefix = level.code_prefix();
    match level {
        // Initial grades carry no numeric grade ("Sección II"); the roman
        // section label fills the grade slot of the code.
        Level::Initial => format!("{prefix}{section}"),
        Level::Primary => {
            let grade_number: String = grade
                .chars()
                .skip_while(|c| !c.is_ascii_digit())
                .take_while(|c| c.is_ascii_digit())
                .collect();
            format!("{prefix}{grade_number}{section}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str, code: &str) -> Student {
        Student {
            id: id.to_string(),
            first_name: "Test".to_string(),
            last_name: "Student".to_string(),
            student_code: code.to_string(),
            level: Level::Primary,
            section: "A".to_string(),
            grade: "3° Grado".to_string(),
            parent_id: None,
            photo_url: None,
        }
    }

    #[test]
    fn first_code_for_an_empty_collection() {
        assert_eq!(
            next_code(&[], Level::Primary, "3° Grado", "A"),
            "B3A001"
        );
    }

    #[test]
    fn sequence_advances_within_the_code_base() {
        let students = vec![student("1", "B3A001")];
        assert_eq!(
            next_code(&students, Level::Primary, "3° Grado", "A"),
            "B3A002"
        );
    }

    #[test]
    fn other_code_bases_do_not_interfere() {
        let students = vec![student("1", "B3B007"), student("2", "B001")];
        assert_eq!(
            next_code(&students, Level::Primary, "3° Grado", "A"),
            "B3A001"
        );
    }

    #[test]
    fn deleted_sequence_numbers_are_not_reused() {
        // Only 002 remains after 001 was deleted; the next code skips past
        // the highest suffix ever seen in the collection.
        let students = vec![student("2", "B3A002")];
        assert_eq!(
            next_code(&students, Level::Primary, "3° Grado", "A"),
            "B3A003"
        );
    }

    #[test]
    fn initial_level_codes_use_the_section_label() {
        assert_eq!(next_code(&[], Level::Initial, "Sección II", "II"), "AII001");
    }
}
