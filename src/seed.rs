//! Demo datasets and the default weekly schedule template.
//!
//! Seeding is an explicit operation (`demo.seed` over IPC), never an
//! open-time side effect; each collection is only written when its key is
//! absent.

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

use crate::calc::promedio;
use crate::model::{FaceProfile, Level, Notification, Student};
use crate::repo::grades::{GradeBook, SubjectGrades, PROMEDIO};
use crate::repo::schedule::{DaySchedule, WeekSchedule};

pub fn demo_students() -> Vec<Student> {
    let student = |id: &str,
                   first: &str,
                   last: &str,
                   code: &str,
                   level: Level,
                   section: &str,
                   grade: &str,
                   parent: &str| Student {
        id: id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        student_code: code.to_string(),
        level,
        section: section.to_string(),
        grade: grade.to_string(),
        parent_id: Some(parent.to_string()),
        photo_url: None,
    };
    vec![
        student("1", "Ana", "García", "B001", Level::Primary, "3", "3° Grado", "101"),
        student("2", "Carlos", "López", "B002", Level::Primary, "3", "3° Grado", "102"),
        student("3", "María", "Rodríguez", "A001", Level::Initial, "II", "Sección II", "103"),
        student("4", "Juan", "Pérez", "B003", Level::Primary, "1", "1° Grado", "104"),
        student("5", "Laura", "Martínez", "A002", Level::Initial, "I", "Sección I", "105"),
    ]
}

/// Per-student subject/period grade books on the 0-20 scale. Promedio is
/// computed here rather than hand-written, so the seed can never violate
/// the aggregate invariant.
pub fn demo_grade_books() -> BTreeMap<String, GradeBook> {
    let trimesters = ["Primer Trimestre", "Segundo Trimestre", "Tercer Trimestre"];
    let subjects = |rows: &[(&str, [f64; 3])]| -> GradeBook {
        rows.iter()
            .map(|(subject, scores)| {
                let mut periods: SubjectGrades = trimesters
                    .iter()
                    .zip(scores.iter())
                    .map(|(period, score)| (period.to_string(), *score))
                    .collect();
                periods.insert(PROMEDIO.to_string(), promedio(scores.iter().copied()));
                (subject.to_string(), periods)
            })
            .collect()
    };
    let mut books = BTreeMap::new();
    books.insert(
        "1".to_string(),
        subjects(&[
            ("Matemáticas", [16.0, 18.0, 17.0]),
            ("Comunicación", [15.0, 14.0, 16.0]),
            ("Ciencias", [18.0, 19.0, 20.0]),
            ("Historia", [14.0, 13.0, 15.0]),
        ]),
    );
    books.insert(
        "2".to_string(),
        subjects(&[
            ("Matemáticas", [19.0, 20.0, 18.0]),
            ("Comunicación", [17.0, 16.0, 18.0]),
            ("Ciencias", [16.0, 15.0, 17.0]),
            ("Historia", [18.0, 17.0, 19.0]),
        ]),
    );
    books.insert(
        "3".to_string(),
        subjects(&[
            ("Matemáticas", [10.0, 12.0, 14.0]),
            ("Comunicación", [13.0, 12.0, 11.0]),
            ("Ciencias", [9.0, 10.0, 12.0]),
            ("Historia", [11.0, 13.0, 12.0]),
        ]),
    );
    books.insert(
        "4".to_string(),
        subjects(&[
            ("Matemáticas", [14.0, 15.0, 16.0]),
            ("Comunicación", [18.0, 17.0, 19.0]),
            ("Ciencias", [16.0, 15.0, 17.0]),
            ("Historia", [15.0, 16.0, 14.0]),
        ]),
    );
    books.insert(
        "5".to_string(),
        subjects(&[
            ("Matemáticas", [8.0, 10.0, 12.0]),
            ("Comunicación", [11.0, 13.0, 12.0]),
            ("Ciencias", [9.0, 11.0, 10.0]),
            ("Historia", [12.0, 10.0, 11.0]),
        ]),
    );
    books
}

/// Recognition profiles for the demo students; each starts with a
/// registered face so the stub matcher has something to pick from.
pub fn demo_face_profiles() -> Vec<FaceProfile> {
    demo_students()
        .into_iter()
        .map(|s| FaceProfile {
            face_id: Some(format!("face_{}", s.id)),
            name: format!("{} {}", s.first_name, s.last_name),
            grade: s.grade,
            id: s.id,
        })
        .collect()
}

/// The fixed weekly grid the app ships with.
pub fn default_schedule() -> WeekSchedule {
    let day = |slots: &[(&str, &str, &str, &str)]| -> DaySchedule {
        slots
            .iter()
            .map(|(slot, subject, teacher, room)| {
                (
                    slot.to_string(),
                    crate::model::ClassInfo {
                        subject: subject.to_string(),
                        teacher: teacher.to_string(),
                        room: room.to_string(),
                    },
                )
            })
            .collect()
    };
    let mut week = WeekSchedule::new();
    week.insert(
        "Lunes".to_string(),
        day(&[
            ("7:00 - 8:00", "Matemáticas", "Prof. García", "A101"),
            ("8:00 - 9:00", "Español", "Prof. Rodríguez", "A102"),
            ("9:00 - 10:00", "Ciencias", "Prof. López", "B201"),
            ("10:00 - 11:00", "Recreo", "", "Patio"),
            ("11:00 - 12:00", "Historia", "Prof. Martínez", "A103"),
            ("12:00 - 13:00", "Inglés", "Prof. Smith", "B202"),
            ("13:00 - 14:00", "Educación Física", "Prof. Hernández", "Gimnasio"),
        ]),
    );
    week.insert(
        "Martes".to_string(),
        day(&[
            ("7:00 - 8:00", "Ciencias", "Prof. López", "B201"),
            ("8:00 - 9:00", "Matemáticas", "Prof. García", "A101"),
            ("9:00 - 10:00", "Inglés", "Prof. Smith", "B202"),
            ("10:00 - 11:00", "Recreo", "", "Patio"),
            ("11:00 - 12:00", "Español", "Prof. Rodríguez", "A102"),
            ("12:00 - 13:00", "Arte", "Prof. Gómez", "C301"),
            ("13:00 - 14:00", "Tutoría", "Prof. Martínez", "A103"),
        ]),
    );
    week.insert(
        "Miércoles".to_string(),
        day(&[
            ("7:00 - 8:00", "Historia", "Prof. Martínez", "A103"),
            ("8:00 - 9:00", "Ciencias", "Prof. López", "B201"),
            ("9:00 - 10:00", "Matemáticas", "Prof. García", "A101"),
            ("10:00 - 11:00", "Recreo", "", "Patio"),
            ("11:00 - 12:00", "Educación Física", "Prof. Hernández", "Gimnasio"),
            ("12:00 - 13:00", "Español", "Prof. Rodríguez", "A102"),
            ("13:00 - 14:00", "Tecnología", "Prof. Ramírez", "Lab 1"),
        ]),
    );
    week.insert(
        "Jueves".to_string(),
        day(&[
            ("7:00 - 8:00", "Inglés", "Prof. Smith", "B202"),
            ("8:00 - 9:00", "Historia", "Prof. Martínez", "A103"),
            ("9:00 - 10:00", "Español", "Prof. Rodríguez", "A102"),
            ("10:00 - 11:00", "Recreo", "", "Patio"),
            ("11:00 - 12:00", "Matemáticas", "Prof. García", "A101"),
            ("12:00 - 13:00", "Ciencias", "Prof. López", "B201"),
            ("13:00 - 14:00", "Música", "Prof. Torres", "Auditorio"),
        ]),
    );
    week.insert(
        "Viernes".to_string(),
        day(&[
            ("7:00 - 8:00", "Educación Física", "Prof. Hernández", "Gimnasio"),
            ("8:00 - 9:00", "Tecnología", "Prof. Ramírez", "Lab 1"),
            ("9:00 - 10:00", "Matemáticas", "Prof. García", "A101"),
            ("10:00 - 11:00", "Recreo", "", "Patio"),
            ("11:00 - 12:00", "Ciencias", "Prof. López", "B201"),
            ("12:00 - 13:00", "Español", "Prof. Rodríguez", "A102"),
            ("13:00 - 14:00", "Arte", "Prof. Gómez", "C301"),
        ]),
    );
    week
}

pub fn example_notifications(now: DateTime<Utc>) -> Vec<Notification> {
    let note = |id: &str, title: &str, message: &str, age_days: i64| Notification {
        id: id.to_string(),
        title: title.to_string(),
        message: message.to_string(),
        read: false,
        created_at: (now - Duration::days(age_days)).to_rfc3339(),
        read_at: None,
    };
    vec![
        note(
            "1",
            "Bienvenido a kAIros",
            "Gracias por usar nuestra aplicación de gestión escolar inteligente.",
            0,
        ),
        note(
            "2",
            "Reunión de padres",
            "Se le recuerda que la reunión de padres está programada para el próximo viernes a las 18:00.",
            1,
        ),
        note(
            "3",
            "Entrega de calificaciones",
            "Las calificaciones del primer trimestre ya están disponibles en la plataforma.",
            2,
        ),
        note(
            "4",
            "Actualización del sistema",
            "Hemos actualizado la aplicación con nuevas funcionalidades. ¡Explora las novedades!",
            3,
        ),
    ]
}
