use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::StoreError;
use crate::model::{FaceProfile, MatchResult, Student};
use crate::store::{KvStore, FACE_DATA_KEY};

/// Owns the registered face-profile collection and the recognition
/// contract: `recognize(image) -> Match | NoMatch`.
pub struct RecognitionRepo<'a> {
    store: &'a KvStore,
}

impl<'a> RecognitionRepo<'a> {
    pub fn new(store: &'a KvStore) -> Self {
        RecognitionRepo { store }
    }

    pub fn profiles(&self) -> Result<Vec<FaceProfile>, StoreError> {
        Ok(self.store.get_json(FACE_DATA_KEY)?.unwrap_or_default())
    }

    /// Stub matcher. The captured image is never inspected; a registered
    /// profile is drawn uniformly at random and the confidence is
    /// fabricated, exactly as the app has always behaved. A real pipeline
    /// would replace this method and keep the contract.
    pub fn recognize(&self, _image_ref: &str) -> Result<MatchResult, StoreError> {
        let profiles = self.profiles()?;
        let mut rng = rand::thread_rng();
        let Some(profile) = profiles.choose(&mut rng) else {
            return Ok(MatchResult::NoMatch);
        };
        Ok(MatchResult::Match {
            student_id: profile.id.clone(),
            name: profile.name.clone(),
            grade: profile.grade.clone(),
            confidence: rng.gen_range(0.80..0.99),
        })
    }

    /// Creates a profile for a student not yet in the registry.
    pub fn enroll(&self, student: &Student) -> Result<FaceProfile, StoreError> {
        let profile = FaceProfile {
            id: student.id.clone(),
            name: format!("{} {}", student.first_name, student.last_name),
            grade: student.grade.clone(),
            face_id: None,
        };
        self.store
            .update_json(FACE_DATA_KEY, |current: Option<Vec<FaceProfile>>| {
                let mut profiles = current.unwrap_or_default();
                if profiles.iter().any(|p| p.id == profile.id) {
                    return Err(StoreError::invalid(format!(
                        "student {} is already enrolled",
                        profile.id
                    )));
                }
                profiles.push(profile.clone());
                Ok((profiles, profile))
            })
    }

    /// Stamps a fresh face id on an enrolled profile. The image itself is
    /// not stored; only the opaque handle-derived id is.
    pub fn register_face(
        &self,
        student_id: &str,
        _image_ref: &str,
    ) -> Result<FaceProfile, StoreError> {
        self.store
            .update_json(FACE_DATA_KEY, |current: Option<Vec<FaceProfile>>| {
                let mut profiles = current.unwrap_or_default();
                let profile = profiles
                    .iter_mut()
                    .find(|p| p.id == student_id)
                    .ok_or_else(|| {
                        StoreError::not_found(format!("face profile for student {student_id}"))
                    })?;
                profile.face_id = Some(format!(
                    "face_{student_id}_{}",
                    Utc::now().timestamp_millis()
                ));
                let updated = profile.clone();
                Ok((profiles, updated))
            })
    }

    pub fn has_face(&self, student_id: &str) -> Result<bool, StoreError> {
        Ok(self
            .profiles()?
            .into_iter()
            .find(|p| p.id == student_id)
            .map(|p| p.face_id.is_some())
            .unwrap_or(false))
    }
}
