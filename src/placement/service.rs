use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{PlacementResult, QuizAnswer, QuizQuestion, StudentId};
use super::filter::filter_questions_with_preview;
use super::repository::{
    NurtureMailer, NurtureRequest, PlacementRecord, PlacementRepository,
    RepositoryError,
};
use super::scoring::PlacementEngine;

/// Service composing the placement engine, repository, and nurture mailer.
pub struct PlacementService<R, M> {
    engine: Arc<PlacementEngine>,
    repository: Arc<R>,
    mailer: Arc<M>,
}

impl<R, M> PlacementService<R, M>
where
    R: PlacementRepository + 'static,
    M: NurtureMailer + 'static,
{
    pub fn new(engine: PlacementEngine, repository: Arc<R>, mailer: Arc<M>) -> Self {
        Self {
            engine: Arc::new(engine),
            repository,
            mailer,
        }
    }

    pub fn engine(&self) -> &PlacementEngine {
        &self.engine
    }

    /// Questions to present for the given age (or the opening prefix when unknown).
    pub fn questions_for(&self, age: Option<u32>) -> Vec<QuizQuestion> {
        filter_questions_with_preview(
            self.engine.bank().questions(),
            age,
            self.engine.config().preview_len,
        )
        .into_iter()
        .cloned()
        .collect()
    }

    /// Scores answers without persisting anything.
    pub fn preview(&self, answers: &[QuizAnswer]) -> PlacementResult {
        self.engine.score(answers)
    }

    /// Score a finished quiz, persist the placement, and start the nurture sequence.
    pub fn complete(
        &self,
        student_id: StudentId,
        answers: Vec<QuizAnswer>,
    ) -> Result<PlacementRecord, PlacementServiceError> {
        if student_id.0.trim().is_empty() {
            return Err(PlacementServiceError::InvalidStudent);
        }

        let result = self.engine.score(&answers);
        let record = PlacementRecord {
            student_id,
            result,
            answers,
            completed_at: Utc::now(),
        };

        let stored = self.repository.save(record)?;
        info!(
            student_id = %stored.student_id.0,
            tier = stored.result.tier.label(),
            start_quest = %stored.result.recommended_start_quest,
            "placement stored"
        );

        let request = NurtureRequest::placement_complete(&stored.student_id, &stored.result);
        if let Err(err) = self.mailer.trigger(request) {
            warn!(student_id = %stored.student_id.0, error = %err, "nurture sequence not started");
        }

        Ok(stored)
    }

    /// Fetch the most recent placement for a student.
    pub fn latest(&self, student_id: &StudentId) -> Result<PlacementRecord, PlacementServiceError> {
        let record = self
            .repository
            .latest(student_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the placement service.
#[derive(Debug, thiserror::Error)]
pub enum PlacementServiceError {
    #[error("student id must not be empty")]
    InvalidStudent,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
