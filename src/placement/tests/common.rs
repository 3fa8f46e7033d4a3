use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::placement::bank::QuestionBank;
use crate::placement::domain::{AnswerValue, QuizAnswer, StudentId};
use crate::placement::repository::{
    MailerError, NurtureMailer, NurtureRequest, PlacementRecord, PlacementRepository,
    RepositoryError,
};
use crate::placement::scoring::{PlacementConfig, PlacementEngine};
use crate::placement::service::PlacementService;

pub(super) fn placement_config() -> PlacementConfig {
    PlacementConfig::default()
}

pub(super) fn engine() -> PlacementEngine {
    PlacementEngine::new(
        placement_config(),
        Arc::new(QuestionBank::standard().clone()),
    )
}

pub(super) fn text(question_id: &str, value: &str) -> QuizAnswer {
    QuizAnswer::new(question_id, AnswerValue::text(value))
}

pub(super) fn number(question_id: &str, value: f64) -> QuizAnswer {
    QuizAnswer::new(question_id, AnswerValue::Numeric(value))
}

pub(super) fn correct(question_id: &str) -> QuizAnswer {
    QuizAnswer::graded(question_id, AnswerValue::text("answer"), true)
}

pub(super) fn wrong(question_id: &str) -> QuizAnswer {
    QuizAnswer::graded(question_id, AnswerValue::text("answer"), false)
}

/// Age eight learner who aces math, struggles with writing, and leans visual.
pub(super) fn explorer_answers() -> Vec<QuizAnswer> {
    vec![
        text("bg-1", "8"),
        text("bg-2", "Seeing pictures or a demonstration"),
        text("bg-3", "Drawing or making a comic"),
        text("bg-4", "Hearing the steps out loud"),
        correct("math-3"),
        correct("math-4"),
        correct("reading-2"),
        wrong("reading-3"),
        wrong("writing-2"),
        number("math-self", 5.0),
        number("reading-self", 3.0),
        number("writing-self", 1.0),
        text("nd-1", "Often"),
        text("nd-2", "Rarely"),
        text("nd-3", "Sometimes"),
        text("nd-4", "Often"),
    ]
}

pub(super) fn student(id: &str) -> StudentId {
    StudentId(id.to_string())
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<HashMap<StudentId, PlacementRecord>>,
}

impl PlacementRepository for MemoryRepository {
    fn save(&self, record: PlacementRecord) -> Result<PlacementRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.student_id.clone(), record.clone());
        Ok(record)
    }

    fn latest(&self, student_id: &StudentId) -> Result<Option<PlacementRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(student_id).cloned())
    }
}

pub(super) struct UnavailableRepository;

impl PlacementRepository for UnavailableRepository {
    fn save(&self, _record: PlacementRecord) -> Result<PlacementRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn latest(&self, _student_id: &StudentId) -> Result<Option<PlacementRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryMailer {
    pub(super) requests: Mutex<Vec<NurtureRequest>>,
}

impl NurtureMailer for MemoryMailer {
    fn trigger(&self, request: NurtureRequest) -> Result<(), MailerError> {
        self.requests
            .lock()
            .expect("mailer mutex poisoned")
            .push(request);
        Ok(())
    }
}

pub(super) struct FailingMailer;

impl NurtureMailer for FailingMailer {
    fn trigger(&self, _request: NurtureRequest) -> Result<(), MailerError> {
        Err(MailerError::Transport("smtp timeout".to_string()))
    }
}

pub(super) fn memory_service() -> (
    Arc<PlacementService<MemoryRepository, MemoryMailer>>,
    Arc<MemoryRepository>,
    Arc<MemoryMailer>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let mailer = Arc::new(MemoryMailer::default());
    let service = Arc::new(PlacementService::new(
        engine(),
        repository.clone(),
        mailer.clone(),
    ));
    (service, repository, mailer)
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("valid json")
}
