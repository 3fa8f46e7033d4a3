use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{PlacementResult, QuizAnswer, StudentId, Tier};

/// Persisted placement alongside the raw answers kept for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub student_id: StudentId,
    pub result: PlacementResult,
    pub answers: Vec<QuizAnswer>,
    pub completed_at: DateTime<Utc>,
}

impl PlacementRecord {
    pub fn view(&self) -> PlacementRecordView {
        PlacementRecordView {
            student_id: self.student_id.clone(),
            tier: self.result.tier,
            summary: self.result.summary(),
            recommended_start_quest: self.result.recommended_start_quest.clone(),
            answered_questions: self.answers.len(),
            completed_at: self.completed_at,
            result: self.result.clone(),
        }
    }
}

/// Storage abstraction so the service can run against the hosted database or memory.
pub trait PlacementRepository: Send + Sync {
    fn save(&self, record: PlacementRecord) -> Result<PlacementRecord, RepositoryError>;
    fn latest(&self, student_id: &StudentId) -> Result<Option<PlacementRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook that starts a family e-mail sequence.
pub trait NurtureMailer: Send + Sync {
    fn trigger(&self, request: NurtureRequest) -> Result<(), MailerError>;
}

/// Payload handed to the mail service once a placement is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NurtureRequest {
    pub template: String,
    pub student_id: StudentId,
    pub details: BTreeMap<String, String>,
}

impl NurtureRequest {
    pub fn placement_complete(student_id: &StudentId, result: &PlacementResult) -> Self {
        let mut details = BTreeMap::new();
        details.insert("tier".to_string(), result.tier.label().to_string());
        details.insert(
            "overall_level".to_string(),
            result.overall_level.to_string(),
        );
        details.insert(
            "start_quest".to_string(),
            result.recommended_start_quest.clone(),
        );
        if !result.neurodivergent_supports.is_empty() {
            details.insert("supports_suggested".to_string(), "true".to_string());
        }

        Self {
            template: "placement_complete".to_string(),
            student_id: student_id.clone(),
            details,
        }
    }
}

/// Mail dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
}

/// Public representation of a stored placement.
#[derive(Debug, Clone, Serialize)]
pub struct PlacementRecordView {
    pub student_id: StudentId,
    pub tier: Tier,
    pub summary: String,
    pub recommended_start_quest: String,
    pub answered_questions: usize,
    pub completed_at: DateTime<Utc>,
    pub result: PlacementResult,
}
