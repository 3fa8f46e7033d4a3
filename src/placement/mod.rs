//! Placement quiz: question bank, age filter, caller-owned session, and the scoring engine.
//!
//! The engine itself is pure. Persistence and the family e-mail sequence sit behind the
//! [`PlacementRepository`] and [`NurtureMailer`] traits so the hosted backend can be swapped
//! for in-memory adapters in tests and demos.

pub mod bank;
pub mod domain;
pub mod filter;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use bank::{QuestionBank, QuestionBankError};
pub use domain::{
    AgeRange, AnswerValue, LearningStyle, PlacementResult, QuestionCategory, QuestionKind,
    QuizAnswer, QuizQuestion, StudentId, Subject, Tier,
};
pub use filter::{filter_questions_by_age, filter_questions_with_preview, DEFAULT_PREVIEW_LEN};
pub use repository::{
    MailerError, NurtureMailer, NurtureRequest, PlacementRecord, PlacementRecordView,
    PlacementRepository, RepositoryError,
};
pub use router::placement_router;
pub use scoring::{calculate_placement, overall_level, PlacementConfig, PlacementEngine};
pub use service::{PlacementService, PlacementServiceError};
pub use session::QuizSession;
