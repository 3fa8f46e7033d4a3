use kidquest_placement::config::PlacementSettings;
use kidquest_placement::error::AppError;
use kidquest_placement::placement::{
    MailerError, NurtureMailer, NurtureRequest, PlacementEngine, PlacementRecord,
    PlacementRepository, QuestionBank, RepositoryError, StudentId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Keeps every placement per student; the last entry is the latest.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPlacementRepository {
    records: Arc<Mutex<HashMap<StudentId, Vec<PlacementRecord>>>>,
}

impl InMemoryPlacementRepository {
    pub(crate) fn history(&self, student_id: &StudentId) -> Vec<PlacementRecord> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        guard.get(student_id).cloned().unwrap_or_default()
    }
}

impl PlacementRepository for InMemoryPlacementRepository {
    fn save(&self, record: PlacementRecord) -> Result<PlacementRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard
            .entry(record.student_id.clone())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    fn latest(&self, student_id: &StudentId) -> Result<Option<PlacementRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .get(student_id)
            .and_then(|records| records.last())
            .cloned())
    }
}

/// Stand-in for the hosted e-mail function; logs and remembers each request.
#[derive(Default, Clone)]
pub(crate) struct LoggingMailer {
    sent: Arc<Mutex<Vec<NurtureRequest>>>,
}

impl NurtureMailer for LoggingMailer {
    fn trigger(&self, request: NurtureRequest) -> Result<(), MailerError> {
        info!(
            template = %request.template,
            student_id = %request.student_id.0,
            "nurture sequence queued"
        );
        let mut guard = self.sent.lock().expect("mailer mutex poisoned");
        guard.push(request);
        Ok(())
    }
}

impl LoggingMailer {
    pub(crate) fn sent(&self) -> Vec<NurtureRequest> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

/// Engine over the configured bank (or the bundled one) with the configured thresholds.
pub(crate) fn build_engine(settings: &PlacementSettings) -> Result<PlacementEngine, AppError> {
    let bank = match &settings.question_bank {
        Some(path) => QuestionBank::from_path(path)?,
        None => QuestionBank::standard().clone(),
    };
    bank.ensure_age_question(
        &settings.scoring.age_question_id,
        settings.scoring.preview_len,
    )?;

    Ok(PlacementEngine::new(settings.scoring.clone(), Arc::new(bank)))
}
