use std::sync::Arc;

use super::common::*;
use crate::placement::domain::Tier;
use crate::placement::repository::{PlacementRepository, RepositoryError};
use crate::placement::service::{PlacementService, PlacementServiceError};

#[test]
fn complete_persists_record_and_starts_nurture_sequence() {
    let (service, repository, mailer) = memory_service();

    let record = service
        .complete(student("stu-001"), explorer_answers())
        .expect("placement stored");

    assert_eq!(record.result.tier, Tier::Explorers);
    assert_eq!(record.answers.len(), explorer_answers().len());

    let stored = repository
        .latest(&student("stu-001"))
        .expect("repository available")
        .expect("record present");
    assert_eq!(stored, record);

    let requests = mailer.requests.lock().expect("mailer mutex poisoned");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].template, "placement_complete");
    assert_eq!(requests[0].details.get("tier").map(String::as_str), Some("explorers"));
    assert_eq!(
        requests[0].details.get("start_quest").map(String::as_str),
        Some("paragraph-harbor")
    );
    assert_eq!(
        requests[0].details.get("supports_suggested").map(String::as_str),
        Some("true")
    );
}

#[test]
fn retake_replaces_latest_placement() {
    let (service, _, _) = memory_service();

    service
        .complete(student("stu-002"), Vec::new())
        .expect("first placement stored");
    let retake = service
        .complete(student("stu-002"), explorer_answers())
        .expect("retake stored");

    let latest = service.latest(&student("stu-002")).expect("latest found");
    assert_eq!(latest.result, retake.result);
    assert_eq!(latest.answers.len(), explorer_answers().len());
}

#[test]
fn blank_student_id_is_rejected() {
    let (service, _, mailer) = memory_service();

    let err = service
        .complete(student("   "), explorer_answers())
        .expect_err("blank id rejected");

    assert!(matches!(err, PlacementServiceError::InvalidStudent));
    assert!(mailer.requests.lock().expect("mailer mutex poisoned").is_empty());
}

#[test]
fn mailer_failure_does_not_undo_the_placement() {
    let repository = Arc::new(MemoryRepository::default());
    let service = PlacementService::new(engine(), repository.clone(), Arc::new(FailingMailer));

    let record = service
        .complete(student("stu-003"), explorer_answers())
        .expect("placement stored despite mailer failure");

    let stored = service.latest(&student("stu-003")).expect("stored");
    assert_eq!(stored.result, record.result);
}

#[test]
fn repository_failures_surface_to_the_caller() {
    let service = PlacementService::new(
        engine(),
        Arc::new(UnavailableRepository),
        Arc::new(MemoryMailer::default()),
    );

    let err = service
        .complete(student("stu-004"), explorer_answers())
        .expect_err("repository offline");
    assert!(matches!(
        err,
        PlacementServiceError::Repository(RepositoryError::Unavailable(_))
    ));
}

#[test]
fn latest_reports_missing_placements() {
    let (service, _, _) = memory_service();

    let err = service
        .latest(&student("nobody"))
        .expect_err("no placement yet");
    assert!(matches!(
        err,
        PlacementServiceError::Repository(RepositoryError::NotFound)
    ));
}

#[test]
fn questions_for_uses_the_engine_bank() {
    let (service, _, _) = memory_service();

    assert_eq!(service.questions_for(None).len(), 10);
    let older = service.questions_for(Some(13));
    assert!(older.iter().any(|q| q.id == "math-5"));
    assert!(older.iter().all(|q| q.id != "math-1"));
}
