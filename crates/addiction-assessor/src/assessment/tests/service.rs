use std::sync::{Arc, Barrier};
use std::thread;

use super::common::*;
use crate::assessment::conversation::{ConversationError, TurnOutcome, MAX_KEPT_REJECTIONS};
use crate::assessment::questionnaire::{AnswerError, QuestionKey};
use crate::assessment::repository::{SessionId, SessionStatus, StoreError};
use crate::assessment::{AssessmentService, AssessmentServiceError, ScoringWeights, TierLevel};

#[test]
fn start_persists_a_fresh_session() {
    let (service, store) = build_service();

    let record = service.start().expect("session starts");

    assert!(record.session_id.0.starts_with("session-"));
    assert_eq!(record.status(), SessionStatus::InProgress);
    let stored = store.stored(&record.session_id).expect("record persisted");
    assert_eq!(stored.conversation.transcript().len(), 1);
}

#[test]
fn generated_session_ids_are_unique() {
    let (service, _) = build_service();

    let first = service.start().expect("first session");
    let second = service.start().expect("second session");

    assert_ne!(first.session_id, second.session_id);
}

#[test]
fn answers_are_persisted_until_completion() {
    let (service, store) = build_service();
    let id = service.start().expect("session starts").session_id;

    for answer in SCENARIO_ANSWERS {
        service.answer(&id, answer).expect("answer accepted");
    }

    let stored = store.stored(&id).expect("record persisted");
    assert_eq!(stored.status(), SessionStatus::Complete);
    assert!(stored.updated_at >= stored.started_at);

    let result = service.result(&id).expect("result available");
    assert_eq!(result.score(), 5);
    assert_eq!(result.assessment.tier, TierLevel::Moderate);
}

#[test]
fn rejected_answer_persists_reprompt_but_not_progress() {
    let (service, store) = build_service();
    let id = service.start().expect("session starts").session_id;

    match service.answer(&id, "abc") {
        Err(AssessmentServiceError::Conversation(ConversationError::Answer(err))) => {
            assert_eq!(err, AnswerError::NotANumber { key: QuestionKey::Age });
        }
        other => panic!("expected parse error, got {other:?}"),
    }

    let stored = store.stored(&id).expect("record persisted");
    assert_eq!(stored.conversation.current_index(), 0);
    assert_eq!(stored.conversation.transcript().len(), 3);
}

#[test]
fn concurrent_accepted_and_rejected_answers_both_persist() {
    let (service, store) = build_service();
    let service = Arc::new(service);
    let id = service.start().expect("session starts").session_id;
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = ["20", "abc"]
        .into_iter()
        .map(|answer| {
            let service = Arc::clone(&service);
            let barrier = Arc::clone(&barrier);
            let id = id.clone();
            thread::spawn(move || {
                barrier.wait();
                service.answer(&id, answer).is_ok()
            })
        })
        .collect();
    let accepted = handles
        .into_iter()
        .map(|handle| handle.join().expect("answer thread finished"))
        .filter(|accepted| *accepted)
        .count();

    // Whichever order the turns ran in, exactly the age answer sticks.
    assert_eq!(accepted, 1);
    let stored = store.stored(&id).expect("record persisted");
    assert_eq!(stored.conversation.answered(), 1);
    assert_eq!(stored.conversation.current_index(), 1);
    assert_eq!(stored.conversation.transcript().len(), 5);
}

#[test]
fn many_concurrent_answers_record_a_single_turn() {
    const WRITERS: usize = 8;
    let (service, store) = build_service();
    let id = service.start().expect("session starts").session_id;
    let barrier = Barrier::new(WRITERS);
    let (service, barrier, session) = (&service, &barrier, &id);

    let accepted = thread::scope(|scope| {
        let handles: Vec<_> = (0..WRITERS)
            .map(|_| {
                scope.spawn(move || {
                    barrier.wait();
                    service.answer(session, "19").is_ok()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("answer thread finished"))
            .filter(|accepted| *accepted)
            .count()
    });

    assert_eq!(accepted, 1);
    let stored = store.stored(&id).expect("record persisted");
    assert_eq!(stored.conversation.answered(), 1);
    let rejections = (WRITERS - 1).min(MAX_KEPT_REJECTIONS);
    assert_eq!(stored.conversation.transcript().len(), 3 + 2 * rejections);
}

#[test]
fn blank_answer_is_ignored() {
    let (service, store) = build_service();
    let id = service.start().expect("session starts").session_id;

    let receipt = service.answer(&id, "  ").expect("blank input tolerated");

    assert_eq!(receipt.outcome, TurnOutcome::Ignored);
    let stored = store.stored(&id).expect("record persisted");
    assert_eq!(stored.conversation.transcript().len(), 1);
}

#[test]
fn answer_after_completion_is_a_conflict() {
    let (service, _) = build_service();
    let id = service.start().expect("session starts").session_id;
    for answer in SCENARIO_ANSWERS {
        service.answer(&id, answer).expect("answer accepted");
    }

    match service.answer(&id, "again") {
        Err(AssessmentServiceError::Conversation(ConversationError::AlreadyComplete)) => {}
        other => panic!("expected already complete, got {other:?}"),
    }
}

#[test]
fn result_of_unfinished_session_reports_progress() {
    let (service, _) = build_service();
    let id = service.start().expect("session starts").session_id;
    service.answer(&id, "19").expect("age accepted");

    match service.result(&id) {
        Err(AssessmentServiceError::Conversation(ConversationError::Incomplete {
            answered,
            total,
        })) => {
            assert_eq!(answered, 1);
            assert_eq!(total, 10);
        }
        other => panic!("expected incomplete error, got {other:?}"),
    }
}

#[test]
fn reset_clears_answers_and_keeps_session() {
    let (service, store) = build_service();
    let id = service.start().expect("session starts").session_id;
    service.answer(&id, "19").expect("age accepted");
    service.answer(&id, "female").expect("gender accepted");

    let record = service.reset(&id).expect("reset succeeds");

    assert_eq!(record.session_id, id);
    assert_eq!(record.conversation.answered(), 0);
    let stored = store.stored(&id).expect("record persisted");
    assert_eq!(stored.conversation.current_index(), 0);
}

#[test]
fn discard_removes_session() {
    let (service, store) = build_service();
    let id = service.start().expect("session starts").session_id;

    service.discard(&id).expect("discard succeeds");

    assert!(store.stored(&id).is_none());
    match service.get(&id) {
        Err(AssessmentServiceError::Store(StoreError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn unknown_session_is_not_found() {
    let (service, _) = build_service();
    let id = SessionId("session-missing".to_string());

    match service.answer(&id, "19") {
        Err(AssessmentServiceError::Store(StoreError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn start_surfaces_capacity_errors() {
    let service = AssessmentService::new(Arc::new(FullStore), ScoringWeights::STANDARD);

    match service.start() {
        Err(AssessmentServiceError::Store(StoreError::Capacity(_))) => {}
        other => panic!("expected capacity error, got {other:?}"),
    }
}

#[test]
fn start_surfaces_unavailable_store() {
    let service = AssessmentService::new(Arc::new(UnavailableStore), ScoringWeights::STANDARD);

    match service.start() {
        Err(AssessmentServiceError::Store(StoreError::Unavailable(reason))) => {
            assert_eq!(reason, "cache offline");
        }
        other => panic!("expected unavailable store, got {other:?}"),
    }
}

#[test]
fn score_profile_validates_domains() {
    let (service, _) = build_service();
    let mut profile = scenario_profile();
    profile.age = 40.0;

    match service.score_profile(&profile) {
        Err(AssessmentServiceError::InvalidProfile(err)) => {
            assert_eq!(err, AnswerError::OutOfDomain { key: QuestionKey::Age });
        }
        other => panic!("expected invalid profile, got {other:?}"),
    }

    let assessment = service
        .score_profile(&scenario_profile())
        .expect("valid profile scores");
    assert_eq!(assessment.score, 5);
}
