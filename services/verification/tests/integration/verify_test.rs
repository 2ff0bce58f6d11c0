use chrono::{Duration, Utc};

use starshield_verification::domain::types::TargetType;
use starshield_verification::error::VerificationServiceError;

use crate::helpers::{Harness, MockCodeRepo, TEST_USER, test_code};

#[tokio::test]
async fn should_verify_issued_code_and_return_normalized_target() {
    let h = Harness::new();
    h.issue(TEST_USER, TargetType::Email, "User@Example.com ")
        .await
        .unwrap();
    let code = h.mailer.last_code();

    let target = h.verify(TEST_USER, TargetType::Email, &code).await.unwrap();

    assert_eq!(target, "user@example.com");
    let row = &h.repo.rows_for(TEST_USER, TargetType::Email)[0];
    assert!(row.consumed_at.is_some(), "verified code must be consumed");
}

#[tokio::test]
async fn should_reject_reuse_of_consumed_code() {
    let h = Harness::new();
    h.issue(TEST_USER, TargetType::Email, "user@example.com")
        .await
        .unwrap();
    let code = h.mailer.last_code();
    h.verify(TEST_USER, TargetType::Email, &code).await.unwrap();

    for _ in 0..2 {
        let result = h.verify(TEST_USER, TargetType::Email, &code).await;
        assert!(
            matches!(result, Err(VerificationServiceError::AlreadyUsed)),
            "expected AlreadyUsed, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_reject_when_no_code_requested() {
    let h = Harness::new();

    let result = h.verify(TEST_USER, TargetType::Email, "123456").await;

    assert!(
        matches!(result, Err(VerificationServiceError::NoCodeRequested)),
        "expected NoCodeRequested, got {result:?}"
    );
}

#[tokio::test]
async fn should_not_accept_superseded_code() {
    let h = Harness::new();
    h.issue(TEST_USER, TargetType::Email, "user@example.com")
        .await
        .unwrap();
    let old = h.mailer.last_code();
    // Re-issue until the new code differs from the old one.
    let mut new = old.clone();
    while new == old {
        h.issue(TEST_USER, TargetType::Email, "user@example.com")
            .await
            .unwrap();
        new = h.mailer.last_code();
    }

    let result = h.verify(TEST_USER, TargetType::Email, &old).await;
    assert!(result.is_err(), "superseded code must never verify");

    let target = h.verify(TEST_USER, TargetType::Email, &new).await.unwrap();
    assert_eq!(target, "user@example.com");
}

#[tokio::test]
async fn should_discard_code_after_max_failed_attempts() {
    let h = Harness::new();
    h.issue(TEST_USER, TargetType::Email, "user@example.com")
        .await
        .unwrap();
    let code = h.mailer.last_code();
    let wrong = if code == "100000" { "100001" } else { "100000" };

    for expected_attempts in 1..=4 {
        let result = h.verify(TEST_USER, TargetType::Email, wrong).await;
        assert!(
            matches!(result, Err(VerificationServiceError::InvalidCode)),
            "attempt {expected_attempts}: expected InvalidCode, got {result:?}"
        );
        let row = &h.repo.rows_for(TEST_USER, TargetType::Email)[0];
        assert_eq!(row.attempts, expected_attempts);
    }

    let fifth = h.verify(TEST_USER, TargetType::Email, wrong).await;
    assert!(
        matches!(fifth, Err(VerificationServiceError::MaxAttemptsExceeded)),
        "expected MaxAttemptsExceeded, got {fifth:?}"
    );
    assert!(h.repo.rows_for(TEST_USER, TargetType::Email).is_empty());

    let sixth = h.verify(TEST_USER, TargetType::Email, &code).await;
    assert!(
        matches!(sixth, Err(VerificationServiceError::NoCodeRequested)),
        "expected NoCodeRequested, got {sixth:?}"
    );
}

#[tokio::test]
async fn should_honor_configured_attempt_limit() {
    let mut h = Harness::new();
    h.policy.max_attempts = 2;
    h.issue(TEST_USER, TargetType::Email, "user@example.com")
        .await
        .unwrap();
    let code = h.mailer.last_code();
    let wrong = if code == "999999" { "999998" } else { "999999" };

    let first = h.verify(TEST_USER, TargetType::Email, wrong).await;
    assert!(matches!(first, Err(VerificationServiceError::InvalidCode)));
    let second = h.verify(TEST_USER, TargetType::Email, wrong).await;
    assert!(matches!(
        second,
        Err(VerificationServiceError::MaxAttemptsExceeded)
    ));
}

#[tokio::test]
async fn should_discard_exhausted_code_even_if_correct() {
    let mut exhausted = test_code("424242", Utc::now());
    exhausted.attempts = 5;
    let h = Harness::with_repo(MockCodeRepo::new(vec![exhausted]));

    let result = h.verify(TEST_USER, TargetType::Email, "424242").await;

    assert!(
        matches!(result, Err(VerificationServiceError::MaxAttemptsExceeded)),
        "expected MaxAttemptsExceeded, got {result:?}"
    );
    assert!(h.repo.rows_for(TEST_USER, TargetType::Email).is_empty());
}

#[tokio::test]
async fn should_reject_and_remove_expired_code() {
    let mut expired = test_code("424242", Utc::now() - Duration::seconds(700));
    expired.expires_at = Utc::now() - Duration::seconds(100);
    let h = Harness::with_repo(MockCodeRepo::new(vec![expired]));

    let result = h.verify(TEST_USER, TargetType::Email, "424242").await;
    assert!(
        matches!(result, Err(VerificationServiceError::Expired)),
        "expected Expired, got {result:?}"
    );
    assert!(
        h.repo.rows_for(TEST_USER, TargetType::Email).is_empty(),
        "expired code must be deleted"
    );

    let again = h.verify(TEST_USER, TargetType::Email, "424242").await;
    assert!(matches!(
        again,
        Err(VerificationServiceError::NoCodeRequested)
    ));
}

#[tokio::test]
async fn should_use_most_recent_code_when_duplicates_exist() {
    let now = Utc::now();
    let older = test_code("111111", now - Duration::seconds(30));
    let newer = test_code("222222", now);
    let h = Harness::with_repo(MockCodeRepo::new(vec![newer, older]));

    let stale = h.verify(TEST_USER, TargetType::Email, "111111").await;
    assert!(matches!(stale, Err(VerificationServiceError::InvalidCode)));

    let target = h
        .verify(TEST_USER, TargetType::Email, "222222")
        .await
        .unwrap();
    assert_eq!(target, "user@example.com");
}

#[tokio::test]
async fn should_scope_codes_by_target_type() {
    let h = Harness::new();
    h.issue(TEST_USER, TargetType::Email, "user@example.com")
        .await
        .unwrap();
    let email_code = h.mailer.last_code();

    let result = h.verify(TEST_USER, TargetType::Phone, &email_code).await;
    assert!(matches!(
        result,
        Err(VerificationServiceError::NoCodeRequested)
    ));

    let other_user = h.verify("u2", TargetType::Email, &email_code).await;
    assert!(matches!(
        other_user,
        Err(VerificationServiceError::NoCodeRequested)
    ));
}
