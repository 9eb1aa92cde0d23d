use chrono::{Duration, Utc};

use fitcoach_site::domain::repository::PasscodeStore;
use fitcoach_site::domain::types::PasscodeRecord;
use fitcoach_site::usecase::passcode::{IssueOutcome, VerifyOutcome};

use crate::helpers::{CapturingDelivery, FailingDelivery, MockPasscodeStore, passcode_service};

const EMAIL: &str = "a@b.com";

fn wrong_code(code: &str) -> String {
    if code == "000000" { "000001" } else { "000000" }.to_owned()
}

// ── issue ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_and_deliver_same_code() {
    let store = MockPasscodeStore::default();
    let delivery = CapturingDelivery::default();
    let service = passcode_service(&store, delivery.clone());

    let before = Utc::now();
    let outcome = service.issue(EMAIL).await.unwrap();
    let after = Utc::now();

    let IssueOutcome::Sent { email, expires_at } = &outcome else {
        panic!("expected Sent, got {outcome:?}");
    };
    assert_eq!(email, EMAIL);
    assert!(*expires_at >= before + Duration::seconds(600));
    assert!(*expires_at <= after + Duration::seconds(600));
    assert!(outcome.message().contains(EMAIL));

    let record = store.record(EMAIL).unwrap();
    assert_eq!(record.expires_at, *expires_at);
    assert_eq!(Some(record.code.clone()), delivery.last_code(EMAIL));
    assert_eq!(record.code.len(), 6);
    assert!(!record.verified);
}

#[tokio::test]
async fn should_invalidate_previous_code_on_reissue() {
    let store = MockPasscodeStore::default();
    let delivery = CapturingDelivery::default();
    let service = passcode_service(&store, delivery.clone());

    service.issue(EMAIL).await.unwrap();
    let first = delivery.last_code(EMAIL).unwrap();
    service.issue(EMAIL).await.unwrap();
    let second = delivery.last_code(EMAIL).unwrap();
    assert_eq!(delivery.count(), 2);

    if first != second {
        assert_eq!(
            service.verify(EMAIL, &first).await.unwrap(),
            VerifyOutcome::Mismatch
        );
    }
    assert_eq!(
        service.verify(EMAIL, &second).await.unwrap(),
        VerifyOutcome::Verified
    );
}

#[tokio::test]
async fn should_reset_verified_flag_on_reissue() {
    let store = MockPasscodeStore::default();
    let delivery = CapturingDelivery::default();
    let service = passcode_service(&store, delivery.clone());

    service.issue(EMAIL).await.unwrap();
    let code = delivery.last_code(EMAIL).unwrap();
    service.verify(EMAIL, &code).await.unwrap();
    assert!(service.is_verified(EMAIL).await.unwrap());

    service.issue(EMAIL).await.unwrap();
    assert!(!service.is_verified(EMAIL).await.unwrap());
}

#[tokio::test]
async fn should_report_delivery_failure_and_keep_record() {
    let store = MockPasscodeStore::default();
    let service = passcode_service(&store, FailingDelivery);

    let outcome = service.issue(EMAIL).await.unwrap();
    assert_eq!(outcome, IssueOutcome::DeliveryFailed);
    assert!(!outcome.is_success());
    assert!(store.record(EMAIL).is_some());
}

// ── verify ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_verify_correct_code() {
    let store = MockPasscodeStore::default();
    let delivery = CapturingDelivery::default();
    let service = passcode_service(&store, delivery.clone());

    service.issue(EMAIL).await.unwrap();
    let code = delivery.last_code(EMAIL).unwrap();

    let outcome = service.verify(EMAIL, &code).await.unwrap();
    assert_eq!(outcome, VerifyOutcome::Verified);
    assert_eq!(outcome.message(), "Passcode verified successfully!");
    assert!(service.is_verified(EMAIL).await.unwrap());
}

#[tokio::test]
async fn should_keep_record_unverified_on_mismatch() {
    let store = MockPasscodeStore::default();
    let delivery = CapturingDelivery::default();
    let service = passcode_service(&store, delivery.clone());

    service.issue(EMAIL).await.unwrap();
    let code = delivery.last_code(EMAIL).unwrap();

    let outcome = service.verify(EMAIL, &wrong_code(&code)).await.unwrap();
    assert_eq!(outcome, VerifyOutcome::Mismatch);
    assert_eq!(
        outcome.message(),
        "Invalid passcode. Please check and try again."
    );
    assert!(!service.is_verified(EMAIL).await.unwrap());

    // A wrong attempt does not burn the code.
    assert_eq!(
        service.verify(EMAIL, &code).await.unwrap(),
        VerifyOutcome::Verified
    );
}

#[tokio::test]
async fn should_compare_codes_exactly_without_normalising() {
    let store = MockPasscodeStore::default();
    let delivery = CapturingDelivery::default();
    let service = passcode_service(&store, delivery.clone());

    service.issue(EMAIL).await.unwrap();
    let code = delivery.last_code(EMAIL).unwrap();
    let full_width: String = code
        .chars()
        .map(|c| char::from_u32(0xFF10 + c.to_digit(10).unwrap()).unwrap())
        .collect();

    for attempt in [
        format!(" {code}"),
        format!("{code} "),
        format!("{code}\n"),
        full_width,
        code[..5].to_owned(),
    ] {
        assert_eq!(
            service.verify(EMAIL, &attempt).await.unwrap(),
            VerifyOutcome::Mismatch,
            "attempt {attempt:?}"
        );
    }
    assert!(!service.is_verified(EMAIL).await.unwrap());
    assert_eq!(
        service.verify(EMAIL, &code).await.unwrap(),
        VerifyOutcome::Verified
    );
}

#[tokio::test]
async fn should_report_not_found_for_unknown_email() {
    let store = MockPasscodeStore::default();
    let service = passcode_service(&store, CapturingDelivery::default());

    let outcome = service.verify("nobody@b.com", "123456").await.unwrap();
    assert_eq!(outcome, VerifyOutcome::NotFound);
    assert_eq!(
        outcome.message(),
        "No passcode found for this email. Please request a new one."
    );
}

#[tokio::test]
async fn should_remove_expired_record_on_verify() {
    let store = MockPasscodeStore::default();
    let service = passcode_service(&store, CapturingDelivery::default());
    store
        .put(
            EMAIL,
            PasscodeRecord {
                email: EMAIL.to_owned(),
                code: "123456".to_owned(),
                expires_at: Utc::now() - Duration::seconds(1),
                verified: false,
            },
        )
        .await
        .unwrap();

    let outcome = service.verify(EMAIL, "123456").await.unwrap();
    assert_eq!(outcome, VerifyOutcome::Expired);
    assert_eq!(
        outcome.message(),
        "Passcode has expired. Please request a new one."
    );
    assert!(store.record(EMAIL).is_none());

    assert_eq!(
        service.verify(EMAIL, "123456").await.unwrap(),
        VerifyOutcome::NotFound
    );
}

#[tokio::test]
async fn should_treat_reverify_of_live_code_as_success() {
    let store = MockPasscodeStore::default();
    let delivery = CapturingDelivery::default();
    let service = passcode_service(&store, delivery.clone());

    service.issue(EMAIL).await.unwrap();
    let code = delivery.last_code(EMAIL).unwrap();
    service.verify(EMAIL, &code).await.unwrap();

    assert_eq!(
        service.verify(EMAIL, &code).await.unwrap(),
        VerifyOutcome::Verified
    );
    assert!(service.is_verified(EMAIL).await.unwrap());
}

#[tokio::test]
async fn should_match_emails_exactly() {
    let store = MockPasscodeStore::default();
    let delivery = CapturingDelivery::default();
    let service = passcode_service(&store, delivery.clone());

    service.issue(EMAIL).await.unwrap();
    let code = delivery.last_code(EMAIL).unwrap();

    assert_eq!(
        service.verify("A@B.com", &code).await.unwrap(),
        VerifyOutcome::NotFound
    );
}

// ── is_verified / clear ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_not_report_verified_without_record() {
    let store = MockPasscodeStore::default();
    let service = passcode_service(&store, CapturingDelivery::default());
    assert!(!service.is_verified(EMAIL).await.unwrap());
}

#[tokio::test]
async fn should_forget_code_after_clear() {
    let store = MockPasscodeStore::default();
    let delivery = CapturingDelivery::default();
    let service = passcode_service(&store, delivery.clone());

    service.issue(EMAIL).await.unwrap();
    let code = delivery.last_code(EMAIL).unwrap();
    service.verify(EMAIL, &code).await.unwrap();

    service.clear(EMAIL).await.unwrap();
    service.clear(EMAIL).await.unwrap();

    assert!(!service.is_verified(EMAIL).await.unwrap());
    assert_eq!(
        service.verify(EMAIL, &code).await.unwrap(),
        VerifyOutcome::NotFound
    );
}
