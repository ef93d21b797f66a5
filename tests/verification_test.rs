mod common;

use common::{session_with_identity, MockGateway};
use portal_client::models::RequestType;
use portal_client::routing::Route;
use portal_client::services::error::GatewayError;
use portal_client::services::session::{MemorySessionStore, SessionStore};
use portal_client::workflows::home::HomeWorkflow;
use portal_client::workflows::verify::{VerifyStage, VerifyWorkflow, SEND_COOLDOWN_SECONDS};
use portal_client::workflows::Feedback;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn mount_without_session_redirects_to_login() {
    let gateway = MockGateway::new();
    let mut sessions = MemorySessionStore::new();
    let mut workflow = VerifyWorkflow::new();

    let route = workflow.on_mount(&gateway, &mut sessions).await;

    assert_eq!(route, Some(Route::Login));
    assert_eq!(gateway.status_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn status_check_fires_at_most_once_per_mount() {
    let gateway = MockGateway::new();
    gateway.queue_status(Ok(false));
    let mut sessions = session_with_identity();
    let mut workflow = VerifyWorkflow::new();

    assert_eq!(workflow.on_mount(&gateway, &mut sessions).await, None);
    // Re-render churn re-enters the mount path; the guard must hold.
    assert_eq!(workflow.on_mount(&gateway, &mut sessions).await, None);
    assert_eq!(workflow.on_mount(&gateway, &mut sessions).await, None);

    assert_eq!(gateway.status_calls.load(Ordering::SeqCst), 1);
    assert_eq!(workflow.stage(), VerifyStage::AwaitSend);
}

#[tokio::test]
async fn fresh_mount_checks_again() {
    let gateway = MockGateway::new();
    gateway.queue_status(Ok(false));
    gateway.queue_status(Ok(false));
    let mut sessions = session_with_identity();

    let mut first = VerifyWorkflow::new();
    first.on_mount(&gateway, &mut sessions).await;
    drop(first);

    let mut second = VerifyWorkflow::new();
    second.on_mount(&gateway, &mut sessions).await;

    assert_eq!(gateway.status_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn already_verified_account_goes_home() {
    let gateway = MockGateway::new();
    gateway.queue_status(Ok(true));
    let mut sessions = session_with_identity();
    let mut workflow = VerifyWorkflow::new();

    assert_eq!(
        workflow.on_mount(&gateway, &mut sessions).await,
        Some(Route::Home)
    );
}

#[tokio::test]
async fn unknown_user_redirects_to_login() {
    let gateway = MockGateway::new();
    gateway.queue_status(Err(GatewayError::NotFound));
    let mut sessions = session_with_identity();
    let mut workflow = VerifyWorkflow::new();

    assert_eq!(
        workflow.on_mount(&gateway, &mut sessions).await,
        Some(Route::Login)
    );
}

#[tokio::test]
async fn transient_status_failure_still_shows_the_form() {
    let gateway = MockGateway::new();
    gateway.queue_status(Err(GatewayError::Unexpected("status 500".to_string())));
    let mut sessions = session_with_identity();
    let mut workflow = VerifyWorkflow::new();

    assert_eq!(workflow.on_mount(&gateway, &mut sessions).await, None);
    assert_eq!(workflow.stage(), VerifyStage::AwaitSend);
}

#[tokio::test]
async fn expired_session_clears_store_and_redirects() {
    let gateway = MockGateway::new();
    gateway.queue_status(Err(GatewayError::SessionExpired));
    let mut sessions = session_with_identity();
    let mut workflow = VerifyWorkflow::new();

    let route = workflow.on_mount(&gateway, &mut sessions).await;

    assert_eq!(route, Some(Route::Login));
    assert!(sessions.current().is_none());
}

async fn mounted_workflow(
    gateway: &MockGateway,
    sessions: &mut MemorySessionStore,
) -> VerifyWorkflow {
    gateway.queue_status(Ok(false));
    let mut workflow = VerifyWorkflow::new();
    assert_eq!(workflow.on_mount(gateway, sessions).await, None);
    workflow
}

#[tokio::test]
async fn successful_send_runs_the_full_cooldown() {
    let gateway = MockGateway::new();
    let mut sessions = session_with_identity();
    let mut workflow = mounted_workflow(&gateway, &mut sessions).await;

    gateway.queue_send_code(Ok(()));
    workflow.send_code(&gateway, &mut sessions).await;

    assert_eq!(
        workflow.feedback(),
        &Feedback::info("Verification email has been sent successfully.")
    );
    assert_eq!(workflow.stage(), VerifyStage::AwaitCode);
    assert_eq!(workflow.cooldown_remaining(), SEND_COOLDOWN_SECONDS);

    // Disabled for exactly 60 simulated seconds.
    for second in 0..SEND_COOLDOWN_SECONDS - 1 {
        workflow.tick();
        assert!(!workflow.can_send(), "re-enabled after {} ticks", second + 1);
    }
    workflow.tick();
    assert!(workflow.can_send());

    // A double send during the cooldown must not reach the gateway: the
    // mock would panic on an unscripted call.
}

#[tokio::test]
async fn send_during_cooldown_is_a_no_op() {
    let gateway = MockGateway::new();
    let mut sessions = session_with_identity();
    let mut workflow = mounted_workflow(&gateway, &mut sessions).await;

    gateway.queue_send_code(Ok(()));
    workflow.send_code(&gateway, &mut sessions).await;
    // No second result queued; a second call would panic inside the mock.
    workflow.send_code(&gateway, &mut sessions).await;

    assert_eq!(gateway.send_code_calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn failed_send_cancels_the_cooldown() {
    let gateway = MockGateway::new();
    let mut sessions = session_with_identity();
    let mut workflow = mounted_workflow(&gateway, &mut sessions).await;

    gateway.queue_send_code(Err(GatewayError::Unexpected("status 500".to_string())));
    workflow.send_code(&gateway, &mut sessions).await;

    assert_eq!(
        workflow.feedback(),
        &Feedback::error("Failed to send the verification email. Please try again.")
    );
    assert_eq!(workflow.cooldown_remaining(), 0);
    assert!(workflow.can_send());
    // The affordance did not flip to the redeem stage.
    assert_eq!(workflow.stage(), VerifyStage::AwaitSend);
}

#[tokio::test]
async fn code_submission_before_a_send_is_a_no_op() {
    let gateway = MockGateway::new();
    let mut sessions = session_with_identity();
    let mut workflow = mounted_workflow(&gateway, &mut sessions).await;

    // No validate result queued: a gateway call would panic inside the mock.
    workflow.set_code("123456");
    assert_eq!(workflow.submit_code(&gateway, &mut sessions).await, None);

    assert_eq!(workflow.stage(), VerifyStage::AwaitSend);
    assert!(gateway.validate_code_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_code_is_rejected_locally() {
    let gateway = MockGateway::new();
    let mut sessions = session_with_identity();
    let mut workflow = mounted_workflow(&gateway, &mut sessions).await;

    gateway.queue_send_code(Ok(()));
    workflow.send_code(&gateway, &mut sessions).await;

    workflow.set_code("12a456");
    workflow.submit_code(&gateway, &mut sessions).await;

    assert_eq!(
        workflow.code_error(),
        Some("Verification code must be exactly 6 numeric digits.")
    );
    assert!(gateway.validate_code_calls.lock().unwrap().is_empty());

    // Editing the field clears the inline error.
    workflow.set_code("123456");
    assert_eq!(workflow.code_error(), None);
}

#[tokio::test]
async fn rejected_then_accepted_code_reaches_success() {
    let gateway = MockGateway::new();
    let mut sessions = session_with_identity();
    let mut workflow = mounted_workflow(&gateway, &mut sessions).await;

    gateway.queue_send_code(Ok(()));
    workflow.send_code(&gateway, &mut sessions).await;

    // Server rejects the first attempt; the stage must not move.
    gateway.queue_validate_code(Err(GatewayError::Code("Invalid code".to_string())));
    workflow.set_code("000000");
    workflow.submit_code(&gateway, &mut sessions).await;
    assert_eq!(workflow.stage(), VerifyStage::AwaitCode);
    assert_eq!(workflow.feedback(), &Feedback::error("Invalid code"));

    // Second attempt with the issued code succeeds.
    gateway.queue_validate_code(Ok(()));
    workflow.set_code("123456");
    workflow.submit_code(&gateway, &mut sessions).await;
    assert_eq!(workflow.stage(), VerifyStage::Success);
    assert!(!workflow.feedback().is_error());

    // Manual skip is available immediately.
    assert_eq!(workflow.skip_wait(), Some(Route::Home));

    // The automatic redirect lands after 5 ticks.
    for _ in 0..4 {
        assert_eq!(workflow.tick(), None);
    }
    assert_eq!(workflow.tick(), Some(Route::Home));

    let calls = gateway.validate_code_calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert!(calls
        .iter()
        .all(|(user_id, _, request_type)| user_id == "42"
            && *request_type == RequestType::Verify));
}

#[tokio::test]
async fn success_stage_ignores_further_submissions() {
    let gateway = MockGateway::new();
    let mut sessions = session_with_identity();
    let mut workflow = mounted_workflow(&gateway, &mut sessions).await;

    gateway.queue_send_code(Ok(()));
    workflow.send_code(&gateway, &mut sessions).await;
    gateway.queue_validate_code(Ok(()));
    workflow.set_code("123456");
    workflow.submit_code(&gateway, &mut sessions).await;

    // No further validate result queued; a second call would panic.
    workflow.submit_code(&gateway, &mut sessions).await;
    assert_eq!(workflow.stage(), VerifyStage::Success);
}

#[tokio::test]
async fn skip_is_unavailable_before_success() {
    let gateway = MockGateway::new();
    let mut sessions = session_with_identity();
    let workflow = mounted_workflow(&gateway, &mut sessions).await;

    assert_eq!(workflow.skip_wait(), None);
}

#[tokio::test]
async fn home_mount_without_session_redirects_to_login() {
    let gateway = MockGateway::new();
    let mut sessions = MemorySessionStore::new();
    let mut workflow = HomeWorkflow::new();

    assert_eq!(
        workflow.on_mount(&gateway, &mut sessions).await,
        Some(Route::Login)
    );
    assert_eq!(gateway.status_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn home_mount_with_verified_account_stays_put() {
    let gateway = MockGateway::new();
    gateway.queue_status(Ok(true));
    let mut sessions = session_with_identity();
    let mut workflow = HomeWorkflow::new();

    assert_eq!(workflow.on_mount(&gateway, &mut sessions).await, None);
    assert!(!workflow.needs_verification());
    assert_eq!(workflow.verify_now(), None);
}

#[tokio::test]
async fn home_mount_offers_verification_to_an_unverified_account() {
    let gateway = MockGateway::new();
    gateway.queue_status(Ok(false));
    let mut sessions = session_with_identity();
    let mut workflow = HomeWorkflow::new();

    assert_eq!(workflow.on_mount(&gateway, &mut sessions).await, None);
    assert!(workflow.needs_verification());
    assert_eq!(workflow.verify_now(), Some(Route::VerifyAccount));
}

#[tokio::test]
async fn home_status_check_fires_at_most_once_per_mount() {
    let gateway = MockGateway::new();
    gateway.queue_status(Ok(false));
    let mut sessions = session_with_identity();
    let mut workflow = HomeWorkflow::new();

    assert_eq!(workflow.on_mount(&gateway, &mut sessions).await, None);
    // Re-render churn re-enters the mount path; the guard must hold.
    assert_eq!(workflow.on_mount(&gateway, &mut sessions).await, None);

    assert_eq!(gateway.status_calls.load(Ordering::SeqCst), 1);
    assert!(workflow.needs_verification());
}

#[tokio::test]
async fn home_mount_status_failure_falls_back_to_login() {
    let gateway = MockGateway::new();
    gateway.queue_status(Err(GatewayError::Unexpected("status 500".to_string())));
    let mut sessions = session_with_identity();
    let mut workflow = HomeWorkflow::new();

    assert_eq!(
        workflow.on_mount(&gateway, &mut sessions).await,
        Some(Route::Login)
    );
    // The failure is not a session expiry; the identity is kept.
    assert!(sessions.current().is_some());
}

#[tokio::test]
async fn home_mount_expired_session_clears_store_and_redirects() {
    let gateway = MockGateway::new();
    gateway.queue_status(Err(GatewayError::SessionExpired));
    let mut sessions = session_with_identity();
    let mut workflow = HomeWorkflow::new();

    assert_eq!(
        workflow.on_mount(&gateway, &mut sessions).await,
        Some(Route::Login)
    );
    assert!(sessions.current().is_none());
}
