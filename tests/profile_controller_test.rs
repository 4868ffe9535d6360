// ABOUTME: Integration tests for the self-service profile controller
// ABOUTME: Password rotation success, rejection, notices and the pending flag
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use std::time::Duration;

use admin_console::controllers::{Operation, Outcome};
use admin_console::errors::ErrorCode;
use helpers::mock_collaborator::{MockCollaborator, USER_EMAIL, USER_PASSWORD};
use helpers::{console_for, logged_in_user};

#[tokio::test]
async fn test_change_own_password_succeeds_and_notifies() {
    let (mock, console) = logged_in_user().await;
    let profile = console.profile();

    profile
        .change_own_password(USER_PASSWORD, "rotated-pw")
        .await
        .unwrap();
    assert_eq!(mock.user(USER_EMAIL).unwrap().password, "rotated-pw");

    let state = profile.snapshot();
    assert!(!state.pending);
    let notice = state.last_notice.unwrap();
    assert_eq!(notice.operation, Operation::ChangeOwnPassword);
    assert_eq!(notice.outcome, Outcome::Succeeded);

    let request = mock.requests().pop().unwrap();
    assert_eq!(request.method, "PUT");
    assert_eq!(request.path, "/users/me/password");

    // The new password works for the next login
    console.session().logout().await;
    console
        .session()
        .login(USER_EMAIL, "rotated-pw")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_wrong_old_password_is_surfaced() {
    let (mock, console) = logged_in_user().await;
    let profile = console.profile();

    let error = profile
        .change_own_password("not-my-password", "rotated-pw")
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::RemoteValidation);
    assert_eq!(error.message, "Old password is incorrect");
    assert_eq!(mock.user(USER_EMAIL).unwrap().password, USER_PASSWORD);

    let state = profile.snapshot();
    assert!(!state.pending);
    match state.last_notice.unwrap().outcome {
        Outcome::Failed(message) => assert!(message.contains("Old password is incorrect")),
        Outcome::Succeeded => panic!("expected a failure notice"),
    }

    profile.dismiss_notice();
    assert!(profile.snapshot().last_notice.is_none());
}

#[tokio::test]
async fn test_anonymous_change_is_unauthorized_and_session_untouched() {
    let mock = MockCollaborator::start().await;
    let console = console_for(&mock);

    let error = console
        .profile()
        .change_own_password("a", "b")
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::AuthInvalid);
    assert!(!console.session().is_authenticated());
    assert!(console.profile().snapshot().last_notice.unwrap().is_failure());
}

#[tokio::test]
async fn test_pending_flag_is_published() {
    let (_mock, console) = logged_in_user().await;
    let mut rx = console.profile().subscribe();

    console
        .profile()
        .change_own_password(USER_PASSWORD, "rotated-pw")
        .await
        .unwrap();

    // Two transitions: pending, then settled with a notice
    assert!(rx.has_changed().unwrap());
    let settled = rx.borrow_and_update().clone();
    assert!(!settled.pending);
    assert!(settled.last_notice.is_some());
}

#[tokio::test]
async fn test_pending_holds_until_last_change_settles() {
    let (mock, console) = logged_in_user().await;
    let profile = console.profile();
    mock.delay_own_password_changes(vec![Duration::from_millis(400), Duration::ZERO]);

    let slow = profile.change_own_password(USER_PASSWORD, "rotated-pw");
    let fast = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        profile
            .change_own_password("not-the-old-one", "other")
            .await
            .unwrap_err();
        profile.snapshot().pending
    };
    let (slow_result, pending_after_fast) = tokio::join!(slow, fast);

    slow_result.unwrap();
    assert!(pending_after_fast);
    assert!(!profile.snapshot().pending);
}
