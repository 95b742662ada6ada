//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variables: DATABASE_URL, SESSION_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;

/// Register a unique account, leaving it unverified
async fn sign_up(server: &TestServer) -> SignUpRequest {
    let request = SignUpRequest::unique();
    let response = server.post("/api/sign-up", &request).await.unwrap();
    let body: Envelope = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.success);
    request
}

/// Register a unique account and verify it with its emailed code
async fn sign_up_verified(server: &TestServer) -> SignUpRequest {
    let request = sign_up(server).await;

    let code = server
        .verification_code_for(&request.username)
        .await
        .unwrap();
    let verify = VerifyCodeRequest {
        username: request.username.clone(),
        code,
    };
    let response = server.post("/api/verify-code", &verify).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    request
}

/// Register, verify, and sign in, returning the account and session token
async fn sign_in_new_user(server: &TestServer) -> (SignUpRequest, String) {
    let request = sign_up_verified(server).await;

    let response = server
        .post("/api/sign-in", &SignInRequest::by_username(&request))
        .await
        .unwrap();
    let auth: SignInEnvelope = assert_json(response, StatusCode::OK).await.unwrap();

    (request, auth.token)
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Sign-up Tests
// ============================================================================

#[tokio::test]
async fn test_sign_up() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = SignUpRequest::unique();

    let response = server.post("/api/sign-up", &request).await.unwrap();
    let body: Envelope = assert_json(response, StatusCode::OK).await.unwrap();

    assert!(body.success);
    assert_eq!(
        body.message,
        "User registered successfully. Please verify your account"
    );
}

#[tokio::test]
async fn test_sign_up_rejects_invalid_username() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let mut request = SignUpRequest::unique();
    request.username = ".leading.dot".to_string();

    let response = server.post("/api/sign-up", &request).await.unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert!(!error.success);
    assert_eq!(error.code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_sign_up_rejects_short_password() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let mut request = SignUpRequest::unique();
    request.password = "short".to_string();

    let response = server.post("/api/sign-up", &request).await.unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(error.code, "VALIDATION_ERROR");
    assert_eq!(error.message, "Password must be at least 8 characters");
}

#[tokio::test]
async fn test_sign_up_username_taken_by_verified_account() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let verified = sign_up_verified(&server).await;

    // Same username, different email
    let mut request = SignUpRequest::unique();
    request.username = verified.username.clone();

    let response = server.post("/api/sign-up", &request).await.unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(error.code, "USERNAME_TAKEN");
    assert_eq!(error.message, "Username is already taken");
}

#[tokio::test]
async fn test_sign_up_email_taken_by_verified_account() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let verified = sign_up_verified(&server).await;

    // Same email, different username
    let mut request = SignUpRequest::unique();
    request.email = verified.email.clone();

    let response = server.post("/api/sign-up", &request).await.unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(error.code, "EMAIL_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_sign_up_reissues_unverified_email_registration() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let first = sign_up(&server).await;

    // Signing up again with the same email before verifying replaces the
    // credentials and restarts the code window; the stored username stays.
    let mut second = SignUpRequest::unique();
    second.email = first.email.clone();
    second.password = "ReplacementPass9!".to_string();

    let response = server.post("/api/sign-up", &second).await.unwrap();
    let body: Envelope = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.success);

    let code = server
        .verification_code_for(&first.username)
        .await
        .unwrap();
    let verify = VerifyCodeRequest {
        username: first.username.clone(),
        code,
    };
    let response = server.post("/api/verify-code", &verify).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    // Only the replacement password signs in now
    let sign_in = SignInRequest {
        identifier: first.email.clone(),
        password: second.password.clone(),
    };
    let response = server.post("/api/sign-in", &sign_in).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let stale = SignInRequest::by_email(&first);
    let response = server.post("/api/sign-in", &stale).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Verification Tests
// ============================================================================

#[tokio::test]
async fn test_verify_code_rejects_wrong_code() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = sign_up(&server).await;

    // Issued codes are always in 100000..=999999
    let verify = VerifyCodeRequest {
        username: request.username.clone(),
        code: "000000".to_string(),
    };
    let response = server.post("/api/verify-code", &verify).await.unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(error.code, "CODE_INCORRECT");
    assert_eq!(error.message, "Incorrect verification code");
}

#[tokio::test]
async fn test_verify_code_unknown_user() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let verify = VerifyCodeRequest {
        username: format!("ghost{}", unique_suffix()),
        code: "123456".to_string(),
    };

    let response = server.post("/api/verify-code", &verify).await.unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();

    assert_eq!(error.code, "UNKNOWN_USER");
}

#[tokio::test]
async fn test_verify_code_already_verified() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = sign_up_verified(&server).await;

    // The verified check fires before the code comparison
    let verify = VerifyCodeRequest {
        username: request.username.clone(),
        code: "111111".to_string(),
    };
    let response = server.post("/api/verify-code", &verify).await.unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(error.code, "ALREADY_VERIFIED");
}

// ============================================================================
// Sign-in Tests
// ============================================================================

#[tokio::test]
async fn test_sign_in_unverified_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = sign_up(&server).await;

    let response = server
        .post("/api/sign-in", &SignInRequest::by_username(&request))
        .await
        .unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();

    assert_eq!(error.code, "NOT_VERIFIED");
    assert_eq!(error.message, "Please verify your account before signing in");
}

#[tokio::test]
async fn test_sign_in_returns_token_and_cookie() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = sign_up_verified(&server).await;

    let response = server
        .post("/api/sign-in", &SignInRequest::by_username(&request))
        .await
        .unwrap();

    let cookie = response
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cookie.starts_with("murmur_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));

    let auth: SignInEnvelope = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(auth.success);
    assert_eq!(auth.message, "Signed in successfully");
    assert!(!auth.token.is_empty());
    assert!(auth.expires_in > 0);
    assert_eq!(auth.user.username, request.username);
    assert_eq!(auth.user.email, request.email);
    assert!(auth.user.is_verified);
    assert!(auth.user.is_accepting_messages);
    assert!(auth.user.id.parse::<u64>().is_ok());
}

#[tokio::test]
async fn test_sign_in_with_email_identifier() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = sign_up_verified(&server).await;

    let response = server
        .post("/api/sign-in", &SignInRequest::by_email(&request))
        .await
        .unwrap();
    let auth: SignInEnvelope = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(auth.user.username, request.username);
}

#[tokio::test]
async fn test_sign_in_wrong_password() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = sign_up_verified(&server).await;

    let sign_in = SignInRequest {
        identifier: request.username.clone(),
        password: "WrongPass123!".to_string(),
    };
    let response = server.post("/api/sign-in", &sign_in).await.unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();

    assert_eq!(error.code, "INVALID_CREDENTIALS");
    assert_eq!(error.message, "Invalid username or password");
}

#[tokio::test]
async fn test_sign_in_unknown_identifier() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    // Indistinguishable from a wrong password
    let sign_in = SignInRequest {
        identifier: format!("ghost{}", unique_suffix()),
        password: "TestPass123!".to_string(),
    };
    let response = server.post("/api/sign-in", &sign_in).await.unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();

    assert_eq!(error.code, "INVALID_CREDENTIALS");
    assert_eq!(error.message, "Invalid username or password");
}

// ============================================================================
// Sign-out Tests
// ============================================================================

#[tokio::test]
async fn test_sign_out_clears_session_cookie() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = sign_in_new_user(&server).await;

    let response = server.post_auth("/api/sign-out", &token, &()).await.unwrap();

    let cookie = response
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cookie.starts_with("murmur_session=;"));

    let body: Envelope = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.success);
    assert_eq!(body.message, "Signed out successfully");
}

// ============================================================================
// Accept-messages Tests
// ============================================================================

#[tokio::test]
async fn test_accept_messages_starts_open() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = sign_in_new_user(&server).await;

    let response = server.get_auth("/api/accept-messages", &token).await.unwrap();
    let status: AcceptStatusEnvelope = assert_json(response, StatusCode::OK).await.unwrap();

    assert!(status.success);
    assert_eq!(status.message, "Message acceptance status retrieved");
    assert!(status.is_accepting_messages);
}

#[tokio::test]
async fn test_accept_messages_toggle_roundtrip() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, token) = sign_in_new_user(&server).await;

    // Close the inbox
    let toggle = AcceptMessagesRequest {
        accept_messages: false,
    };
    let response = server
        .post_auth("/api/accept-messages", &token, &toggle)
        .await
        .unwrap();
    let updated: UpdatedUserEnvelope = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(updated.message, "Message acceptance status updated");
    assert_eq!(updated.updated_user.username, request.username);
    assert!(!updated.updated_user.is_accepting_messages);

    // The read endpoint reflects the store, not the session snapshot
    let response = server.get_auth("/api/accept-messages", &token).await.unwrap();
    let status: AcceptStatusEnvelope = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!status.is_accepting_messages);

    // Reopen
    let toggle = AcceptMessagesRequest {
        accept_messages: true,
    };
    let response = server
        .post_auth("/api/accept-messages", &token, &toggle)
        .await
        .unwrap();
    let updated: UpdatedUserEnvelope = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(updated.updated_user.is_accepting_messages);
}

// ============================================================================
// Send-message Tests
// ============================================================================

#[tokio::test]
async fn test_send_message_and_list_newest_first() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (recipient, token) = sign_in_new_user(&server).await;

    // Anonymous sends carry no credentials
    let first = SendMessageRequest::to(&recipient.username, "an early anonymous note");
    let response = server.post("/api/send-message", &first).await.unwrap();
    let body: Envelope = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.success);
    assert_eq!(body.message, "Message sent successfully");

    let second = SendMessageRequest::to(&recipient.username, "a later anonymous note");
    let response = server.post("/api/send-message", &second).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get_auth("/api/get-messages", &token).await.unwrap();
    let inbox: InboxEnvelope = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(inbox.message, "Messages retrieved successfully");
    assert_eq!(inbox.messages.len(), 2);
    assert_eq!(inbox.messages[0].content, "a later anonymous note");
    assert_eq!(inbox.messages[1].content, "an early anonymous note");
}

#[tokio::test]
async fn test_send_message_closed_inbox() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (recipient, token) = sign_in_new_user(&server).await;

    let toggle = AcceptMessagesRequest {
        accept_messages: false,
    };
    let response = server
        .post_auth("/api/accept-messages", &token, &toggle)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let message = SendMessageRequest::to(&recipient.username, "knocking on a closed door");
    let response = server.post("/api/send-message", &message).await.unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(error.code, "MESSAGES_CLOSED");
    assert_eq!(error.message, "User is not accepting messages");
}

#[tokio::test]
async fn test_send_message_unknown_user() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let message = SendMessageRequest::to(
        &format!("ghost{}", unique_suffix()),
        "a note for an empty room",
    );
    let response = server.post("/api/send-message", &message).await.unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();

    assert_eq!(error.code, "UNKNOWN_USER");
    assert_eq!(error.message, "User not found");
}

#[tokio::test]
async fn test_send_message_content_bounds() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let recipient = sign_up_verified(&server).await;

    // One below the minimum
    let short = SendMessageRequest::to(&recipient.username, "1234567");
    let response = server.post("/api/send-message", &short).await.unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.code, "VALIDATION_ERROR");
    assert_eq!(
        error.message,
        "Message content must be between 8 and 450 characters"
    );

    // One above the maximum
    let long = SendMessageRequest::to(&recipient.username, &"a".repeat(451));
    let response = server.post("/api/send-message", &long).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    // Both boundaries are accepted
    let at_min = SendMessageRequest::to(&recipient.username, "12345678");
    let response = server.post("/api/send-message", &at_min).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let at_max = SendMessageRequest::to(&recipient.username, &"a".repeat(450));
    let response = server.post("/api/send-message", &at_max).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_send_message_unverified_recipient() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let recipient = sign_up(&server).await;

    // A pending registration can already receive messages
    let message = SendMessageRequest::to(&recipient.username, "arrived before the code");
    let response = server.post("/api/send-message", &message).await.unwrap();
    let body: Envelope = assert_json(response, StatusCode::OK).await.unwrap();

    assert!(body.success);
}

// ============================================================================
// Inbox Tests
// ============================================================================

#[tokio::test]
async fn test_delete_message() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (recipient, token) = sign_in_new_user(&server).await;

    let message = SendMessageRequest::to(&recipient.username, "a short-lived message");
    let response = server.post("/api/send-message", &message).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get_auth("/api/get-messages", &token).await.unwrap();
    let inbox: InboxEnvelope = assert_json(response, StatusCode::OK).await.unwrap();
    let message_id = inbox.messages[0].id.clone();

    let response = server
        .delete_auth(&format!("/api/delete-message/{}", message_id), &token)
        .await
        .unwrap();
    let body: Envelope = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.message, "Message deleted");

    let response = server.get_auth("/api/get-messages", &token).await.unwrap();
    let inbox: InboxEnvelope = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(inbox.messages.is_empty());

    // Deleting again finds nothing
    let response = server
        .delete_auth(&format!("/api/delete-message/{}", message_id), &token)
        .await
        .unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(error.code, "UNKNOWN_MESSAGE");
}

#[tokio::test]
async fn test_delete_message_not_deletable_by_others() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (recipient, owner_token) = sign_in_new_user(&server).await;
    let (_, intruder_token) = sign_in_new_user(&server).await;

    let message = SendMessageRequest::to(&recipient.username, "a private message");
    let response = server.post("/api/send-message", &message).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .get_auth("/api/get-messages", &owner_token)
        .await
        .unwrap();
    let inbox: InboxEnvelope = assert_json(response, StatusCode::OK).await.unwrap();
    let message_id = inbox.messages[0].id.clone();

    // Someone else's delete looks identical to a missing message
    let response = server
        .delete_auth(
            &format!("/api/delete-message/{}", message_id),
            &intruder_token,
        )
        .await
        .unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(error.code, "UNKNOWN_MESSAGE");

    // The message is still there for its owner
    let response = server
        .get_auth("/api/get-messages", &owner_token)
        .await
        .unwrap();
    let inbox: InboxEnvelope = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(inbox.messages.len(), 1);
}

#[tokio::test]
async fn test_delete_message_invalid_id() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = sign_in_new_user(&server).await;

    let response = server
        .delete_auth("/api/delete-message/not-a-number", &token)
        .await
        .unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(error.code, "INVALID_PATH_PARAMETER");
}

// ============================================================================
// Username Availability Tests
// ============================================================================

#[tokio::test]
async fn test_check_unique_username_lifecycle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = sign_up(&server).await;

    // A pending registration does not reserve the name
    let response = server
        .get(&format!(
            "/api/check-unique-username?username={}",
            request.username
        ))
        .await
        .unwrap();
    let body: Envelope = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.success);
    assert_eq!(body.message, "Username is available");

    // Verification makes it taken
    let code = server
        .verification_code_for(&request.username)
        .await
        .unwrap();
    let verify = VerifyCodeRequest {
        username: request.username.clone(),
        code,
    };
    let response = server.post("/api/verify-code", &verify).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .get(&format!(
            "/api/check-unique-username?username={}",
            request.username
        ))
        .await
        .unwrap();
    let body: Envelope = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!body.success);
    assert_eq!(body.message, "Username is already taken");
}

#[tokio::test]
async fn test_check_unique_username_requires_parameter() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/api/check-unique-username").await.unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(error.code, "INVALID_QUERY_PARAMETER");
}

#[tokio::test]
async fn test_check_unique_username_rejects_bad_format() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .get("/api/check-unique-username?username=a")
        .await
        .unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(error.code, "VALIDATION_ERROR");
}

// ============================================================================
// Account Deletion Tests
// ============================================================================

#[tokio::test]
async fn test_delete_account_cascades() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, token) = sign_in_new_user(&server).await;

    let message = SendMessageRequest::to(&request.username, "soon to disappear");
    let response = server.post("/api/send-message", &message).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let confirm = DeleteAccountRequest {
        username: request.username.clone(),
    };
    let response = server
        .delete_auth_json("/api/delete-account", &token, &confirm)
        .await
        .unwrap();
    let body: Envelope = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.message, "Account deleted successfully");

    // The credentials are gone
    let response = server
        .post("/api/sign-in", &SignInRequest::by_username(&request))
        .await
        .unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(error.code, "INVALID_CREDENTIALS");

    // The username is free again
    let response = server
        .get(&format!(
            "/api/check-unique-username?username={}",
            request.username
        ))
        .await
        .unwrap();
    let body: Envelope = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.success);

    // A session that outlived its account row no longer reaches the inbox
    let response = server.get_auth("/api/get-messages", &token).await.unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(error.code, "UNKNOWN_USER");
}

#[tokio::test]
async fn test_delete_account_confirmation_mismatch() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = sign_in_new_user(&server).await;

    let confirm = DeleteAccountRequest {
        username: "someone_else".to_string(),
    };
    let response = server
        .delete_auth_json("/api/delete-account", &token, &confirm)
        .await
        .unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(error.code, "VALIDATION_ERROR");
    assert_eq!(error.message, "Username confirmation does not match");

    // Nothing was deleted
    let response = server.get_auth("/api/accept-messages", &token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth Plumbing Tests
// ============================================================================

#[tokio::test]
async fn test_protected_endpoints_require_auth() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/api/get-messages").await.unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(error.code, "NOT_AUTHENTICATED");
    assert_eq!(error.message, "Not authenticated");

    let response = server.get("/api/accept-messages").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server.post("/api/sign-out", &()).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_invalid_session_token_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .get_auth("/api/get-messages", "not.a.token")
        .await
        .unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();

    assert_eq!(error.code, "INVALID_TOKEN");
    assert_eq!(error.message, "Invalid session token");
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    // Missing required fields
    let body = serde_json::json!({ "username": "alice" });
    let response = server.post("/api/sign-up", &body).await.unwrap();
    let error: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert_eq!(error.code, "INVALID_BODY");
}
