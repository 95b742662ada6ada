//! Account handlers
//!
//! Endpoints for registration, verification, sign-in/out, the
//! accepting-messages flag, and account deletion.

use axum::extract::State;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use murmur_common::SESSION_COOKIE;
use murmur_service::{
    AcceptMessagesRequest, AcceptStatusResponse, AccountService, DeleteAccountRequest,
    SignInRequest, SignInResponse, SignUpRequest, UpdatedUserResponse, VerifyCodeRequest,
};
use tracing::info;

use crate::extractors::{SessionUser, ValidatedJson};
use crate::response::{ApiResult, Envelope};
use crate::state::AppState;

/// Register a new account and dispatch the verification code
///
/// POST /api/sign-up
pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignUpRequest>,
) -> ApiResult<Envelope> {
    let service = AccountService::new(state.service_context());
    service.register(request).await?;
    Ok(Envelope::ok(
        "User registered successfully. Please verify your account",
    ))
}

/// Confirm a pending registration with the emailed code
///
/// POST /api/verify-code
pub async fn verify_code(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<VerifyCodeRequest>,
) -> ApiResult<Envelope> {
    let service = AccountService::new(state.service_context());
    service.verify_code(request).await?;
    Ok(Envelope::ok("User verified successfully"))
}

/// Sign in and establish the session cookie
///
/// POST /api/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<SignInRequest>,
) -> ApiResult<(CookieJar, Envelope<SignInResponse>)> {
    let service = AccountService::new(state.service_context());
    let (session, user) = service.authenticate(request).await?;

    let secure = state.config().app.env.is_production();
    let jar = jar.add(session_cookie(
        session.token.clone(),
        session.expires_in,
        secure,
    ));

    let response = SignInResponse::new(session.token, session.expires_in, user.into());
    Ok((jar, Envelope::ok_with("Signed in successfully", response)))
}

/// Drop the session cookie
///
/// POST /api/sign-out
pub async fn sign_out(session: SessionUser, jar: CookieJar) -> ApiResult<(CookieJar, Envelope)> {
    let jar = jar.remove(removal_cookie());
    info!(user_id = %session.user_id, "User signed out");
    Ok((jar, Envelope::ok("Signed out successfully")))
}

/// Read the live accepting-messages flag from the store
///
/// GET /api/accept-messages
pub async fn get_accept_status(
    State(state): State<AppState>,
    session: SessionUser,
) -> ApiResult<Envelope<AcceptStatusResponse>> {
    let service = AccountService::new(state.service_context());
    let is_accepting_messages = service.get_accepting_messages(session.user_id).await?;
    Ok(Envelope::ok_with(
        "Message acceptance status retrieved",
        AcceptStatusResponse {
            is_accepting_messages,
        },
    ))
}

/// Toggle whether the caller's inbox accepts new messages
///
/// POST /api/accept-messages
pub async fn set_accept_status(
    State(state): State<AppState>,
    session: SessionUser,
    ValidatedJson(request): ValidatedJson<AcceptMessagesRequest>,
) -> ApiResult<Envelope<UpdatedUserResponse>> {
    let service = AccountService::new(state.service_context());
    let user = service
        .set_accepting_messages(session.user_id, request.accept_messages)
        .await?;
    Ok(Envelope::ok_with(
        "Message acceptance status updated",
        UpdatedUserResponse {
            updated_user: user.into(),
        },
    ))
}

/// Delete the caller's account after username confirmation
///
/// DELETE /api/delete-account
pub async fn delete_account(
    State(state): State<AppState>,
    session: SessionUser,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<DeleteAccountRequest>,
) -> ApiResult<(CookieJar, Envelope)> {
    let service = AccountService::new(state.service_context());
    service.delete_account(session.user_id, request).await?;
    let jar = jar.remove(removal_cookie());
    Ok((jar, Envelope::ok("Account deleted successfully")))
}

/// Session cookie carrying the issued token
fn session_cookie(token: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// Removal cookie matching the session cookie's name and path
fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}
