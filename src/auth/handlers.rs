use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use lazy_static::lazy_static;
use regex::Regex;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, instrument, warn};

use crate::{
    auth::{
        cookie::{clear_session_cookie, session_cookie},
        dto::{
            ApiResponse, LoginRequest, RegisterRequest, ResetPasswordRequest, SendResetOtpRequest,
            VerifyAccountRequest,
        },
        error::AuthError,
        extractors::AuthUser,
        jwt::JwtKeys,
        otp::generate_otp,
        password::{hash_password, verify_password},
        repo_types::User,
    },
    mailer::{reset_otp_email, verify_otp_email, welcome_email},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/send-verify-otp", post(send_verify_otp))
        .route("/auth/verify-account", post(verify_account))
        .route("/auth/is-auth", get(is_auth))
        .route("/auth/send-reset-otp", post(send_reset_otp))
        .route("/auth/reset-password", post(reset_password))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// A required field counts as missing when absent or blank.
fn require(field: Option<String>, message: &str) -> Result<String, AuthError> {
    match field {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AuthError::Validation(message.to_string())),
    }
}

/// Checks a stored OTP against the supplied code. Mismatch (including no
/// outstanding code) and expiry are distinct failures.
fn check_otp(
    stored: Option<&str>,
    expiry: Option<OffsetDateTime>,
    supplied: &str,
    now: OffsetDateTime,
) -> Result<(), AuthError> {
    match stored {
        Some(code) if code == supplied => {}
        _ => return Err(AuthError::InvalidOtp),
    }
    match expiry {
        Some(exp) if exp > now => Ok(()),
        _ => Err(AuthError::ExpiredOtp),
    }
}

#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<ApiResponse>), AuthError> {
    let name = require(payload.name, "Missing Details")?;
    let email = require(payload.email, "Missing Details")?;
    let password = require(payload.password, "Missing Details")?;

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AuthError::Validation("Invalid email".into()));
    }

    // Ensure email is not taken
    if User::find_by_email(&state.db, &email)
        .await
        .map_err(AuthError::Internal)?
        .is_some()
    {
        warn!(email = %email, "email already registered");
        return Err(AuthError::Conflict("User Already Exists".into()));
    }

    let hash = hash_password(&password).map_err(AuthError::Internal)?;
    let user = User::create(&state.db, &name, &email, &hash)
        .await
        .map_err(AuthError::Internal)?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id).map_err(AuthError::Internal)?;
    let cookie = session_cookie(token, keys.session_ttl, state.config.cookie_secure);

    // Welcome mail is best-effort: a failed send must not fail registration.
    let (subject, body) = welcome_email(&user.name);
    if let Err(e) = state.mailer.send(&user.email, &subject, &body).await {
        warn!(error = %e, email = %user.email, "welcome email failed");
    }

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        jar.add(cookie),
        Json(ApiResponse::ok("Registration Successful")),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse>), AuthError> {
    let email = require(payload.email, "Email and password are required")?;
    let password = require(payload.password, "Email and password are required")?;

    // Same error for unknown email and wrong password, no user enumeration
    let user = match User::find_by_email(&state.db, &email)
        .await
        .map_err(AuthError::Internal)?
    {
        Some(u) => u,
        None => {
            warn!(email = %email, "login unknown email");
            return Err(AuthError::InvalidCredentials);
        }
    };

    let ok = verify_password(&password, &user.password_hash).map_err(AuthError::Internal)?;
    if !ok {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id).map_err(AuthError::Internal)?;
    let cookie = session_cookie(token, keys.session_ttl, state.config.cookie_secure);

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((jar.add(cookie), Json(ApiResponse::ok("Login Successful"))))
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse>) {
    // Purely client-side: the token itself stays valid until it expires
    let jar = jar.add(clear_session_cookie(state.config.cookie_secure));
    (jar, Json(ApiResponse::ok("Logout Successful")))
}

#[instrument(skip(state))]
pub async fn send_verify_otp(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ApiResponse>, AuthError> {
    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(AuthError::Internal)?
        .ok_or(AuthError::UserNotFound)?;

    if user.is_account_verified {
        return Err(AuthError::Conflict("Account is already verified".into()));
    }

    let otp = generate_otp();
    let expiry = OffsetDateTime::now_utc() + Duration::hours(24);
    User::store_verify_otp(&state.db, user.id, &otp, expiry)
        .await
        .map_err(AuthError::Internal)?;

    let (subject, body) = verify_otp_email(&user.name, &otp);
    state
        .mailer
        .send(&user.email, &subject, &body)
        .await
        .map_err(AuthError::Internal)?;

    info!(user_id = %user.id, "verification otp issued");
    Ok(Json(ApiResponse::ok(
        "OTP sent to your email for account verification",
    )))
}

#[instrument(skip(state, payload))]
pub async fn verify_account(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<VerifyAccountRequest>,
) -> Result<Json<ApiResponse>, AuthError> {
    let otp = require(payload.otp, "Missing Details")?;

    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(AuthError::Internal)?
        .ok_or(AuthError::UserNotFound)?;

    let now = OffsetDateTime::now_utc();
    check_otp(user.verify_otp.as_deref(), user.verify_otp_expiry, &otp, now)?;

    // The update re-checks code and expiry, so of two concurrent requests
    // with the same code only one lands here with rows_affected == 1.
    let consumed = User::consume_verify_otp(&state.db, user.id, &otp, now)
        .await
        .map_err(AuthError::Internal)?;
    if !consumed {
        warn!(user_id = %user.id, "verification otp consumed concurrently");
        return Err(AuthError::InvalidOtp);
    }

    info!(user_id = %user.id, "account verified");
    Ok(Json(ApiResponse::ok("Account Verified Successfully")))
}

#[instrument]
pub async fn is_auth(AuthUser(user_id): AuthUser) -> Json<ApiResponse> {
    debug!(user_id = %user_id, "session check");
    Json(ApiResponse::ok("User is authenticated"))
}

#[instrument(skip(state, payload))]
pub async fn send_reset_otp(
    State(state): State<AppState>,
    Json(payload): Json<SendResetOtpRequest>,
) -> Result<Json<ApiResponse>, AuthError> {
    let email = require(payload.email, "Email is required")?;

    let user = User::find_by_email(&state.db, &email)
        .await
        .map_err(AuthError::Internal)?
        .ok_or(AuthError::UserNotFound)?;

    let otp = generate_otp();
    let expiry = OffsetDateTime::now_utc() + Duration::minutes(15);
    User::store_reset_otp(&state.db, user.id, &otp, expiry)
        .await
        .map_err(AuthError::Internal)?;

    let (subject, body) = reset_otp_email(&user.name, &otp);
    state
        .mailer
        .send(&user.email, &subject, &body)
        .await
        .map_err(AuthError::Internal)?;

    info!(user_id = %user.id, "reset otp issued");
    Ok(Json(ApiResponse::ok(
        "Password reset OTP sent to your email",
    )))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse>, AuthError> {
    let email = require(payload.email, "Missing Details")?;
    let otp = require(payload.otp, "Missing Details")?;
    let new_password = require(payload.new_password, "Missing Details")?;

    let user = User::find_by_email(&state.db, &email)
        .await
        .map_err(AuthError::Internal)?
        .ok_or(AuthError::UserNotFound)?;

    let now = OffsetDateTime::now_utc();
    check_otp(user.reset_otp.as_deref(), user.reset_otp_expiry, &otp, now)?;

    let hash = hash_password(&new_password).map_err(AuthError::Internal)?;
    let consumed = User::consume_reset_otp(&state.db, user.id, &otp, &hash, now)
        .await
        .map_err(AuthError::Internal)?;
    if !consumed {
        warn!(user_id = %user.id, "reset otp consumed concurrently");
        return Err(AuthError::InvalidOtp);
    }

    info!(user_id = %user.id, "password reset");
    Ok(Json(ApiResponse::ok("Password Reset Successfully")))
}
