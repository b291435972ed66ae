//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use platform::cookie::{extract_cookie, set_cookie_header};

use crate::application::config::AuthConfig;
use crate::application::{
    AuthenticateUseCase, AuthenticatedUser, GetProfileUseCase, SignInInput, SignInUseCase,
    SignOutUseCase, SignUpInput, SignUpUseCase, UpdateProfileInput, UpdateProfileUseCase,
};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    LoginRequest, LoginResponse, LogoutAllResponse, MessageResponse, ProfileResponse,
    SignUpRequest, UpdateProfileRequest, VerifyResponse,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Run the session authenticator on the request's cookie
    pub async fn authenticate(&self, headers: &HeaderMap) -> AuthResult<AuthenticatedUser> {
        let token = extract_cookie(headers, &self.config.session_cookie_name);
        AuthenticateUseCase::new(self.repo.clone())
            .execute(token.as_deref())
            .await
    }
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = body.map_err(reject_body)?;

    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let token = output.session_token.into_inner();
    let cookie = state.config.cookie().build_set_cookie(&token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, set_cookie_header(&cookie))],
        Json(LoginResponse {
            success: true,
            user: output.user,
            token,
        }),
    ))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
///
/// Always succeeds and clears the cookie.
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> impl IntoResponse
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    if let Some(token) = extract_cookie(&headers, &state.config.session_cookie_name) {
        let use_case = SignOutUseCase::new(state.repo.clone());
        if let Err(e) = use_case.execute(&token).await {
            tracing::warn!(error = %e, "Failed to delete session on logout");
        }
    }

    (
        StatusCode::OK,
        [(header::SET_COOKIE, clear_cookie(&state.config))],
        Json(MessageResponse::ok("Logged out")),
    )
}

/// POST /api/auth/logout-all
pub async fn logout_all<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let user = state.authenticate(&headers).await?;

    let revoked = SignOutUseCase::new(state.repo.clone())
        .execute_all(&user.id)
        .await?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, clear_cookie(&state.config))],
        Json(LogoutAllResponse {
            success: true,
            message: "Logged out from all sessions".to_string(),
            revoked,
        }),
    ))
}

// ============================================================================
// Verify
// ============================================================================

/// GET /api/auth/verify
pub async fn verify<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<VerifyResponse>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let user = state.authenticate(&headers).await?;

    Ok(Json(VerifyResponse {
        success: true,
        user,
    }))
}

// ============================================================================
// Users
// ============================================================================

/// POST /api/users
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    body: Result<Json<SignUpRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = body.map_err(reject_body)?;

    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone());

    let user = use_case
        .execute(SignUpInput {
            name: req.name,
            email: req.email,
            password: req.password,
            company: req.company,
            phone: req.phone,
            source: req.source,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProfileResponse {
            success: true,
            user,
        }),
    ))
}

/// GET /api/users
pub async fn get_current_user<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<ProfileResponse>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let caller = state.authenticate(&headers).await?;

    let user = GetProfileUseCase::new(state.repo.clone())
        .execute(&caller.id)
        .await?;

    Ok(Json(ProfileResponse {
        success: true,
        user,
    }))
}

/// PUT /api/users
pub async fn update_current_user<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    body: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> AuthResult<Json<ProfileResponse>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let caller = state.authenticate(&headers).await?;
    let Json(req) = body.map_err(reject_body)?;

    let user = UpdateProfileUseCase::new(state.repo.clone())
        .execute(
            &caller.id,
            UpdateProfileInput {
                name: req.name,
                company: req.company,
                phone: req.phone,
            },
        )
        .await?;

    Ok(Json(ProfileResponse {
        success: true,
        user,
    }))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn clear_cookie(config: &AuthConfig) -> axum::http::HeaderValue {
    set_cookie_header(&config.cookie().build_delete_cookie())
}

/// Malformed or non-JSON body
pub fn reject_body(rejection: JsonRejection) -> AuthError {
    AuthError::Validation(rejection.body_text())
}
