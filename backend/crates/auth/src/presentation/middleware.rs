//! Auth Middleware
//!
//! - [`access_control`]: page-level redirects from cookie presence alone
//! - [`require_user`]: full session check for API routes, puts the
//!   [`AuthenticatedUser`] into request extensions

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;

use platform::cookie::extract_cookie;

use crate::application::AuthenticatedUser;
use crate::application::config::SESSION_COOKIE_NAME;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::presentation::handlers::AuthAppState;

// ============================================================================
// Access Policy
// ============================================================================

/// Outcome of [`AccessPolicy::decide`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Let the request through
    Pass,
    /// Send the browser elsewhere (307)
    Redirect(String),
}

/// Path-prefix rules for page navigation
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    /// Need a session cookie
    pub protected_prefixes: Vec<String>,
    /// Only for visitors without a session cookie
    pub auth_only_prefixes: Vec<String>,
    /// Where anonymous visitors of protected pages go
    pub login_path: String,
    /// Where signed-in visitors of auth-only pages go
    pub home_path: String,
    pub session_cookie_name: String,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            protected_prefixes: vec![
                "/dashboard".to_string(),
                "/editor".to_string(),
                "/settings".to_string(),
            ],
            auth_only_prefixes: vec!["/login".to_string(), "/signup".to_string()],
            login_path: "/login".to_string(),
            home_path: "/dashboard".to_string(),
            session_cookie_name: SESSION_COOKIE_NAME.to_string(),
        }
    }
}

impl AccessPolicy {
    /// Decide from the path and whether a session cookie is present
    ///
    /// Cookie presence only; whether the session is alive is checked by the
    /// authenticator on the API side.
    pub fn decide(&self, path: &str, has_session_cookie: bool) -> AccessDecision {
        if !has_session_cookie && Self::matches_any(&self.protected_prefixes, path) {
            return AccessDecision::Redirect(self.login_path.clone());
        }

        if has_session_cookie && Self::matches_any(&self.auth_only_prefixes, path) {
            return AccessDecision::Redirect(self.home_path.clone());
        }

        AccessDecision::Pass
    }

    fn matches_any(prefixes: &[String], path: &str) -> bool {
        prefixes.iter().any(|prefix| path_has_prefix(path, prefix))
    }
}

/// Segment-aware prefix match: `/dashboard` matches `/dashboard` and
/// `/dashboard/x`, not `/dashboardx`
pub fn path_has_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}

/// Access-control middleware, applied to the whole app
///
/// ```ignore
/// let app = Router::new()
///     .merge(routes)
///     .layer(axum::middleware::from_fn_with_state(
///         Arc::new(AccessPolicy::default()),
///         access_control,
///     ));
/// ```
pub async fn access_control(
    State(policy): State<Arc<AccessPolicy>>,
    req: Request,
    next: Next,
) -> Response {
    let has_cookie = extract_cookie(req.headers(), &policy.session_cookie_name).is_some();

    match policy.decide(req.uri().path(), has_cookie) {
        AccessDecision::Pass => next.run(req).await,
        AccessDecision::Redirect(to) => {
            tracing::debug!(path = %req.uri().path(), to = %to, "Access control redirect");
            Redirect::temporary(&to).into_response()
        }
    }
}

// ============================================================================
// Require User
// ============================================================================

/// Middleware that requires a valid session
///
/// Failures answer with the authenticator's error (401 or 404). Downstream
/// handlers read `Extension<AuthenticatedUser>`.
pub async fn require_user<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    match state.authenticate(req.headers()).await {
        Ok(user) => {
            req.extensions_mut().insert::<AuthenticatedUser>(user);
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}
