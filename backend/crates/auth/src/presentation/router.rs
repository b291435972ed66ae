//! Auth Routers

use axum::{
    Router,
    routing::{get, post},
};

use crate::domain::repository::{SessionRepository, UserRepository};
use crate::presentation::handlers::{self, AuthAppState};

/// Routes nested under `/api/auth`
pub fn auth_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/login", post(handlers::login::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .route("/logout-all", post(handlers::logout_all::<R>))
        .route("/verify", get(handlers::verify::<R>))
        .with_state(state)
}

/// Routes nested under `/api/users`
pub fn users_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/",
            get(handlers::get_current_user::<R>)
                .post(handlers::sign_up::<R>)
                .put(handlers::update_current_user::<R>),
        )
        .with_state(state)
}
