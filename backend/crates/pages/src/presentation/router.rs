//! Page Routers

use axum::{
    Router, middleware,
    routing::{get, post},
};

use auth::middleware::require_user;
use auth::{AuthAppState, SessionRepository, UserRepository};

use crate::domain::repository::PageRepository;
use crate::presentation::handlers::{self, PagesAppState};

/// Routes nested under `/api/landing-pages`, all behind a session check
pub fn landing_pages_router<R, A>(state: PagesAppState<R>, auth: AuthAppState<A>) -> Router
where
    R: PageRepository + Clone + Send + Sync + 'static,
    A: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/",
            get(handlers::list_pages::<R>).post(handlers::create_page::<R>),
        )
        .route("/check-slug", get(handlers::check_slug::<R>))
        .route(
            "/{id}",
            get(handlers::get_page::<R>)
                .put(handlers::update_page::<R>)
                .delete(handlers::delete_page::<R>),
        )
        .route_layer(middleware::from_fn_with_state(auth, require_user::<A>))
        .with_state(state)
}

/// Routes nested under `/api/public`, no session required
pub fn public_pages_router<R>(state: PagesAppState<R>) -> Router
where
    R: PageRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/pages/{slug}", get(handlers::public_page::<R>))
        .route(
            "/pages/{slug}/conversions",
            post(handlers::record_conversion::<R>),
        )
        .with_state(state)
}
