//! Router Assembly
//!
//! Generic over the document store so the same wiring serves Postgres in
//! production and the in-memory store in development and tests.

use std::sync::Arc;

use auth::middleware::{AccessPolicy, access_control};
use auth::{AuthAppState, AuthConfig, DocAuthRepository, auth_router, users_router};
use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use kernel::error::app_error::AppError;
use pages::{DocPageRepository, PagesAppState, landing_pages_router, public_pages_router};
use platform::docstore::DocumentStore;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

/// Full application router
pub fn build_app<S>(store: Arc<S>, auth_config: AuthConfig, frontend_origins: &[String]) -> Router
where
    S: DocumentStore + Send + Sync + 'static,
{
    let auth_state = AuthAppState::new(
        Arc::new(DocAuthRepository::new(store.clone())),
        Arc::new(auth_config),
    );
    let pages_state = PagesAppState::new(Arc::new(DocPageRepository::new(store)));

    let policy = Arc::new(AccessPolicy {
        session_cookie_name: auth_state.config.session_cookie_name.clone(),
        ..AccessPolicy::default()
    });

    Router::new()
        .nest("/api/auth", auth_router(auth_state.clone()))
        .nest("/api/users", users_router(auth_state.clone()))
        .nest(
            "/api/landing-pages",
            landing_pages_router(pages_state.clone(), auth_state),
        )
        .nest("/api/public", public_pages_router(pages_state))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(policy, access_control))
        .layer(TraceLayer::new_for_http())
        .layer(cors(frontend_origins))
}

async fn not_found() -> AppError {
    AppError::not_found("Route not found")
}

fn cors(frontend_origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use platform::docstore::MemoryDocumentStore;
    use tower::ServiceExt;

    fn app() -> Router {
        build_app(
            Arc::new(MemoryDocumentStore::new()),
            AuthConfig::development(),
            &["http://localhost:5173".to_string()],
        )
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = cookie {
            builder = builder.header(header::COOKIE, format!("session_token={token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_protected_page_redirects_to_login() {
        let response = app().oneshot(get("/dashboard", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }

    #[tokio::test]
    async fn test_login_page_redirects_when_cookie_present() {
        let response = app().oneshot(get("/login", Some("lps_any"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/dashboard");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let response = app().oneshot(get("/nope", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_signup_login_create_page_flow() {
        let app = app();

        let signup = Request::builder()
            .method("POST")
            .uri("/api/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({
                    "name": "Ana",
                    "email": "ana@lpfacil.com",
                    "password": "secret123"
                })
                .to_string(),
            ))
            .unwrap();
        let response = app.clone().oneshot(signup).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let login = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({ "email": "ana@lpfacil.com", "password": "secret123" })
                    .to_string(),
            ))
            .unwrap();
        let response = app.clone().oneshot(login).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let token = body["token"].as_str().unwrap().to_string();

        let create = Request::builder()
            .method("POST")
            .uri("/api/landing-pages")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, format!("session_token={token}"))
            .body(Body::from(
                serde_json::json!({ "title": "Launch", "slug": "launch" }).to_string(),
            ))
            .unwrap();
        let response = app.clone().oneshot(create).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(get("/api/landing-pages", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
