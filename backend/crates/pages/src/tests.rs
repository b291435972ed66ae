//! HTTP-level tests for the pages crate
//!
//! The page routers run with the real session check in front of them; users
//! and sessions live in the same in-memory document store as the pages.

#[cfg(test)]
mod support {
    use std::sync::Arc;

    use auth::application::{SignInInput, SignInUseCase, SignUpInput, SignUpUseCase};
    use auth::{AuthAppState, AuthConfig, DocAuthRepository};
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, Response, header};
    use platform::docstore::MemoryDocumentStore;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::{DocPageRepository, PagesAppState, landing_pages_router, public_pages_router};

    pub struct TestApp {
        pub router: Router,
        auth_repo: Arc<DocAuthRepository<MemoryDocumentStore>>,
        config: Arc<AuthConfig>,
    }

    pub async fn app() -> TestApp {
        let store = Arc::new(MemoryDocumentStore::new());
        let auth_repo = Arc::new(DocAuthRepository::new(store.clone()));
        let config = Arc::new(AuthConfig::development());
        let auth_state = AuthAppState::new(auth_repo.clone(), config.clone());
        let pages_state = PagesAppState::new(Arc::new(DocPageRepository::new(store)));

        let router = Router::new()
            .nest(
                "/api/landing-pages",
                landing_pages_router(pages_state.clone(), auth_state),
            )
            .nest("/api/public", public_pages_router(pages_state));

        TestApp {
            router,
            auth_repo,
            config,
        }
    }

    impl TestApp {
        /// Register a user and return a live session token
        pub async fn user(&self, email: &str) -> String {
            SignUpUseCase::new(self.auth_repo.clone(), self.config.clone())
                .execute(SignUpInput {
                    name: Some("Page Owner".into()),
                    email: Some(email.into()),
                    password: Some("demo123".into()),
                    company: None,
                    phone: None,
                    source: None,
                })
                .await
                .unwrap();

            SignInUseCase::new(self.auth_repo.clone(), self.config.clone())
                .execute(SignInInput {
                    email: Some(email.into()),
                    password: Some("demo123".into()),
                })
                .await
                .unwrap()
                .session_token
                .into_inner()
        }

        pub async fn send(&self, request: Request<Body>) -> (u16, Value) {
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status().as_u16();
            (status, body_json(response).await)
        }

        /// Create a page and return its JSON
        pub async fn create(&self, token: &str, slug: &str) -> Value {
            let (status, body) = self
                .send(json_request(
                    "POST",
                    "/api/landing-pages",
                    serde_json::json!({ "title": format!("Page {slug}"), "slug": slug }),
                    Some(token),
                ))
                .await;
            assert_eq!(status, 201, "{body}");
            body["page"].clone()
        }
    }

    pub fn json_request(
        method: &str,
        uri: &str,
        body: Value,
        cookie: Option<&str>,
    ) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = cookie {
            builder = builder.header(header::COOKIE, format!("session_token={token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    pub fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = cookie {
            builder = builder.header(header::COOKIE, format!("session_token={token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response<Body>) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        if bytes.is_empty() {
            return Value::Null;
        }
        serde_json::from_slice(&bytes).unwrap()
    }
}

#[cfg(test)]
mod owner_tests {
    use serde_json::json;

    use super::support::*;

    #[tokio::test]
    async fn test_requires_session() {
        let app = app().await;

        let (status, body) = app
            .send(empty_request("GET", "/api/landing-pages", None))
            .await;
        assert_eq!(status, 401);
        assert_eq!(body["success"], false);

        let (status, _) = app
            .send(empty_request("GET", "/api/landing-pages", Some("lps_bogus")))
            .await;
        assert_eq!(status, 401);
    }

    #[tokio::test]
    async fn test_create_and_read_own_page() {
        let app = app().await;
        let token = app.user("owner@lpfacil.com").await;

        let page = app.create(&token, "summer-sale").await;
        assert_eq!(page["slug"], "summer-sale");
        assert_eq!(page["status"], "draft");
        assert_eq!(page["template"], "default");
        assert_eq!(page["views"], 0);
        assert_eq!(page["revision"], 1);

        let id = page["id"].as_str().unwrap();
        let (status, body) = app
            .send(empty_request("GET", &format!("/api/landing-pages/{id}"), Some(&token)))
            .await;
        assert_eq!(status, 200);
        assert_eq!(body["page"]["title"], "Page summer-sale");
    }

    #[tokio::test]
    async fn test_other_users_page_is_forbidden() {
        let app = app().await;
        let owner = app.user("owner@lpfacil.com").await;
        let intruder = app.user("intruder@lpfacil.com").await;

        let page = app.create(&owner, "private-page").await;
        let uri = format!("/api/landing-pages/{}", page["id"].as_str().unwrap());

        let (status, body) = app.send(empty_request("GET", &uri, Some(&intruder))).await;
        assert_eq!(status, 403);
        assert!(body.get("page").is_none());

        let (status, _) = app
            .send(json_request("PUT", &uri, json!({ "title": "Hijacked" }), Some(&intruder)))
            .await;
        assert_eq!(status, 403);

        let (status, _) = app.send(empty_request("DELETE", &uri, Some(&intruder))).await;
        assert_eq!(status, 403);

        let (status, body) = app.send(empty_request("GET", &uri, Some(&owner))).await;
        assert_eq!(status, 200);
        assert_eq!(body["page"]["title"], "Page private-page");

        // Listing never leaks other owners' pages
        let (_, body) = app
            .send(empty_request("GET", "/api/landing-pages", Some(&intruder)))
            .await;
        assert_eq!(body["pages"], json!([]));
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids() {
        let app = app().await;
        let token = app.user("owner@lpfacil.com").await;

        let missing = format!("/api/landing-pages/{}", kernel::id::LandingPageId::new());
        let (status, _) = app.send(empty_request("GET", &missing, Some(&token))).await;
        assert_eq!(status, 404);

        let (status, _) = app
            .send(empty_request("DELETE", "/api/landing-pages/not-a-uuid", Some(&token)))
            .await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn test_create_validation() {
        let app = app().await;
        let token = app.user("owner@lpfacil.com").await;

        let cases = [
            (json!({ "slug": "promo" }), 400),
            (json!({ "title": "Promo" }), 400),
            (json!({ "title": "Promo", "slug": "ab" }), 400),
            (json!({ "title": "Promo", "slug": "My_Page" }), 400),
            (json!({ "title": "Promo", "slug": "dashboard" }), 400),
            (json!({ "title": "x".repeat(201), "slug": "promo" }), 400),
        ];

        for (body, expected) in cases {
            let (status, response) = app
                .send(json_request("POST", "/api/landing-pages", body.clone(), Some(&token)))
                .await;
            assert_eq!(status, expected, "{body} -> {response}");
            assert_eq!(response["code"], "BAD_REQUEST");
        }

        let malformed = axum::http::Request::builder()
            .method("POST")
            .uri("/api/landing-pages")
            .header("content-type", "application/json")
            .header("cookie", format!("session_token={token}"))
            .body(axum::body::Body::from("{not json"))
            .unwrap();
        let (status, _) = app.send(malformed).await;
        assert_eq!(status, 400);
    }

    #[tokio::test]
    async fn test_duplicate_slug_conflicts() {
        let app = app().await;
        let first = app.user("first@lpfacil.com").await;
        let second = app.user("second@lpfacil.com").await;

        app.create(&first, "promo").await;

        let (status, body) = app
            .send(json_request(
                "POST",
                "/api/landing-pages",
                json!({ "title": "Mine too", "slug": "promo" }),
                Some(&second),
            ))
            .await;
        assert_eq!(status, 409);
        assert_eq!(body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_update_with_revision() {
        let app = app().await;
        let token = app.user("owner@lpfacil.com").await;
        let page = app.create(&token, "promo").await;
        let uri = format!("/api/landing-pages/{}", page["id"].as_str().unwrap());

        let (status, body) = app
            .send(json_request(
                "PUT",
                &uri,
                json!({
                    "title": "Launch",
                    "status": "published",
                    "sections": [{ "type": "hero", "headline": "Hi" }],
                    "revision": 1
                }),
                Some(&token),
            ))
            .await;
        assert_eq!(status, 200, "{body}");
        assert_eq!(body["page"]["title"], "Launch");
        assert_eq!(body["page"]["status"], "published");
        assert_eq!(body["page"]["slug"], "promo");
        assert_eq!(body["page"]["revision"], 2);

        let stale = json!({ "title": "Stale", "revision": 1 });
        let (status, body) = app.send(json_request("PUT", &uri, stale, Some(&token))).await;
        assert_eq!(status, 409);
        assert_eq!(body["code"], "CONFLICT");

        let (status, _) = app
            .send(json_request("PUT", &uri, json!({ "status": "deleted" }), Some(&token)))
            .await;
        assert_eq!(status, 400);
    }

    #[tokio::test]
    async fn test_list_newest_first_and_delete() {
        let app = app().await;
        let token = app.user("owner@lpfacil.com").await;

        let first = app.create(&token, "first-page").await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        app.create(&token, "second-page").await;

        let (status, body) = app
            .send(empty_request("GET", "/api/landing-pages", Some(&token)))
            .await;
        assert_eq!(status, 200);
        let slugs: Vec<_> = body["pages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["slug"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(slugs, vec!["second-page", "first-page"]);

        let uri = format!("/api/landing-pages/{}", first["id"].as_str().unwrap());
        let (status, body) = app.send(empty_request("DELETE", &uri, Some(&token))).await;
        assert_eq!(status, 200);
        assert_eq!(body["success"], true);

        let (status, _) = app.send(empty_request("GET", &uri, Some(&token))).await;
        assert_eq!(status, 404);
    }
}

#[cfg(test)]
mod check_slug_tests {
    use super::support::*;

    #[tokio::test]
    async fn test_check_slug_endpoint() {
        let app = app().await;
        let token = app.user("owner@lpfacil.com").await;
        let page = app.create(&token, "promo").await;
        let id = page["id"].as_str().unwrap();

        let check = |query: String| {
            let uri = format!("/api/landing-pages/check-slug?{query}");
            empty_request("GET", &uri, Some(&token))
        };

        let (status, body) = app.send(check("slug=fresh-page".into())).await;
        assert_eq!(status, 200);
        assert_eq!(body["available"], true);
        assert!(body.get("reason").is_none());

        let (_, body) = app.send(check("slug=promo".into())).await;
        assert_eq!(body["available"], false);

        let (_, body) = app.send(check(format!("slug=promo&excludeId={id}"))).await;
        assert_eq!(body["available"], true);

        let (status, body) = app.send(check("slug=UPPER".into())).await;
        assert_eq!(status, 200);
        assert_eq!(body["available"], false);
        assert!(body["reason"].as_str().unwrap().contains("lowercase"));

        let (_, body) = app.send(check("slug=www".into())).await;
        assert_eq!(body["reason"], "Slug is reserved");
    }
}

#[cfg(test)]
mod public_tests {
    use serde_json::json;

    use super::support::*;

    #[tokio::test]
    async fn test_only_published_pages_are_public() {
        let app = app().await;
        let token = app.user("owner@lpfacil.com").await;
        let page = app.create(&token, "launch").await;
        let uri = format!("/api/landing-pages/{}", page["id"].as_str().unwrap());

        let (status, _) = app
            .send(empty_request("GET", "/api/public/pages/launch", None))
            .await;
        assert_eq!(status, 404);

        app.send(json_request("PUT", &uri, json!({ "status": "published" }), Some(&token)))
            .await;

        let (status, body) = app
            .send(empty_request("GET", "/api/public/pages/launch", None))
            .await;
        assert_eq!(status, 200);
        assert_eq!(body["page"]["title"], "Page launch");
        assert!(body["page"].get("userId").is_none());
        assert!(body["page"].get("views").is_none());

        app.send(json_request("PUT", &uri, json!({ "status": "archived" }), Some(&token)))
            .await;
        let (status, _) = app
            .send(empty_request("GET", "/api/public/pages/launch", None))
            .await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn test_counters() {
        let app = app().await;
        let token = app.user("owner@lpfacil.com").await;
        let page = app.create(&token, "launch").await;
        let uri = format!("/api/landing-pages/{}", page["id"].as_str().unwrap());
        app.send(json_request("PUT", &uri, json!({ "status": "published" }), Some(&token)))
            .await;

        for _ in 0..3 {
            app.send(empty_request("GET", "/api/public/pages/launch", None))
                .await;
        }
        let (status, body) = app
            .send(empty_request("POST", "/api/public/pages/launch/conversions", None))
            .await;
        assert_eq!(status, 200);
        assert_eq!(body["conversions"], 1);

        let (_, body) = app.send(empty_request("GET", &uri, Some(&token))).await;
        assert_eq!(body["page"]["views"], 3);
        assert_eq!(body["page"]["conversions"], 1);
    }
}
