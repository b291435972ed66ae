//! HTTP Handlers
//!
//! Owner routes read the caller from `Extension<AuthenticatedUser>`, which
//! `auth::middleware::require_user` inserts.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use std::sync::Arc;

use auth::AuthenticatedUser;
use kernel::id::LandingPageId;

use crate::application::{
    CheckSlugInput, CheckSlugUseCase, CreatePageInput, CreatePageUseCase, DeletePageUseCase,
    GetPageUseCase, ListPagesUseCase, PublicPageUseCase, RecordConversionUseCase,
    UpdatePageInput, UpdatePageUseCase,
};
use crate::domain::repository::PageRepository;
use crate::error::{PageError, PageResult};
use crate::presentation::dto::{
    CheckSlugQuery, CheckSlugResponse, ConversionResponse, CreatePageRequest, MessageResponse,
    PageListResponse, PageResponse, PublicPageResponse, UpdatePageRequest,
};

/// Shared state for page handlers
#[derive(Clone)]
pub struct PagesAppState<R>
where
    R: PageRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

impl<R> PagesAppState<R>
where
    R: PageRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

/// Map a body rejection to a 400
pub fn reject_body(rejection: JsonRejection) -> PageError {
    PageError::Validation(rejection.body_text())
}

/// Unparseable ids cannot name an existing page
fn parse_page_id(raw: &str) -> PageResult<LandingPageId> {
    LandingPageId::parse(raw).ok_or(PageError::NotFound)
}

// ============================================================================
// Owner routes
// ============================================================================

/// GET /api/landing-pages
pub async fn list_pages<R>(
    State(state): State<PagesAppState<R>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> PageResult<Json<PageListResponse>>
where
    R: PageRepository + Clone + Send + Sync + 'static,
{
    let pages = ListPagesUseCase::new(state.repo.clone())
        .execute(&user.id)
        .await?;

    Ok(Json(PageListResponse {
        success: true,
        pages,
    }))
}

/// POST /api/landing-pages
pub async fn create_page<R>(
    State(state): State<PagesAppState<R>>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Result<Json<CreatePageRequest>, JsonRejection>,
) -> PageResult<impl IntoResponse>
where
    R: PageRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = body.map_err(reject_body)?;

    let page = CreatePageUseCase::new(state.repo.clone())
        .execute(
            &user.id,
            CreatePageInput {
                title: req.title,
                slug: req.slug,
                template: req.template,
                sections: req.sections,
                settings: req.settings,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PageResponse {
            success: true,
            page,
        }),
    ))
}

/// GET /api/landing-pages/{id}
pub async fn get_page<R>(
    State(state): State<PagesAppState<R>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> PageResult<Json<PageResponse>>
where
    R: PageRepository + Clone + Send + Sync + 'static,
{
    let page_id = parse_page_id(&id)?;

    let page = GetPageUseCase::new(state.repo.clone())
        .execute(&user.id, &page_id)
        .await?;

    Ok(Json(PageResponse {
        success: true,
        page,
    }))
}

/// PUT /api/landing-pages/{id}
pub async fn update_page<R>(
    State(state): State<PagesAppState<R>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    body: Result<Json<UpdatePageRequest>, JsonRejection>,
) -> PageResult<Json<PageResponse>>
where
    R: PageRepository + Clone + Send + Sync + 'static,
{
    let page_id = parse_page_id(&id)?;
    let Json(req) = body.map_err(reject_body)?;

    let page = UpdatePageUseCase::new(state.repo.clone())
        .execute(
            &user.id,
            &page_id,
            UpdatePageInput {
                title: req.title,
                slug: req.slug,
                template: req.template,
                sections: req.sections,
                settings: req.settings,
                status: req.status,
                revision: req.revision,
            },
        )
        .await?;

    Ok(Json(PageResponse {
        success: true,
        page,
    }))
}

/// DELETE /api/landing-pages/{id}
pub async fn delete_page<R>(
    State(state): State<PagesAppState<R>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> PageResult<Json<MessageResponse>>
where
    R: PageRepository + Clone + Send + Sync + 'static,
{
    let page_id = parse_page_id(&id)?;

    DeletePageUseCase::new(state.repo.clone())
        .execute(&user.id, &page_id)
        .await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Landing page deleted".to_string(),
    }))
}

/// GET /api/landing-pages/check-slug
pub async fn check_slug<R>(
    State(state): State<PagesAppState<R>>,
    Extension(user): Extension<AuthenticatedUser>,
    query: Result<Query<CheckSlugQuery>, QueryRejection>,
) -> PageResult<Json<CheckSlugResponse>>
where
    R: PageRepository + Clone + Send + Sync + 'static,
{
    let Query(query) = query.map_err(|e| PageError::Validation(e.body_text()))?;

    let output = CheckSlugUseCase::new(state.repo.clone())
        .execute(
            &user.id,
            CheckSlugInput {
                slug: query.slug,
                exclude_id: query.exclude_id.as_deref().and_then(LandingPageId::parse),
            },
        )
        .await?;

    Ok(Json(CheckSlugResponse {
        success: true,
        slug: output.slug,
        available: output.available,
        reason: output.reason,
    }))
}

// ============================================================================
// Public routes
// ============================================================================

/// GET /api/public/pages/{slug}
pub async fn public_page<R>(
    State(state): State<PagesAppState<R>>,
    Path(slug): Path<String>,
) -> PageResult<Json<PublicPageResponse>>
where
    R: PageRepository + Clone + Send + Sync + 'static,
{
    let page = PublicPageUseCase::new(state.repo.clone())
        .execute(&slug)
        .await?;

    Ok(Json(PublicPageResponse {
        success: true,
        page,
    }))
}

/// POST /api/public/pages/{slug}/conversions
pub async fn record_conversion<R>(
    State(state): State<PagesAppState<R>>,
    Path(slug): Path<String>,
) -> PageResult<Json<ConversionResponse>>
where
    R: PageRepository + Clone + Send + Sync + 'static,
{
    let conversions = RecordConversionUseCase::new(state.repo.clone())
        .execute(&slug)
        .await?;

    Ok(Json(ConversionResponse {
        success: true,
        conversions,
    }))
}
