use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::api::response::ApiResponse;
use crate::error::AppError;
use crate::features::shared::validation::FieldViolation;
use crate::middleware::auth::{require_token, ApiAuth};

use super::{
    commands::{CreateListingError, UpdateListingError},
    filter::ListingQueryParams,
    queries::{GetListingBySlugError, GetListingError, ListListingsError},
    repository::{RepositoryError, SharedListingRepository},
};

/// Listing routes. Everything except the slug lookup sits behind the token check.
pub fn listings_routes(auth: ApiAuth) -> Router<SharedListingRepository> {
    let protected = Router::new()
        .route("/", get(list_listings).post(create_listing))
        .route("/:id", get(get_listing).put(update_listing))
        .route_layer(middleware::from_fn_with_state(auth, require_token));

    Router::new()
        .route("/slug/:slug", get(get_listing_by_slug))
        .merge(protected)
}

#[tracing::instrument(skip(repo, payload))]
async fn create_listing(
    State(repo): State<SharedListingRepository>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ListingApiError> {
    let Json(payload) = payload?;

    let listing = super::commands::create::handle(repo.as_ref(), &payload).await?;

    tracing::info!(listing_id = %listing.id, slug = %listing.slug, "Listing created via API");

    Ok(ApiResponse::success("Listing created successfully", listing).created())
}

#[tracing::instrument(skip(repo, payload))]
async fn update_listing(
    State(repo): State<SharedListingRepository>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ListingApiError> {
    let Json(payload) = payload?;

    let listing = super::commands::update::handle(repo.as_ref(), &id, &payload).await?;

    tracing::info!(listing_id = %listing.id, "Listing updated via API");

    Ok(ApiResponse::success("Listing updated successfully", listing).into_response())
}

#[tracing::instrument(skip(repo, query))]
async fn list_listings(
    State(repo): State<SharedListingRepository>,
    query: Result<Query<ListingQueryParams>, QueryRejection>,
) -> Result<Response, ListingApiError> {
    let Query(params) = query?;

    let page = super::queries::list::handle(repo.as_ref(), params).await?;

    Ok(ApiResponse::success("Listings retrieved successfully", page).into_response())
}

#[tracing::instrument(skip(repo))]
async fn get_listing(
    State(repo): State<SharedListingRepository>,
    Path(id): Path<String>,
) -> Result<Response, ListingApiError> {
    let listing = super::queries::get::handle(repo.as_ref(), &id).await?;

    Ok(ApiResponse::success("Listing retrieved successfully", listing).into_response())
}

#[tracing::instrument(skip(repo))]
async fn get_listing_by_slug(
    State(repo): State<SharedListingRepository>,
    Path(slug): Path<String>,
) -> Result<Response, ListingApiError> {
    let listing = super::queries::get_by_slug::handle(repo.as_ref(), &slug).await?;

    Ok(ApiResponse::success("Listing retrieved successfully", listing).into_response())
}

#[derive(Debug)]
enum ListingApiError {
    BadRequest(Vec<FieldViolation>),
    NotFound,
    Repository(RepositoryError),
}

impl From<JsonRejection> for ListingApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(vec![FieldViolation::new("body", rejection.body_text())])
    }
}

impl From<QueryRejection> for ListingApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(vec![FieldViolation::new("query", rejection.body_text())])
    }
}

impl From<CreateListingError> for ListingApiError {
    fn from(err: CreateListingError) -> Self {
        match err {
            CreateListingError::Validation(v) => Self::BadRequest(v),
            CreateListingError::Repository(e) => Self::Repository(e),
        }
    }
}

impl From<UpdateListingError> for ListingApiError {
    fn from(err: UpdateListingError) -> Self {
        match err {
            UpdateListingError::Validation(v) => Self::BadRequest(v),
            UpdateListingError::NotFound(_) => Self::NotFound,
            UpdateListingError::Repository(e) => Self::Repository(e),
        }
    }
}

impl From<GetListingError> for ListingApiError {
    fn from(err: GetListingError) -> Self {
        match err {
            GetListingError::Validation(v) => Self::BadRequest(v),
            GetListingError::NotFound(_) => Self::NotFound,
            GetListingError::Repository(e) => Self::Repository(e),
        }
    }
}

impl From<GetListingBySlugError> for ListingApiError {
    fn from(err: GetListingBySlugError) -> Self {
        match err {
            GetListingBySlugError::NotFound(_) => Self::NotFound,
            GetListingBySlugError::Repository(e) => Self::Repository(e),
        }
    }
}

impl From<ListListingsError> for ListingApiError {
    fn from(err: ListListingsError) -> Self {
        match err {
            ListListingsError::Validation(v) => Self::BadRequest(v),
            ListListingsError::Repository(e) => Self::Repository(e),
        }
    }
}

impl From<ListingApiError> for AppError {
    fn from(err: ListingApiError) -> Self {
        match err {
            ListingApiError::BadRequest(violations) => AppError::Validation(violations),
            ListingApiError::NotFound => AppError::NotFound("Listing not found".to_string()),
            ListingApiError::Repository(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ListingApiError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
