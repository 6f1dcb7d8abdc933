//! Shared helpers for the HTTP integration tests
//!
//! Builds the full router (same layers as production, minus rate limiting)
//! over the in-memory repository and object store.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use quickstay_server::{
    api::create_router,
    config::{AppEnvironment, Config},
    features::{
        listings::{
            repository::{RepositoryError, RepositoryResult},
            types::{Listing, ListingPage},
            InMemoryListingRepository, ListingFilters, ListingRepository,
            SharedListingRepository,
        },
        uploads::UploadPolicy,
        FeatureState,
    },
    middleware::ApiAuth,
    storage::InMemoryObjectStore,
};

pub const TEST_TOKEN: &str = "test-token";
pub const MULTIPART_BOUNDARY: &str = "quickstay-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub listings: Arc<InMemoryListingRepository>,
    pub objects: Arc<InMemoryObjectStore>,
    token: Option<String>,
}

pub struct TestAppBuilder {
    token: Option<String>,
    environment: AppEnvironment,
    objects: InMemoryObjectStore,
    policy: UploadPolicy,
    failing_listings: bool,
}

impl TestAppBuilder {
    pub fn token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn objects(mut self, objects: InMemoryObjectStore) -> Self {
        self.objects = objects;
        self
    }

    pub fn upload_policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Swap the listing repository for one whose every call fails
    pub fn failing_listings(mut self) -> Self {
        self.failing_listings = true;
        self
    }

    pub fn build(self) -> TestApp {
        let listings = Arc::new(InMemoryListingRepository::new());
        let objects = Arc::new(self.objects);

        let mut config = Config::default();
        config.server.environment = self.environment;
        config.auth.api_token = self.token.clone();

        let repository: SharedListingRepository = if self.failing_listings {
            Arc::new(FailingListingRepository)
        } else {
            listings.clone()
        };

        let state = FeatureState {
            listings: repository,
            objects: objects.clone(),
            uploads: self.policy,
            auth: ApiAuth::from(&config.auth),
        };

        TestApp {
            router: create_router(state, &config),
            listings,
            objects,
            token: self.token,
        }
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> TestAppBuilder {
        TestAppBuilder {
            token: None,
            environment: AppEnvironment::Test,
            objects: InMemoryObjectStore::new("https://media.test"),
            policy: UploadPolicy::new(1024, 3),
            failing_listings: false,
        }
    }

    /// Same router and stores, different credentials
    pub fn client(&self, token: Option<&str>) -> TestApp {
        TestApp {
            router: self.router.clone(),
            listings: self.listings.clone(),
            objects: self.objects.clone(),
            token: token.map(str::to_string),
        }
    }

    /// Send a request and decode the JSON body
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn request(&self, method: Method, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.token {
            Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(self.request(Method::GET, uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.send_json(Method::POST, uri, body.to_string()).await
    }

    pub async fn put_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.send_json(Method::PUT, uri, body.to_string()).await
    }

    pub async fn send_json(&self, method: Method, uri: &str, raw: String) -> (StatusCode, Value) {
        self.send(
            self.request(method, uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(raw))
                .unwrap(),
        )
        .await
    }

    pub async fn post_multipart(&self, uri: &str, parts: &[Part]) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
                )
                .body(Body::from(multipart_body(parts)))
                .unwrap(),
        )
        .await
    }

    /// Create a listing through the API and return its JSON
    pub async fn create_listing(&self, body: &Value) -> Value {
        let (status, json) = self.post_json("/api/v1/listings", body).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", json);
        json["data"].clone()
    }
}

/// One multipart section
pub struct Part {
    pub field: &'static str,
    pub file_name: Option<&'static str>,
    pub content_type: Option<&'static str>,
    pub bytes: Vec<u8>,
}

impl Part {
    pub fn image(file_name: &'static str, content_type: &'static str) -> Self {
        Self {
            field: "images",
            file_name: Some(file_name),
            content_type: Some(content_type),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    pub fn text(field: &'static str, value: &str) -> Self {
        Self {
            field,
            file_name: None,
            content_type: None,
            bytes: value.as_bytes().to_vec(),
        }
    }
}

pub fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.field);
        if let Some(file_name) = part.file_name {
            disposition.push_str(&format!("; filename=\"{}\"", file_name));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(&part.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());
    body
}

/// A valid create payload
pub fn listing_payload(property_name: &str) -> Value {
    json!({
        "name": "Ravi Kumar",
        "propertyName": property_name,
        "type": "PG",
        "propertyType": "Boys",
        "address": "12 MG Road, Bengaluru",
        "price": 7500,
        "rating": 4.2,
        "amenities": ["WiFi", "Laundry"],
        "email": "owner@example.com"
    })
}

/// Repository whose every operation fails with a pool timeout
pub struct FailingListingRepository;

fn unavailable<T>() -> RepositoryResult<T> {
    Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl ListingRepository for FailingListingRepository {
    async fn insert(&self, _listing: &Listing) -> RepositoryResult<Listing> {
        unavailable()
    }

    async fn find_by_id(&self, _id: Uuid) -> RepositoryResult<Option<Listing>> {
        unavailable()
    }

    async fn find_by_slug(&self, _slug: &str) -> RepositoryResult<Option<Listing>> {
        unavailable()
    }

    async fn update(&self, _listing: &Listing) -> RepositoryResult<Option<Listing>> {
        unavailable()
    }

    async fn search(&self, _filters: &ListingFilters) -> RepositoryResult<ListingPage> {
        unavailable()
    }

    async fn ping(&self) -> RepositoryResult<()> {
        unavailable()
    }
}
