// Typed REST clients for the receptionist backend.
// One generic ResourceClient covers list/get/create/update/delete per
// resource kind; the transport sits behind a trait so tests can swap in a
// scripted mock without touching the network.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{Booking, Coupon, Customer, Entity, EntityId, Room, RoomType};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// Error taxonomy surfaced to callers. The client never panics on a bad
// response; everything comes back as one of these.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("not authenticated: no valid session token")]
    Unauthenticated,

    #[error("server unreachable: {0}")]
    Unreachable(String),

    #[error("request rejected: {status} - {message}")]
    Rejected { status: u16, message: String },

    #[error("invalid request: {0}")]
    Invalid(String),

    #[error("malformed response body: {0}")]
    Decode(String),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("initialization error: {0}")]
    Init(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    // None only for unauthenticated endpoints (login).
    pub token: Option<String>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            token: None,
            body: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_body<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let value =
            serde_json::to_value(body).map_err(|e| ApiError::Invalid(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

// Production transport over reqwest. Timeout policy lives here, not in the
// resource clients.
pub struct HttpTransport {
    base_url: String,
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Config("base URL must not be empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Init(e.to_string()))?;

        Ok(Self { base_url, http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = format!("{}/{}", self.base_url, request.path);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.http.request(method, &url);
        if let Some(token) = &request.token {
            builder = builder.bearer_auth(token);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Unreachable(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Unreachable(e.to_string()))?;

        Ok(ApiResponse { status, body })
    }
}

// Per-resource endpoint layout. Defaults match the rooms/roomtypes routes;
// bookings and customers override where the backend deviates.
pub trait Resource: Entity + Serialize + DeserializeOwned {
    const KIND: &'static str;
    const BASE: &'static str;

    fn list_path() -> String {
        Self::BASE.to_string()
    }

    fn create_path() -> String {
        format!("{}create/", Self::BASE)
    }

    fn detail_path(id: EntityId) -> String {
        format!("{}{}/", Self::BASE, id)
    }

    fn update_path(id: EntityId) -> String {
        format!("{}{}/update/", Self::BASE, id)
    }

    fn delete_path(id: EntityId) -> String {
        format!("{}{}/delete/", Self::BASE, id)
    }
}

impl Resource for Room {
    const KIND: &'static str = "rooms";
    const BASE: &'static str = "receptionist/api/rooms/";
}

impl Resource for RoomType {
    const KIND: &'static str = "roomtypes";
    const BASE: &'static str = "receptionist/api/roomtypes/";
}

impl Resource for Customer {
    const KIND: &'static str = "customers";
    const BASE: &'static str = "receptionist/api/customers/";

    fn list_path() -> String {
        format!("{}list/", Self::BASE)
    }
}

impl Resource for Booking {
    const KIND: &'static str = "bookings";
    const BASE: &'static str = "receptionist/api/bookings/";

    fn list_path() -> String {
        format!("{}list/", Self::BASE)
    }

    fn create_path() -> String {
        format!("{}add/", Self::BASE)
    }

    fn delete_path(id: EntityId) -> String {
        format!("{}delete/{}/", Self::BASE, id)
    }
}

impl Resource for Coupon {
    const KIND: &'static str = "coupons";
    const BASE: &'static str = "receptionist/api/bookings/";

    fn list_path() -> String {
        format!("{}list_coupons/", Self::BASE)
    }
}

// Stateless client for one resource kind. The token is passed per call; an
// absent token fails fast without touching the transport. No retries at
// this layer - staleness tolerance differs per screen, so retry policy
// belongs to the caller.
pub struct ResourceClient<R: Resource> {
    transport: Arc<dyn Transport>,
    _marker: PhantomData<fn() -> R>,
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            _marker: PhantomData,
        }
    }

    pub async fn list(&self, token: Option<&str>) -> Result<Vec<R>, ApiError> {
        let token = require_token(token)?;
        let request = ApiRequest::new(Method::Get, R::list_path()).with_token(token);
        let response = self.dispatch(request).await?;
        decode(&response)
    }

    pub async fn get(&self, id: EntityId, token: Option<&str>) -> Result<R, ApiError> {
        let token = require_token(token)?;
        let request = ApiRequest::new(Method::Get, R::detail_path(id)).with_token(token);
        let response = self.dispatch(request).await?;
        decode(&response)
    }

    pub async fn create<P: Serialize + Sync>(
        &self,
        payload: &P,
        token: Option<&str>,
    ) -> Result<R, ApiError> {
        let token = require_token(token)?;
        let request = ApiRequest::new(Method::Post, R::create_path())
            .with_token(token)
            .with_body(payload)?;
        let response = self.dispatch(request).await?;
        decode(&response)
    }

    pub async fn update<P: Serialize + Sync>(
        &self,
        id: EntityId,
        patch: &P,
        token: Option<&str>,
    ) -> Result<R, ApiError> {
        let token = require_token(token)?;
        let request = ApiRequest::new(Method::Put, R::update_path(id))
            .with_token(token)
            .with_body(patch)?;
        let response = self.dispatch(request).await?;
        decode(&response)
    }

    pub async fn delete(&self, id: EntityId, token: Option<&str>) -> Result<(), ApiError> {
        let token = require_token(token)?;
        let request = ApiRequest::new(Method::Delete, R::delete_path(id)).with_token(token);
        self.dispatch(request).await?;
        Ok(())
    }

    async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        debug!(kind = R::KIND, path = %request.path, method = ?request.method, "dispatching request");
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            let message = rejection_message(&response.body);
            warn!(kind = R::KIND, status = response.status, %message, "request rejected");
            return Err(ApiError::Rejected {
                status: response.status,
                message,
            });
        }
        Ok(response)
    }
}

// Booking sub-resources beyond the generic CRUD surface.
impl ResourceClient<Booking> {
    pub async fn available_rooms(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
        token: Option<&str>,
    ) -> Result<Vec<Room>, ApiError> {
        let token = require_token(token)?;
        let request = ApiRequest::new(
            Method::Get,
            format!("{}available_rooms/", <Booking as Resource>::BASE),
        )
        .with_token(token)
        .with_query("check_in_date", check_in.to_string())
        .with_query("check_out_date", check_out.to_string());
        let response = self.dispatch(request).await?;
        decode(&response)
    }
}

// Customer sub-resources beyond the generic CRUD surface.
impl ResourceClient<Customer> {
    // Customers registered today, for the overview stat card.
    pub async fn today(&self, token: Option<&str>) -> Result<Vec<Customer>, ApiError> {
        let token = require_token(token)?;
        let request = ApiRequest::new(
            Method::Get,
            format!("{}today/", <Customer as Resource>::BASE),
        )
        .with_token(token);
        let response = self.dispatch(request).await?;
        decode(&response)
    }
}

fn require_token(token: Option<&str>) -> Result<&str, ApiError> {
    token.ok_or(ApiError::Unauthenticated)
}

fn decode<T: DeserializeOwned>(response: &ApiResponse) -> Result<T, ApiError> {
    serde_json::from_slice(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}

// Pulls a human-readable message out of a rejection body. The backend uses
// "error" and "detail" interchangeably.
pub(crate) fn rejection_message(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for key in ["error", "detail", "message"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }
    let text = String::from_utf8_lossy(body);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        "no error detail provided".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}

// Scripted transport for tests: responses are routed by path substring and
// every request is recorded for call-count and body assertions.
#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    pub struct MockTransport {
        requests: Mutex<Vec<ApiRequest>>,
        routes: Mutex<Vec<(String, u16, serde_json::Value)>>,
        // Consumed before routes are consulted; lets a test fail one call.
        error_queue: Mutex<VecDeque<ApiError>>,
    }

    impl MockTransport {
        pub fn new() -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                routes: Mutex::new(Vec::new()),
                error_queue: Mutex::new(VecDeque::new()),
            })
        }

        pub fn respond_with(&self, path_fragment: &str, status: u16, body: serde_json::Value) {
            self.routes
                .lock()
                .push((path_fragment.to_string(), status, body));
        }

        pub fn fail_next(&self, error: ApiError) {
            self.error_queue.lock().push_back(error);
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().len()
        }

        pub fn last_request(&self) -> Option<ApiRequest> {
            self.requests.lock().last().cloned()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
            self.requests.lock().push(request.clone());

            if let Some(error) = self.error_queue.lock().pop_front() {
                return Err(error);
            }

            // Later registrations take precedence, so a test can script a
            // generic list route and then a more specific mutation route.
            let routes = self.routes.lock();
            for (fragment, status, body) in routes.iter().rev() {
                if request.path.contains(fragment.as_str()) {
                    return Ok(ApiResponse {
                        status: *status,
                        body: Bytes::from(serde_json::to_vec(body).unwrap()),
                    });
                }
            }

            // Unscripted paths default to an empty list response.
            Ok(ApiResponse {
                status: 200,
                body: Bytes::from_static(b"[]"),
            })
        }
    }
}
