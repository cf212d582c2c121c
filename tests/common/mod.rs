#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};
use uuid::Uuid;

use mini_tracker::auth::TokenIssuer;
use mini_tracker::cache::TaskCache;
use mini_tracker::models::{NewUser, Task, TaskChanges, TaskDraft, User};
use mini_tracker::store::{MemoryTaskStore, MemoryUserStore, StoreError, TaskStore, UserStore};
use mini_tracker::{routes, AppState, Config};

pub const TEST_SECRET: &str = "integration-test-secret";

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("memory://".to_string()),
        "BCRYPT_COST" => Some("4".to_string()),
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        _ => None,
    })
    .expect("test configuration is valid")
}

pub fn test_tokens() -> TokenIssuer {
    let config = test_config();
    TokenIssuer::new(&config.jwt_secret, config.jwt_expires_in)
}

/// State over the given stores with an in-memory cache.
pub fn state_with(users: Arc<dyn UserStore>, tasks: Arc<dyn TaskStore>) -> AppState {
    let config = test_config();
    AppState::new(
        users,
        tasks,
        TaskCache::memory(config.cache_ttl),
        test_tokens(),
        config.bcrypt_cost,
    )
}

pub fn memory_state() -> AppState {
    AppState::in_memory(&test_config())
}

/// The same app `main` serves, minus the network listener.
pub async fn init_app(
    state: AppState,
) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
            .default_service(web::to(routes::not_found)),
    )
    .await
}

/// Sends a request and returns the status and the parsed JSON body
/// (`Value::Null` for an empty body).
pub async fn send<S, B>(
    app: &S,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let mut req = match method {
        "GET" => test::TestRequest::get(),
        "POST" => test::TestRequest::post(),
        "PUT" => test::TestRequest::put(),
        "DELETE" => test::TestRequest::delete(),
        other => panic!("unsupported method {}", other),
    }
    .uri(uri);

    if let Some(token) = token {
        req = req.insert_header((header::AUTHORIZATION, format!("Bearer {}", token)));
    }
    if let Some(body) = body {
        req = req.set_json(body);
    }

    // Errors returned by middleware are turned into responses the same way
    // the real server does, instead of panicking in `test::call_service`.
    let (status, bytes) = match test::try_call_service(app, req.to_request()).await {
        Ok(resp) => {
            let status = resp.status();
            (status, test::read_body(resp).await)
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let bytes = actix_web::body::to_bytes(resp.into_body())
                .await
                .unwrap_or_default();
            (status, bytes)
        }
    };
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!(
                "response to {} {} is not JSON: {:?}",
                method,
                uri,
                String::from_utf8_lossy(&bytes)
            )
        })
    };
    (status, json)
}

/// Signs a user up and returns `(token, user id)`.
pub async fn signup_user<S, B>(app: &S, name: &str, email: &str, password: &str) -> (String, String)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "name": name, "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);

    (
        body["token"].as_str().expect("token").to_string(),
        body["user"]["id"].as_str().expect("user id").to_string(),
    )
}

/// A task store that counts calls before delegating to `MemoryTaskStore`.
#[derive(Default)]
pub struct CountingTaskStore {
    inner: MemoryTaskStore,
    lists: AtomicUsize,
    writes: AtomicUsize,
}

impl CountingTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.lists() + self.writes()
    }
}

#[async_trait]
impl TaskStore for CountingTaskStore {
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Task>, StoreError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.inner.list_by_owner(owner).await
    }

    async fn insert(&self, owner: Uuid, draft: TaskDraft) -> Result<Task, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(owner, draft).await
    }

    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: TaskChanges,
    ) -> Result<Option<Task>, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.update_owned(owner, id, changes).await
    }

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_owned(owner, id).await
    }
}

/// A user store that has never seen an address but rejects every insert as
/// a duplicate, as when a concurrent signup for the same email wins.
#[derive(Default)]
pub struct LosingRaceUserStore {
    inserts: AtomicUsize,
}

impl LosingRaceUserStore {
    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for LosingRaceUserStore {
    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
        Ok(None)
    }

    async fn insert(&self, _user: NewUser) -> Result<User, StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Duplicate)
    }
}

pub fn memory_users() -> Arc<MemoryUserStore> {
    Arc::new(MemoryUserStore::new())
}
