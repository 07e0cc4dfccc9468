/// Common test utilities for integration tests
///
/// Builds the real router over an in-memory store with two registered users,
/// and provides request helpers that drive it through `tower::Service`.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use reminders_api::app::{build_router, AppState};
use reminders_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, LogFormat, StorageBackend};
use reminders_shared::auth::jwt::{create_token, Claims, TokenType};
use reminders_shared::models::user::{CreateUser, User};
use reminders_shared::store::{memory::MemoryStore, UserStore};
use serde_json::Value;
use std::sync::Arc;
use tower::Service as _;

pub const JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// A registered user and a valid access token for them
pub struct TestUser {
    pub user: User,
    pub token: String,
}

impl TestUser {
    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: Router,
    pub alice: TestUser,
    pub bob: TestUser,
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        storage: StorageBackend::Memory,
        database: DatabaseConfig {
            url: None,
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
        },
        log_format: LogFormat::Pretty,
    }
}

async fn test_user(store: &MemoryStore, email: &str) -> TestUser {
    let user = store
        .insert_user(CreateUser {
            email: email.to_string(),
            password_hash: "test_hash".to_string(), // Not used in tests
        })
        .await
        .unwrap();

    let token = create_token(&Claims::new(user.id, TokenType::Access), JWT_SECRET).unwrap();

    TestUser { user, token }
}

impl TestContext {
    /// Creates a new test context with an empty store and two users
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let alice = test_user(&store, "alice@example.com").await;
        let bob = test_user(&store, "bob@example.com").await;

        let app = build_router(AppState::new(store.clone(), test_config()));

        TestContext {
            store,
            app,
            alice,
            bob,
        }
    }

    /// Sends a request and returns the status and parsed JSON body
    ///
    /// An empty body is returned as `Value::Null`.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        auth: Option<&TestUser>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = auth {
            builder = builder.header(header::AUTHORIZATION, user.auth_header());
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    /// Sends a prebuilt request
    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }
}
