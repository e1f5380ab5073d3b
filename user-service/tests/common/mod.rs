#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::Authenticator;
use auth::KeyRing;
use auth::TokenLifetimes;
use chrono::Utc;
use serde_json::json;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use user_service::domain::authentication::service::AuthService;
use user_service::domain::user::models::EmailAddress;
use user_service::domain::user::models::NewUser;
use user_service::domain::user::models::PasswordHash;
use user_service::domain::user::models::User;
use user_service::domain::user::models::UserId;
use user_service::domain::user::service::UserService;
use user_service::inbound::grpc::AuthGrpcService;
use user_service::inbound::http::router::create_router;
use user_service::inbound::http::router::AppState;
use user_service::inbound::http::router::HttpSettings;
use user_service::proto::auth_service_server::AuthServiceServer;
use user_service::user::errors::UserError;
use user_service::user::ports::UserRepository;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// User store kept in memory, with the same uniqueness rules as the database.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<BTreeMap<i64, User>>,
    next_id: AtomicI64,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let created = User {
            id: UserId(id),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        users.insert(id, created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(&id.as_i64()).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn update_password(
        &self,
        id: &UserId,
        password_hash: &PasswordHash,
    ) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id.as_i64())
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;
        user.password_hash = password_hash.clone();

        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.users
            .write()
            .await
            .remove(&id.as_i64())
            .map(|_| ())
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }
}

/// Test application that spawns real HTTP and gRPC servers
pub struct TestApp {
    pub address: String,
    pub grpc_address: String,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
    pub shutdown: CancellationToken,
}

impl TestApp {
    /// Spawn the application in background tasks and return TestApp
    pub async fn spawn() -> Self {
        let keys = KeyRing::new("test", JWT_SECRET).expect("Failed to create key ring");
        let authenticator = Arc::new(Authenticator::new(keys, TokenLifetimes::default()));

        let repository = Arc::new(InMemoryUserRepository::default());
        let user_service = Arc::new(UserService::new(
            Arc::clone(&repository),
            Arc::clone(&authenticator),
        ));
        let auth_service = Arc::new(AuthService::new(repository, Arc::clone(&authenticator)));
        let shutdown = CancellationToken::new();

        // Use random ports (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let address = format!("http://{}", listener.local_addr().unwrap());

        let router = create_router(
            AppState {
                user_service,
                auth_service: auth_service.clone(),
                shutdown: shutdown.clone(),
            },
            &HttpSettings {
                request_timeout: Duration::from_secs(10),
                allowed_origins: vec!["http://localhost:3000".to_string()],
            },
        );

        let http_shutdown = shutdown.clone();
        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(http_shutdown.cancelled_owned())
                .await
                .expect("Server error");
        });

        let grpc_listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let grpc_address = format!("http://{}", grpc_listener.local_addr().unwrap());

        let grpc_shutdown = shutdown.clone();
        tokio::spawn(async move {
            tonic::transport::Server::builder()
                .add_service(AuthServiceServer::new(AuthGrpcService::new(auth_service)))
                .serve_with_incoming_shutdown(
                    tokio_stream::wrappers::TcpListenerStream::new(grpc_listener),
                    grpc_shutdown.cancelled_owned(),
                )
                .await
                .expect("gRPC server error");
        });

        Self {
            address,
            grpc_address,
            api_client: reqwest::Client::new(),
            authenticator,
            shutdown,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}/api/v1{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}/api/v1{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}/api/v1{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}/api/v1{}", self.address, path))
            .bearer_auth(token)
    }

    /// Sign up a user and return its id.
    pub async fn create_user(&self, name: &str, email: &str, password: &str) -> i64 {
        let response = self
            .post("/users")
            .json(&json!({
                "name": name,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_i64().expect("Missing user id")
    }

    /// Log in and return the response `data` object.
    pub async fn login(&self, email: &str, password: &str) -> Value {
        let response = self
            .post("/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
