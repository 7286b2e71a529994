use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Role;
use axum_extra::extract::cookie::SameSite;
use chrono::Duration;
use chrono::Utc;
use dorm_service::domain::user::models::EmailAddress;
use dorm_service::domain::user::models::User;
use dorm_service::domain::user::models::UserId;
use dorm_service::domain::user::models::Username;
use dorm_service::domain::user::ports::UserRepository;
use dorm_service::domain::user::service::UserService;
use dorm_service::inbound::http::cookie::CookiePolicy;
use dorm_service::inbound::http::router::create_router;
use dorm_service::user::errors::UserError;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-session-signing-32-bytes";
pub const ADMIN_PASSWORD: &str = "admin-pass-word";
pub const TENANT_PASSWORD: &str = "tenant-pass-word";

/// Credential store kept in memory, enforcing the same unique constraints
/// as the users table.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.username == user.username) {
            return Err(UserError::UsernameAlreadyExists(user.username.to_string()));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| &u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn count_by_role(&self, role: Role) -> Result<i64, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.role == role)
            .count() as i64)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        self.users
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    /// Keeps cookies between requests, like a browser
    pub api_client: reqwest::Client,
    /// Sends only the headers a test sets explicitly
    pub raw_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
    pub admin: User,
    pub tenant: User,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_ttl(Duration::hours(24)).await
    }

    pub async fn spawn_with_ttl(ttl: Duration) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(Authenticator::new(TEST_SECRET, ttl));
        let repository = Arc::new(InMemoryUserRepository::default());

        let admin = seed_user(
            &repository,
            &authenticator,
            ("warden", "warden@dorm.local", ADMIN_PASSWORD),
            Role::Admin,
        )
        .await;
        let tenant = seed_user(
            &repository,
            &authenticator,
            ("room_101", "room101@dorm.local", TENANT_PASSWORD),
            Role::Tenant,
        )
        .await;

        let user_service = Arc::new(UserService::new(repository));

        // Secure cookies are never sent back over plain http
        let cookie_policy = CookiePolicy::new(None, false, SameSite::Lax);

        let router = create_router(user_service, Arc::clone(&authenticator), cookie_policy);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create reqwest client"),
            raw_client: reqwest::Client::new(),
            authenticator,
            admin,
            tenant,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make DELETE request
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    /// GET with exactly the given `token` cookie and nothing from the cookie store
    pub fn get_with_token(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.raw_client
            .get(format!("{}{}", self.address, path))
            .header(reqwest::header::COOKIE, format!("token={}", token))
    }

    /// Log in through the API; the session cookie lands in `api_client`.
    pub async fn login(&self, identifier: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&serde_json::json!({
                "identifier": identifier,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login_as_admin(&self) {
        let response = self.login("warden", ADMIN_PASSWORD).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
    }

    pub async fn login_as_tenant(&self) {
        let response = self.login("room_101", TENANT_PASSWORD).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
    }
}

async fn seed_user(
    repository: &InMemoryUserRepository,
    authenticator: &Authenticator,
    (username, email, password): (&str, &str, &str),
    role: Role,
) -> User {
    let user = User {
        id: UserId::new(),
        username: Username::new(username.to_string()).unwrap(),
        email: EmailAddress::new(email.to_string()).unwrap(),
        password_hash: authenticator.hash_password(password).unwrap(),
        role,
        created_at: Utc::now(),
    };
    repository.create(user).await.unwrap()
}

/// Pull the `token` value out of a response's Set-Cookie headers.
pub fn session_cookie_value(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("token="))
        .map(|value| {
            value["token=".len()..]
                .split(';')
                .next()
                .unwrap_or_default()
                .to_string()
        })
}

/// The full Set-Cookie header for the session cookie.
pub fn session_set_cookie(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("token="))
        .map(str::to_string)
}
