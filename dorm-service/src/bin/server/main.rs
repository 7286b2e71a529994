use std::sync::Arc;

use auth::Authenticator;
use auth::Role;
use dorm_service::config::BootstrapConfig;
use dorm_service::config::Config;
use dorm_service::domain::user::models::CreateUserCommand;
use dorm_service::domain::user::models::EmailAddress;
use dorm_service::domain::user::models::NewPassword;
use dorm_service::domain::user::models::Username;
use dorm_service::domain::user::ports::UserServicePort;
use dorm_service::domain::user::service::UserService;
use dorm_service::inbound::http::cookie::CookiePolicy;
use dorm_service::inbound::http::router::create_router;
use dorm_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dorm_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "dorm-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        session_hours = config.session.expiration_hours,
        cookie_domain = ?config.cookie.domain,
        cookie_secure = config.cookie.secure,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(Authenticator::new(
        config.session.secret.as_bytes(),
        config.session.ttl(),
    ));
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));
    let user_service = Arc::new(UserService::new(user_repository));

    if let Some(bootstrap) = &config.bootstrap {
        bootstrap_admin(user_service.as_ref(), bootstrap).await?;
    }

    let cookie_policy = CookiePolicy::from(&config.cookie);

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, authenticator, cookie_policy);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}

/// Seed the first administrator so a fresh deployment can be signed into.
async fn bootstrap_admin(
    user_service: &dyn UserServicePort,
    bootstrap: &BootstrapConfig,
) -> Result<(), anyhow::Error> {
    let command = CreateUserCommand::new(
        Username::new(bootstrap.admin_username.clone())?,
        EmailAddress::new(bootstrap.admin_email.clone())?,
        NewPassword::new(bootstrap.admin_password.clone())?,
        Role::Admin,
    );

    match user_service.ensure_admin(command).await? {
        Some(admin) => tracing::info!(user_id = %admin.id, "Bootstrap admin created"),
        None => tracing::debug!("Admin account already present, bootstrap skipped"),
    }

    Ok(())
}
