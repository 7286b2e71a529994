use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::middleware::AdminUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user_id = UserId::from_string(&id).map_err(UserError::from)?;

    if admin.user_id == user_id {
        return Err(ApiError::BadRequest(
            "Cannot delete the account you are signed in with".to_string(),
        ));
    }

    state.user_service.delete_user(&user_id).await?;

    tracing::info!(user_id = %user_id, deleted_by = %admin.user_id, "Account deleted");

    Ok(StatusCode::NO_CONTENT)
}
