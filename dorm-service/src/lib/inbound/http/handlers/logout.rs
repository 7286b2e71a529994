use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;

use crate::inbound::http::router::AppState;

/// Drop the client's session cookie.
///
/// Sessions are stateless, so a copied token stays valid until its own expiry.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    (
        jar.add(state.cookie_policy.removal_cookie()),
        StatusCode::NO_CONTENT,
    )
}
