use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    auth::{error::AuthError, extractors::AuthUser, repo_types::User},
    state::AppState,
};

use super::dto::{UserData, UserDataResponse};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/user/data", get(get_user_data))
}

#[instrument(skip(state))]
pub async fn get_user_data(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserDataResponse>, AuthError> {
    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(AuthError::Internal)?
        .ok_or(AuthError::UserNotFound)?;

    Ok(Json(UserDataResponse {
        success: true,
        user_data: UserData {
            name: user.name,
            email: user.email,
            is_account_verified: user.is_account_verified,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_data_response_uses_camel_case_keys() {
        let response = UserDataResponse {
            success: true,
            user_data: UserData {
                name: "Alice".into(),
                email: "alice@x.com".into(),
                is_account_verified: false,
            },
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""userData""#));
        assert!(json.contains(r#""isAccountVerified":false"#));
        assert!(json.contains("alice@x.com"));
        assert!(!json.contains("password"));
    }
}
