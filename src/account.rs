// Login/logout and account endpoints. Login is the only place that writes
// the session token; logout is the only place that tears it down.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::client::{ApiError, ApiRequest, ApiResponse, Method, Transport};
use crate::session::SessionStore;

const LOGIN_PATH: &str = "user/api/userauths/login/";
const LOGOUT_PATH: &str = "user/api/userauths/logout/";
const PROFILE_PATH: &str = "receptionist/api/profile/";
const PROFILE_UPDATE_PATH: &str = "receptionist/api/profile/update/";
const CHANGE_PASSWORD_PATH: &str = "receptionist/api/user/change_password/";
const USER_INFO_PATH: &str = "receptionist/api/user/info/";

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    pub id: u64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

pub struct AccountClient {
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
}

impl AccountClient {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<SessionStore>) -> Self {
        Self { transport, session }
    }

    // Exchanges credentials for a token pair and stores the access token
    // with the default 7-day window.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let request = ApiRequest::new(Method::Post, LOGIN_PATH)
            .with_body(&json!({ "email": email, "password": password }))?;
        let response = self.dispatch(request).await?;
        let login: LoginResponse = decode(&response)?;
        self.session.set_token(login.access.clone());
        debug!("login succeeded, session token stored");
        Ok(login)
    }

    // The local session is cleared even when the server call fails; a dead
    // token must not outlive the logout intent.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let token = self.session.token();
        self.session.clear();

        let token = match token {
            Some(token) => token,
            None => return Ok(()),
        };
        let request = ApiRequest::new(Method::Post, LOGOUT_PATH)
            .with_token(token)
            .with_body(&json!({}))?;
        match self.dispatch(request).await {
            Ok(_) => Ok(()),
            Err(error) => {
                warn!(%error, "server-side logout failed, local session already cleared");
                Err(error)
            }
        }
    }

    pub async fn profile(&self) -> Result<Profile, ApiError> {
        let token = self.require_token()?;
        let request = ApiRequest::new(Method::Get, PROFILE_PATH).with_token(token);
        let response = self.dispatch(request).await?;
        decode(&response)
    }

    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<Profile, ApiError> {
        let token = self.require_token()?;
        let request = ApiRequest::new(Method::Put, PROFILE_UPDATE_PATH)
            .with_token(token)
            .with_body(patch)?;
        let response = self.dispatch(request).await?;
        decode(&response)
    }

    pub async fn change_password(
        &self,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> Result<(), ApiError> {
        if new != confirm {
            return Err(ApiError::Invalid(
                "new password and confirmation do not match".to_string(),
            ));
        }
        let token = self.require_token()?;
        let request = ApiRequest::new(Method::Post, CHANGE_PASSWORD_PATH)
            .with_token(token)
            .with_body(&json!({
                "current_password": current,
                "new_password": new,
                "confirm_password": confirm,
            }))?;
        self.dispatch(request).await?;
        Ok(())
    }

    pub async fn user_info(&self) -> Result<UserInfo, ApiError> {
        let token = self.require_token()?;
        let request = ApiRequest::new(Method::Get, USER_INFO_PATH).with_token(token);
        let response = self.dispatch(request).await?;
        decode(&response)
    }

    fn require_token(&self) -> Result<String, ApiError> {
        self.session.token().ok_or(ApiError::Unauthenticated)
    }

    async fn dispatch(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        debug!(path = %request.path, method = ?request.method, "dispatching account request");
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(ApiError::Rejected {
                status: response.status,
                message: crate::client::rejection_message(&response.body),
            });
        }
        Ok(response)
    }
}

fn decode<T: serde::de::DeserializeOwned>(response: &ApiResponse) -> Result<T, ApiError> {
    serde_json::from_slice(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}
