use serde::{Deserialize, Serialize};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for account verification.
#[derive(Debug, Deserialize)]
pub struct VerifyAccountRequest {
    pub otp: Option<String>,
}

/// Request body for requesting a password-reset OTP.
#[derive(Debug, Deserialize)]
pub struct SendResetOtpRequest {
    pub email: Option<String>,
}

/// Request body for resetting the password with an OTP.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: Option<String>,
    pub otp: Option<String>,
    pub new_password: Option<String>,
}

/// Uniform response envelope used by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_success_and_message() {
        let json = serde_json::to_string(&ApiResponse::ok("Login Successful")).unwrap();
        assert_eq!(json, r#"{"success":true,"message":"Login Successful"}"#);

        let json = serde_json::to_string(&ApiResponse::err("Invalid OTP")).unwrap();
        assert_eq!(json, r#"{"success":false,"message":"Invalid OTP"}"#);
    }

    #[test]
    fn reset_request_uses_camel_case_password_field() {
        let body = r#"{"email":"a@x.com","otp":"123456","newPassword":"hunter22"}"#;
        let req: ResetPasswordRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.new_password.as_deref(), Some("hunter22"));
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let req: RegisterRequest = serde_json::from_str("{}").unwrap();
        assert!(req.name.is_none());
        assert!(req.email.is_none());
        assert!(req.password.is_none());
    }
}
