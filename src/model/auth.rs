use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub new_password: String,
}

/// 后端出错时的响应体 `{ "message": "..." }`
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
}
