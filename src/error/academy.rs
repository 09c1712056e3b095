use reqwest::StatusCode;

/// 客户端统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AcademyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// 后端返回了非 2xx 状态码，`message` 为响应体中的 `message` 字段（如果有）
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Cookie store error: {0}")]
    Cookie(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AcademyError {
    /// 面向用户的提示：优先使用后端给出的 message，否则使用调用方的通用提示
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AcademyError::Api {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            AcademyError::Validation(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AcademyError::Api { status, .. } => Some(*status),
            AcademyError::Http(err) => err.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }
}

pub type Result<T> = std::result::Result<T, AcademyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_backend_message() {
        let err = AcademyError::Api {
            status: StatusCode::BAD_REQUEST,
            message: Some("Email not found".to_string()),
        };
        assert_eq!(err.user_message("Something went wrong."), "Email not found");
    }

    #[test]
    fn user_message_falls_back_without_backend_message() {
        let err = AcademyError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        };
        assert_eq!(err.user_message("Signup failed."), "Signup failed.");

        let err = AcademyError::Api {
            status: StatusCode::BAD_REQUEST,
            message: Some(String::new()),
        };
        assert_eq!(err.user_message("Signup failed."), "Signup failed.");

        let err = AcademyError::Config("bad".into());
        assert_eq!(err.user_message("Signup failed."), "Signup failed.");
    }

    #[test]
    fn unauthorized_is_detected_from_status() {
        let err = AcademyError::Api {
            status: StatusCode::UNAUTHORIZED,
            message: None,
        };
        assert!(err.is_unauthorized());
        assert!(!AcademyError::Validation("x".into()).is_unauthorized());
    }
}
