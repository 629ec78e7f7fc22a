use serde::Serialize;

/// Envelope wrapping every JSON body the service returns.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::success_with("Success", data)
    }

    pub fn success_with(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            code: 200,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn error(code: u16, message: impl Into<String>) -> Self {
        ApiResponse {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn error_with(code: u16, message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            code,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        ApiResponse {
            code: 200,
            message: message.into(),
            data: None,
        }
    }
}
