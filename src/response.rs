use serde::Serialize;
use utoipa::ToSchema;

/// Body shared by every endpoint that only reports an outcome, and by every error.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
