use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Employee not found")]
    pub message: String,
    #[schema(value_type = Option<Object>, example = json!({ "employee_id": "EMP404" }))]
    pub details: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Employee deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct EnterKeyReq {
    #[schema(example = "change-me-superadmin-key", min_length = 8, max_length = 255)]
    pub key: String,
}
