//! Response envelope shared by every endpoint

use serde::Serialize;

/// `{ success, message, data? }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_omitted_on_failure() {
        let json = serde_json::to_value(ApiResponse::<()>::failure("Invalid password")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": false, "message": "Invalid password" }));
    }

    #[test]
    fn test_ok_carries_data() {
        let json = serde_json::to_value(ApiResponse::ok("Done checking!", 42)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 42);
    }
}
