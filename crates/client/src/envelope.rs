use serde::Deserialize;

/// Response envelope as sent by the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default = "none")]
    pub data: Option<T>,
    #[serde(default)]
    pub status_code: u16,
    #[serde(default)]
    pub errors: Vec<String>,
}

fn none<T>() -> Option<T> {
    None
}

impl<T> ApiEnvelope<T> {
    /// Client-side failure reported in the same shape as a server error.
    pub fn error(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            status_code,
            errors: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerates_missing_fields() {
        let env: ApiEnvelope<String> = serde_json::from_str(r#"{"success": true, "data": "tok"}"#).unwrap();
        assert!(env.success);
        assert_eq!(env.data.as_deref(), Some("tok"));
        assert!(env.errors.is_empty());
        assert_eq!(env.status_code, 0);
    }

    #[test]
    fn null_data_is_none() {
        let env: ApiEnvelope<Vec<u32>> = serde_json::from_str(
            r#"{"success": false, "message": "Not found", "data": null, "statusCode": 404, "errors": []}"#,
        )
        .unwrap();
        assert_eq!(env.data, None);
        assert_eq!(env.status_code, 404);
    }
}
