use std::fmt;

use serde::{Deserialize, Serialize};

/// Structured error information extracted from Redis driver errors.
///
/// This is intended to be serialized to JSON and shown to the editor user
/// or written to the log.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub(crate) error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) message: Option<String>,
}

/// Format Redis errors as pretty JSON wrapped in an `error` field.
///
/// Used by the parent module's `Display` implementation for
/// `RedisLspError::Redis`.
pub fn format_redis_error(f: &mut fmt::Formatter<'_>, error: &redis::RedisError) -> fmt::Result {
    let info = extract_error_info(error);
    let wrapper = serde_json::json!({ "error": info });
    let json_output = serde_json::to_string_pretty(&wrapper).map_err(|_| fmt::Error)?;
    write!(f, "\n{json_output}")
}

/// Extract structured information from a Redis error using the driver API.
pub fn extract_error_info(error: &redis::RedisError) -> ErrorInfo {
    let error_type = if error.is_timeout() {
        "redis.timeout".to_string()
    } else if error.is_connection_refusal() || error.is_connection_dropped() {
        "redis.connection".to_string()
    } else {
        format!("redis.{}", error.category().to_lowercase().replace(' ', "_"))
    };

    ErrorInfo {
        error_type: Some(error_type),
        code: error.code().map(str::to_string),
        message: Some(
            error
                .detail()
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_server_error() {
        let err = redis::RedisError::from((
            redis::ErrorKind::ResponseError,
            "An error was signalled by the server",
            "ERR wrong number of arguments for 'get' command".to_string(),
        ));
        let info = extract_error_info(&err);
        assert!(info.message.unwrap().contains("wrong number of arguments"));
        assert!(info.error_type.unwrap().starts_with("redis."));
    }

    #[test]
    fn test_error_info_json_skips_empty_fields() {
        let info = ErrorInfo {
            error_type: Some("redis.timeout".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(json, r#"{"type":"redis.timeout"}"#);
    }
}
