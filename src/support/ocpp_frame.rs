//! OCPP-J message framing (spec.md §4.2, C2).
//!
//! The on-the-wire framing is identical across OCPP 1.6 and 2.0.1:
//!
//! - **Call**       `[2, "<messageId>", "<action>", {<payload>}]`
//! - **CallResult** `[3, "<messageId>", {<payload>}]`
//! - **CallError**  `[4, "<messageId>", "<errorCode>", "<errorDescription>", {<errorDetails>}]`

use serde_json::Value;
use std::fmt;

const MSG_TYPE_CALL: u64 = 2;
const MSG_TYPE_CALL_RESULT: u64 = 3;
const MSG_TYPE_CALL_ERROR: u64 = 4;

/// A parsed OCPP-J frame (version-agnostic transport envelope).
#[derive(Debug, Clone)]
pub enum OcppFrame {
    Call {
        message_id: String,
        action: String,
        payload: Value,
    },
    CallResult {
        message_id: String,
        payload: Value,
    },
    CallError {
        message_id: String,
        error_code: String,
        error_description: String,
        error_details: Value,
    },
}

impl OcppFrame {
    /// Parse a raw JSON text into an `OcppFrame`. A structural failure here
    /// is spec.md §4.2's `FormatError`.
    pub fn parse(text: &str) -> Result<Self, OcppFrameError> {
        let arr: Vec<Value> =
            serde_json::from_str(text).map_err(|e| OcppFrameError::InvalidJson(e.to_string()))?;

        if arr.is_empty() {
            return Err(OcppFrameError::EmptyArray);
        }

        let msg_type = arr[0].as_u64().ok_or(OcppFrameError::InvalidMessageType)?;

        match msg_type {
            MSG_TYPE_CALL => Self::parse_call(&arr),
            MSG_TYPE_CALL_RESULT => Self::parse_call_result(&arr),
            MSG_TYPE_CALL_ERROR => Self::parse_call_error(&arr),
            other => Err(OcppFrameError::UnknownMessageType(other)),
        }
    }

    fn parse_call(arr: &[Value]) -> Result<Self, OcppFrameError> {
        if arr.len() < 4 {
            return Err(OcppFrameError::MissingFields {
                expected: 4,
                got: arr.len(),
            });
        }
        let message_id = arr[1]
            .as_str()
            .ok_or(OcppFrameError::FieldTypeMismatch("messageId must be a string"))?
            .to_string();
        let action = arr[2]
            .as_str()
            .ok_or(OcppFrameError::FieldTypeMismatch("action must be a string"))?
            .to_string();
        let payload = arr[3].clone();
        Ok(Self::Call {
            message_id,
            action,
            payload,
        })
    }

    fn parse_call_result(arr: &[Value]) -> Result<Self, OcppFrameError> {
        if arr.len() < 3 {
            return Err(OcppFrameError::MissingFields {
                expected: 3,
                got: arr.len(),
            });
        }
        let message_id = arr[1]
            .as_str()
            .ok_or(OcppFrameError::FieldTypeMismatch("messageId must be a string"))?
            .to_string();
        let payload = arr.get(2).cloned().unwrap_or(Value::Object(Default::default()));
        Ok(Self::CallResult { message_id, payload })
    }

    fn parse_call_error(arr: &[Value]) -> Result<Self, OcppFrameError> {
        if arr.len() < 4 {
            return Err(OcppFrameError::MissingFields {
                expected: 4,
                got: arr.len(),
            });
        }
        let message_id = arr[1]
            .as_str()
            .ok_or(OcppFrameError::FieldTypeMismatch("messageId must be a string"))?
            .to_string();
        let error_code = arr[2].as_str().unwrap_or("InternalError").to_string();
        let error_description = arr.get(3).and_then(|v| v.as_str()).unwrap_or("").to_string();
        let error_details = arr.get(4).cloned().unwrap_or(Value::Object(Default::default()));
        Ok(Self::CallError {
            message_id,
            error_code,
            error_description,
            error_details,
        })
    }

    pub fn serialize(&self) -> String {
        let arr: Value = match self {
            Self::Call {
                message_id,
                action,
                payload,
            } => Value::Array(vec![
                Value::Number(MSG_TYPE_CALL.into()),
                Value::String(message_id.clone()),
                Value::String(action.clone()),
                payload.clone(),
            ]),
            Self::CallResult { message_id, payload } => Value::Array(vec![
                Value::Number(MSG_TYPE_CALL_RESULT.into()),
                Value::String(message_id.clone()),
                payload.clone(),
            ]),
            Self::CallError {
                message_id,
                error_code,
                error_description,
                error_details,
            } => Value::Array(vec![
                Value::Number(MSG_TYPE_CALL_ERROR.into()),
                Value::String(message_id.clone()),
                Value::String(error_code.clone()),
                Value::String(error_description.clone()),
                error_details.clone(),
            ]),
        };
        serde_json::to_string(&arr).expect("serde_json::Value never fails to serialize")
    }

    pub fn message_id(&self) -> &str {
        match self {
            Self::Call { message_id, .. }
            | Self::CallResult { message_id, .. }
            | Self::CallError { message_id, .. } => message_id,
        }
    }

    pub fn error_response(
        message_id: impl Into<String>,
        error_code: impl Into<String>,
        error_description: impl Into<String>,
    ) -> Self {
        Self::CallError {
            message_id: message_id.into(),
            error_code: error_code.into(),
            error_description: error_description.into(),
            error_details: Value::Object(Default::default()),
        }
    }

    pub fn is_call(&self) -> bool {
        matches!(self, Self::Call { .. })
    }

    pub fn is_call_result(&self) -> bool {
        matches!(self, Self::CallResult { .. })
    }

    pub fn is_call_error(&self) -> bool {
        matches!(self, Self::CallError { .. })
    }
}

#[derive(Debug)]
pub enum OcppFrameError {
    InvalidJson(String),
    EmptyArray,
    InvalidMessageType,
    UnknownMessageType(u64),
    MissingFields { expected: usize, got: usize },
    FieldTypeMismatch(&'static str),
}

impl fmt::Display for OcppFrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJson(msg) => write!(f, "invalid JSON: {}", msg),
            Self::EmptyArray => write!(f, "empty OCPP message array"),
            Self::InvalidMessageType => write!(f, "message type is not a number"),
            Self::UnknownMessageType(t) => write!(f, "unknown message type: {}", t),
            Self::MissingFields { expected, got } => {
                write!(f, "expected at least {} fields, got {}", expected, got)
            }
            Self::FieldTypeMismatch(msg) => write!(f, "field type mismatch: {}", msg),
        }
    }
}

impl std::error::Error for OcppFrameError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_call() {
        let text = r#"[2,"abc123","BootNotification",{"chargePointVendor":"Vendor"}]"#;
        let frame = OcppFrame::parse(text).unwrap();
        match frame {
            OcppFrame::Call {
                message_id,
                action,
                payload,
            } => {
                assert_eq!(message_id, "abc123");
                assert_eq!(action, "BootNotification");
                assert_eq!(payload["chargePointVendor"], "Vendor");
            }
            _ => panic!("expected Call frame"),
        }
    }

    #[test]
    fn parse_call_result() {
        let text = r#"[3,"abc123",{"status":"Accepted","interval":300}]"#;
        let frame = OcppFrame::parse(text).unwrap();
        assert!(frame.is_call_result());
        assert_eq!(frame.message_id(), "abc123");
    }

    #[test]
    fn parse_call_error() {
        let text = r#"[4,"abc123","NotImplemented","Action not supported",{}]"#;
        let frame = OcppFrame::parse(text).unwrap();
        match frame {
            OcppFrame::CallError {
                error_code,
                error_description,
                ..
            } => {
                assert_eq!(error_code, "NotImplemented");
                assert_eq!(error_description, "Action not supported");
            }
            _ => panic!("expected CallError frame"),
        }
    }

    #[test]
    fn rejects_empty_array() {
        assert!(matches!(OcppFrame::parse("[]"), Err(OcppFrameError::EmptyArray)));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            OcppFrame::parse("not json"),
            Err(OcppFrameError::InvalidJson(_))
        ));
    }

    #[test]
    fn roundtrip_call() {
        let frame = OcppFrame::Call {
            message_id: "id1".into(),
            action: "Heartbeat".into(),
            payload: serde_json::json!({}),
        };
        let json = frame.serialize();
        let parsed = OcppFrame::parse(&json).unwrap();
        assert!(parsed.is_call());
        assert_eq!(parsed.message_id(), "id1");
    }

    #[test]
    fn roundtrip_call_error() {
        let frame = OcppFrame::error_response("id3", "GenericError", "Something went wrong");
        let json = frame.serialize();
        let parsed = OcppFrame::parse(&json).unwrap();
        assert!(parsed.is_call_error());
    }
}
