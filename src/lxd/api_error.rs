use serde_json::{Map, Value};
use std::fmt;

/// Error-identifying fields LXD may put into a response.
///
/// None of them is guaranteed to be present; a field is `Some` whenever its key
/// exists in the payload, even if the value itself is `null`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LxdErrorPayload {
    pub kind: Option<Value>,
    pub status: Option<Value>,
    pub status_code: Option<Value>,
    pub operation: Option<Value>,
    pub error_code: Option<Value>,
    pub error: Option<Value>,
}

impl LxdErrorPayload {
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            kind: map.get("type").cloned(),
            status: map.get("status").cloned(),
            status_code: map.get("status_code").cloned(),
            operation: map.get("operation").cloned(),
            error_code: map.get("error_code").cloned(),
            error: map.get("error").cloned(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.status.is_none()
            && self.status_code.is_none()
            && self.operation.is_none()
            && self.error_code.is_none()
            && self.error.is_none()
    }
}

/// LXD answered with a well-formed response that describes a failure.
#[derive(Clone, Debug, PartialEq)]
pub struct LxdApiError {
    payload: LxdErrorPayload,
    response: Map<String, Value>,
}

impl LxdApiError {
    pub fn classify(response: Map<String, Value>) -> Self {
        Self {
            payload: LxdErrorPayload::from_map(&response),
            response,
        }
    }

    /// Classifies any JSON value; non-objects are treated as an empty payload.
    pub fn classify_value(response: &Value) -> Self {
        match response {
            Value::Object(map) => Self::classify(map.clone()),
            _ => Self::classify(Map::new()),
        }
    }

    pub fn payload(&self) -> &LxdErrorPayload {
        &self.payload
    }

    pub fn response(&self) -> &Map<String, Value> {
        &self.response
    }

    /// Renders the payload into a message.
    ///
    /// `type` and `status` accumulate, while each of `status_code`,
    /// `operation`, `error_code` and `error` replaces everything rendered
    /// before it.
    pub fn message(&self) -> String {
        if self.payload.is_empty() {
            return "Empty LXDResponse".into();
        }

        let p = &self.payload;
        let mut msg = String::from(" ");

        if let Some(kind) = &p.kind {
            msg.push_str(&fragment("type", kind));
        }

        if let Some(status) = &p.status {
            msg.push_str(&fragment("status", status));
        }

        let overrides = [
            ("status_code", &p.status_code),
            ("operation", &p.operation),
            ("error_code", &p.error_code),
            ("error", &p.error),
        ];

        for (key, value) in overrides {
            if let Some(value) = value {
                msg = fragment(key, value);
            }
        }

        msg
    }
}

impl fmt::Display for LxdApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for LxdApiError {}

fn fragment(key: &str, value: &Value) -> String {
    match value {
        Value::String(value) => format!("{}: {} ", key, value),
        value => format!("{}: {} ", key, value),
    }
}
