use crate::lxd::{LxdApiError, LxdError, LxdResult};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Status codes LXD uses for successful requests.
pub const LXD_SUCCESS_CODES: [u16; 4] = [200, 201, 202, 204];

/// Response headers, keyed by lower-cased name.
pub type LxdHeaders = BTreeMap<String, String>;

#[derive(Clone, Debug, PartialEq)]
pub enum LxdBody {
    Raw(Vec<u8>),
    Json(Value),

    /// Newline-delimited JSON, as streamed by image pulls.
    Stream(Vec<Value>),
}

impl LxdBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            LxdBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// What to do with non-success statuses other than 401.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LxdErrorStatusPolicy {
    #[default]
    Raise,
    PassThrough,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LxdResponse {
    pub status: u16,
    pub headers: LxdHeaders,
    pub body: LxdBody,
}

impl LxdResponse {
    pub fn is_success(status: u16) -> bool {
        LXD_SUCCESS_CODES.contains(&status)
    }

    pub fn new(
        status: u16,
        headers: LxdHeaders,
        raw: Vec<u8>,
        request_url: &str,
        policy: LxdErrorStatusPolicy,
    ) -> LxdResult<Self> {
        let body = if Self::is_success(status) {
            decode(raw, &headers, request_url, false)?
        } else {
            on_error_status(status, raw, &headers, request_url, policy)?
        };

        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// Returns the JSON body, failing on anything else.
    pub fn json(&self) -> LxdResult<&Value> {
        self.body
            .as_json()
            .ok_or_else(|| LxdError::Parse("Expected a JSON response".into()))
    }
}

pub fn decode(
    raw: Vec<u8>,
    headers: &LxdHeaders,
    request_url: &str,
    parse_zero_length: bool,
) -> LxdResult<LxdBody> {
    if raw.is_empty() && !parse_zero_length {
        return Ok(LxdBody::Raw(raw));
    }

    let content_type = headers
        .get("content-type")
        .map(String::as_str)
        .unwrap_or("application/json");

    if content_type != "application/json" && !content_type.is_empty() {
        return Ok(LxdBody::Raw(raw));
    }

    let text = String::from_utf8_lossy(&raw);

    let chunked = headers
        .get("transfer-encoding")
        .map_or(false, |encoding| encoding == "chunked");

    let result = if chunked && request_url.contains("fromImage") {
        text.trim()
            .replace('\r', "")
            .split('\n')
            .filter(|line| !line.is_empty())
            .map(serde_json::from_str::<Value>)
            .collect::<Result<Vec<Value>, _>>()
            .map(LxdBody::Stream)
    } else {
        serde_json::from_str(&text).map(LxdBody::Json)
    };

    result.map_err(|_| match scrape_error(&text) {
        Some(msg) => LxdError::Parse(msg.into()),
        None => LxdError::Parse("Failed to parse JSON response".into()),
    })
}

/// Finds the first `Error: <text>"` on a single line and returns `<text>`.
fn scrape_error(body: &str) -> Option<&str> {
    let mut rest = body;

    while let Some(idx) = rest.find("Error: ") {
        let after = &rest[idx + "Error: ".len()..];
        let line = after.split('\n').next().unwrap_or_default();

        // The captured text needs at least one character before the quote
        if let Some(end) = line.char_indices().skip(1).find(|(_, c)| *c == '"') {
            return Some(&line[..end.0]);
        }

        rest = &rest[idx + 1..];
    }

    None
}

fn on_error_status(
    status: u16,
    raw: Vec<u8>,
    headers: &LxdHeaders,
    request_url: &str,
    policy: LxdErrorStatusPolicy,
) -> LxdResult<LxdBody> {
    if status == 401 {
        return Err(LxdError::InvalidCredentials("Invalid credentials".into()));
    }

    match policy {
        LxdErrorStatusPolicy::PassThrough => {
            warn!(status, url = request_url, "LXD returned a non-success status");

            Ok(LxdBody::Raw(raw))
        }

        LxdErrorStatusPolicy::Raise => match decode(raw.clone(), headers, request_url, false) {
            Ok(LxdBody::Json(Value::Object(map))) => Err(LxdApiError::classify(map).into()),

            _ => Err(LxdError::UnexpectedStatus {
                status,
                body: String::from_utf8_lossy(&raw).trim().to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions as pa;
    use serde_json::json;
    use test_case::test_case;

    fn headers(items: &[(&str, &str)]) -> LxdHeaders {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test_case(200, true)]
    #[test_case(201, true)]
    #[test_case(202, true)]
    #[test_case(204, true)]
    #[test_case(203, false)]
    #[test_case(301, false)]
    #[test_case(400, false)]
    #[test_case(401, false)]
    #[test_case(500, false)]
    fn is_success(status: u16, expected: bool) {
        pa::assert_eq!(expected, LxdResponse::is_success(status));
    }

    mod decode {
        use super::*;

        #[test]
        fn given_empty_body() {
            let actual = decode(vec![], &headers(&[]), "/1.0", false).unwrap();

            pa::assert_eq!(LxdBody::Raw(vec![]), actual);
        }

        #[test]
        fn given_empty_body_with_zero_length_parsing() {
            let actual = decode(vec![], &headers(&[]), "/1.0", true).unwrap_err();

            pa::assert_eq!(LxdError::Parse("Failed to parse JSON response".into()), actual);
        }

        #[test]
        fn given_json_without_content_type() {
            let actual = decode(br#"{"status":"Success"}"#.to_vec(), &headers(&[]), "/1.0", false)
                .unwrap();

            pa::assert_eq!(LxdBody::Json(json!({ "status": "Success" })), actual);
        }

        #[test]
        fn given_json_with_empty_content_type() {
            let actual = decode(
                b"[1, 2]".to_vec(),
                &headers(&[("content-type", "")]),
                "/1.0",
                false,
            )
            .unwrap();

            pa::assert_eq!(LxdBody::Json(json!([1, 2])), actual);
        }

        #[test]
        fn given_other_content_type() {
            let actual = decode(
                b"not json".to_vec(),
                &headers(&[("content-type", "text/plain")]),
                "/1.0",
                false,
            )
            .unwrap();

            pa::assert_eq!(LxdBody::Raw(b"not json".to_vec()), actual);
        }

        #[test]
        fn given_chunked_image_pull() {
            let body = b"{\"status\":\"a\"}\r\n{\"status\":\"b\"}\r\n\r\n{\"status\":\"c\"}\n".to_vec();

            let actual = decode(
                body,
                &headers(&[("transfer-encoding", "chunked")]),
                "/images/create?fromImage=ubuntu",
                false,
            )
            .unwrap();

            pa::assert_eq!(
                LxdBody::Stream(vec![
                    json!({ "status": "a" }),
                    json!({ "status": "b" }),
                    json!({ "status": "c" }),
                ]),
                actual
            );
        }

        #[test]
        fn given_chunked_response_to_other_url() {
            let actual = decode(
                br#"{"status":"Success"}"#.to_vec(),
                &headers(&[("transfer-encoding", "chunked")]),
                "/1.0/containers",
                false,
            )
            .unwrap();

            pa::assert_eq!(LxdBody::Json(json!({ "status": "Success" })), actual);
        }

        #[test]
        fn given_invalid_json_with_error_message() {
            let body = br#"<html>{"message": "Error: no such image", "x": 1}"#.to_vec();
            let actual = decode(body, &headers(&[]), "/1.0", false).unwrap_err();

            pa::assert_eq!(LxdError::Parse("no such image".into()), actual);
        }

        #[test]
        fn given_invalid_json_without_error_message() {
            let actual = decode(b"garbage".to_vec(), &headers(&[]), "/1.0", false).unwrap_err();

            pa::assert_eq!(LxdError::Parse("Failed to parse JSON response".into()), actual);
        }

        #[test]
        fn is_idempotent() {
            let body = br#"{"status":"Success","metadata":{"name":"c1","config":{}}}"#.to_vec();

            let a = decode(body.clone(), &headers(&[]), "/1.0", false).unwrap();
            let b = decode(body, &headers(&[]), "/1.0", false).unwrap();

            pa::assert_eq!(a, b);
        }
    }

    mod scrape_error {
        use super::*;
        use test_case::test_case;

        #[test_case(r#"Error: boom""#, Some("boom"))]
        #[test_case(r#"x Error: "" Error: second""#, Some("\""))]
        #[test_case("Error: no quote", None)]
        #[test_case("Error: broken\nline\"", None)]
        #[test_case("nothing here", None)]
        fn test(body: &str, expected: Option<&str>) {
            pa::assert_eq!(expected, scrape_error(body));
        }
    }

    mod new {
        use super::*;

        #[test]
        fn given_unauthorized() {
            let actual = LxdResponse::new(
                401,
                headers(&[]),
                br#"{"error":"not authorized"}"#.to_vec(),
                "/1.0",
                LxdErrorStatusPolicy::PassThrough,
            )
            .unwrap_err();

            pa::assert_eq!(LxdError::InvalidCredentials("Invalid credentials".into()), actual);
        }

        #[test]
        fn given_error_status_with_json() {
            let actual = LxdResponse::new(
                404,
                headers(&[]),
                br#"{"type":"error","error":"not found","error_code":404}"#.to_vec(),
                "/1.0/containers/x",
                LxdErrorStatusPolicy::Raise,
            )
            .unwrap_err();

            pa::assert_eq!("LXD returned an error: error: not found", actual.to_string());
        }

        #[test]
        fn given_error_status_with_text() {
            let actual = LxdResponse::new(
                500,
                headers(&[("content-type", "text/plain")]),
                b"kaboom\n".to_vec(),
                "/1.0",
                LxdErrorStatusPolicy::Raise,
            )
            .unwrap_err();

            pa::assert_eq!(
                LxdError::UnexpectedStatus {
                    status: 500,
                    body: "kaboom".into(),
                },
                actual
            );
        }

        #[test]
        fn given_error_status_with_pass_through() {
            let actual = LxdResponse::new(
                500,
                headers(&[]),
                b"kaboom".to_vec(),
                "/1.0",
                LxdErrorStatusPolicy::PassThrough,
            )
            .unwrap();

            pa::assert_eq!(LxdBody::Raw(b"kaboom".to_vec()), actual.body);
        }

        #[test]
        fn given_success() {
            let actual = LxdResponse::new(
                200,
                headers(&[]),
                br#"{"status":"Success"}"#.to_vec(),
                "/1.0",
                LxdErrorStatusPolicy::Raise,
            )
            .unwrap();

            pa::assert_eq!(&json!({ "status": "Success" }), actual.json().unwrap());
        }
    }
}
