use crate::lxd::*;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Requests seen by a [`LxdFakeTransport`], in the order they were sent.
pub type LxdRequestLog = Rc<RefCell<Vec<LxdRequest>>>;

/// Answers requests from a table of scripted responses.
///
/// Unknown `(method, path)` pairs get LXD's usual 404 error envelope.
#[derive(Debug, Default)]
pub struct LxdFakeTransport {
    responses: BTreeMap<(LxdMethod, String), LxdRawResponse>,
    requests: LxdRequestLog,
}

impl LxdFakeTransport {
    pub fn with(mut self, method: LxdMethod, path: &str, status: u16, body: Value) -> Self {
        self.add(method, path, status, body);
        self
    }

    pub fn add(&mut self, method: LxdMethod, path: &str, status: u16, body: Value) {
        self.add_raw(
            method,
            LxdRawResponse {
                status,
                headers: Default::default(),
                body: body.to_string().into_bytes(),
                url: path.into(),
            },
        );
    }

    pub fn add_raw(&mut self, method: LxdMethod, response: LxdRawResponse) {
        self.responses
            .insert((method, response.url.clone()), response);
    }

    pub fn requests(&self) -> LxdRequestLog {
        Rc::clone(&self.requests)
    }
}

impl LxdTransport for LxdFakeTransport {
    fn send(&mut self, request: LxdRequest) -> LxdResult<LxdRawResponse> {
        let response = self
            .responses
            .get(&(request.method, request.path.clone()))
            .cloned()
            .unwrap_or_else(|| LxdRawResponse {
                status: 404,
                headers: Default::default(),
                body: json!({
                    "type": "error",
                    "error": "not found",
                    "error_code": 404,
                })
                .to_string()
                .into_bytes(),
                url: request.path.clone(),
            });

        self.requests.borrow_mut().push(request);

        Ok(response)
    }
}
