use crate::lxd::{LxdHeaders, LxdResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LxdMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl LxdMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for LxdMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LxdRequest {
    pub method: LxdMethod,

    /// Path relative to the daemon's root, including the query string.
    pub path: String,

    pub headers: BTreeMap<String, String>,
    pub json: Option<Value>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LxdRawResponse {
    pub status: u16,
    pub headers: LxdHeaders,
    pub body: Vec<u8>,

    /// URL the request was sent to.
    pub url: String,
}

/// Moves a single request over the wire.
pub trait LxdTransport {
    fn send(&mut self, request: LxdRequest) -> LxdResult<LxdRawResponse>;
}

impl<T> LxdTransport for Box<T>
where
    T: LxdTransport + ?Sized,
{
    fn send(&mut self, request: LxdRequest) -> LxdResult<LxdRawResponse> {
        (**self).send(request)
    }
}
