use crate::lxd::*;
use serde_json::json;
use tracing::info;

/// Forwards reads to the inner transport and pretends every write has
/// succeeded without sending it.
pub struct LxdDryRunTransport<T> {
    inner: T,
}

impl<T> LxdDryRunTransport<T>
where
    T: LxdTransport,
{
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<T> LxdTransport for LxdDryRunTransport<T>
where
    T: LxdTransport,
{
    fn send(&mut self, request: LxdRequest) -> LxdResult<LxdRawResponse> {
        if request.method == LxdMethod::Get {
            return self.inner.send(request);
        }

        info!(method = %request.method, path = %request.path, "Dry run, skipping request");

        let body = json!({
            "type": "sync",
            "status": "Success",
            "status_code": 200,
            "metadata": {},
        });

        Ok(LxdRawResponse {
            status: 200,
            headers: Default::default(),
            body: body.to_string().into_bytes(),
            url: request.path,
        })
    }
}
