use crate::lxd::{
    CredentialValidator, LxdError, LxdErrorStatusPolicy, LxdMethod, LxdRequest, LxdResponse,
    LxdResult, LxdTransport,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Socket timeout used by password-authenticated connections.
pub const LXD_PASSWORD_TIMEOUT: Duration = Duration::from_secs(60);

pub const LXD_TLS_PAIR_REQUIRED: &str =
    "Needs both private key file and certificate file for TLS authentication";

/// Drops a leading `http://` or `https://`; whatever follows it is kept as-is.
pub fn strip_http_prefix(host: &str) -> &str {
    host.strip_prefix("http://")
        .or_else(|| host.strip_prefix("https://"))
        .unwrap_or(host)
}

#[derive(Clone, PartialEq, Eq)]
pub enum LxdAuth {
    Password { user_id: String, key: String },
    Certificate { key_file: String, cert_file: String },
}

impl LxdAuth {
    pub fn password(user_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Password {
            user_id: user_id.into(),
            key: key.into(),
        }
    }

    /// Builds the client-certificate variant, refusing material the validator
    /// rejects.
    pub fn certificate(
        key_file: Option<&str>,
        cert_file: Option<&str>,
        validator: &dyn CredentialValidator,
    ) -> LxdResult<Self> {
        validator.validate(key_file, cert_file)?;

        match (key_file, cert_file) {
            (Some(key_file), Some(cert_file)) => Ok(Self::Certificate {
                key_file: key_file.into(),
                cert_file: cert_file.into(),
            }),

            _ => Err(LxdError::Configuration(LXD_TLS_PAIR_REQUIRED.into())),
        }
    }

    pub fn add_default_headers(&self, headers: &mut BTreeMap<String, String>) {
        headers.insert("Content-Type".into(), "application/json".into());

        if let Self::Password { user_id, key } = self {
            if !user_id.is_empty() && !key.is_empty() {
                let token = STANDARD.encode(format!("{}:{}", user_id, key));
                headers.insert("Authorization".into(), format!("Basic {}", token));
            }
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self {
            Self::Password { .. } => Some(LXD_PASSWORD_TIMEOUT),
            Self::Certificate { .. } => None,
        }
    }
}

impl fmt::Debug for LxdAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password { user_id, .. } => f
                .debug_struct("Password")
                .field("user_id", user_id)
                .finish_non_exhaustive(),

            Self::Certificate {
                key_file,
                cert_file,
            } => f
                .debug_struct("Certificate")
                .field("key_file", key_file)
                .field("cert_file", cert_file)
                .finish(),
        }
    }
}

/// How the daemon's own certificate gets checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LxdServerVerification {
    CaCert(PathBuf),

    /// LXD daemons usually run with self-signed certificates.
    Disabled,
}

impl LxdServerVerification {
    pub fn from_ca_cert(ca_cert: Option<PathBuf>) -> Self {
        match ca_cert {
            Some(ca_cert) if !ca_cert.as_os_str().is_empty() => Self::CaCert(ca_cert),
            _ => Self::Disabled,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LxdConnectionConfig {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub verification: LxdServerVerification,
    pub auth: LxdAuth,
}

impl LxdConnectionConfig {
    pub fn base_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };

        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}

pub struct LxdConnection {
    config: LxdConnectionConfig,
    transport: Box<dyn LxdTransport>,
    error_policy: LxdErrorStatusPolicy,
}

impl LxdConnection {
    pub fn new(config: LxdConnectionConfig, transport: Box<dyn LxdTransport>) -> Self {
        Self {
            config,
            transport,
            error_policy: Default::default(),
        }
    }

    pub fn with_error_policy(mut self, error_policy: LxdErrorStatusPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    pub fn config(&self) -> &LxdConnectionConfig {
        &self.config
    }

    pub fn request(
        &mut self,
        method: LxdMethod,
        path: impl Into<String>,
        json: Option<Value>,
    ) -> LxdResult<LxdResponse> {
        let path = path.into();
        let mut headers = BTreeMap::new();

        self.config.auth.add_default_headers(&mut headers);

        debug!(%method, %path, "Sending request to LXD");

        let response = self.transport.send(LxdRequest {
            method,
            path,
            headers,
            json,
        })?;

        debug!(status = response.status, url = %response.url, "Received response from LXD");

        LxdResponse::new(
            response.status,
            response.headers,
            response.body,
            &response.url,
            self.error_policy,
        )
    }

    pub fn get(&mut self, path: impl Into<String>) -> LxdResult<LxdResponse> {
        self.request(LxdMethod::Get, path, None)
    }
}
