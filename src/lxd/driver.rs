use crate::lxd::*;
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::debug;

/// API version assumed for every daemon.
pub const LXD_API_VERSION: &str = "1.0";

/// Values of the envelope's `status` field that mean success.
pub const LXD_API_SUCCESS_STATUS: [&str; 1] = ["Success"];

/// Figures out which API version the driver should talk; called once, right
/// after the connection is set up.
pub type LxdVersionDiscovery = fn(&mut LxdConnection) -> LxdResult<String>;

/// Returns [`LXD_API_VERSION`] without asking the daemon.
pub fn fixed_api_version(_: &mut LxdConnection) -> LxdResult<String> {
    Ok(LXD_API_VERSION.into())
}

/// Asks the daemon (`GET /`) and picks the last advertised version.
pub fn negotiated_api_version(conn: &mut LxdConnection) -> LxdResult<String> {
    let response = conn.get("/")?;

    response
        .json()?
        .get("metadata")
        .and_then(Value::as_array)
        .and_then(|endpoints| endpoints.last())
        .and_then(Value::as_str)
        .map(trailing_segment)
        .filter(|version| !version.is_empty())
        .map(String::from)
        .ok_or_else(|| LxdError::Parse("LXD didn't advertise any API version".into()))
}

fn trailing_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[derive(Clone, Debug)]
pub struct LxdDriverOptions {
    pub key: String,
    pub secret: String,
    pub secure: bool,
    pub host: String,
    pub port: u16,
    pub key_file: Option<String>,
    pub cert_file: Option<String>,
    pub ca_cert: Option<PathBuf>,
}

impl Default for LxdDriverOptions {
    fn default() -> Self {
        Self {
            key: Default::default(),
            secret: Default::default(),
            secure: false,
            host: "localhost".into(),
            port: 8443,
            key_file: None,
            cert_file: None,
            ca_cert: None,
        }
    }
}

pub struct LxdDriverBuilder {
    options: LxdDriverOptions,
    validator: Box<dyn CredentialValidator>,
    version_discovery: LxdVersionDiscovery,
    error_policy: LxdErrorStatusPolicy,
}

impl LxdDriverBuilder {
    pub fn new(options: LxdDriverOptions) -> Self {
        Self {
            options,
            validator: Box::new(DefaultCredentialValidator::default()),
            version_discovery: fixed_api_version,
            error_policy: Default::default(),
        }
    }

    pub fn with_validator(mut self, validator: impl CredentialValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    pub fn with_version_discovery(mut self, version_discovery: LxdVersionDiscovery) -> Self {
        self.version_discovery = version_discovery;
        self
    }

    pub fn with_error_policy(mut self, error_policy: LxdErrorStatusPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    pub fn build(self) -> LxdResult<LxdDriver> {
        self.build_with(|config| Ok(Box::new(LxdHttpTransport::new(config)?)))
    }

    /// Builds the driver, creating the transport out of the final connection
    /// config.
    pub fn build_with<F>(self, transport: F) -> LxdResult<LxdDriver>
    where
        F: FnOnce(&LxdConnectionConfig) -> LxdResult<Box<dyn LxdTransport>>,
    {
        let LxdDriverOptions {
            key,
            secret,
            mut secure,
            host,
            port,
            key_file,
            cert_file,
            ca_cert,
        } = self.options;

        let has_key_file = key_file.as_deref().map_or(false, |file| !file.is_empty());
        let has_cert_file = cert_file.as_deref().map_or(false, |file| !file.is_empty());

        if has_key_file {
            secure = true;
        }

        if host.starts_with("https://") {
            secure = true;
        }

        let host = strip_http_prefix(&host).to_string();

        let auth = if has_key_file {
            LxdAuth::certificate(key_file.as_deref(), cert_file.as_deref(), &*self.validator)?
        } else {
            LxdAuth::password(key, secret)
        };

        if has_key_file != has_cert_file {
            return Err(LxdError::Configuration(LXD_TLS_PAIR_REQUIRED.into()));
        }

        let config = LxdConnectionConfig {
            host,
            port,
            secure,
            verification: LxdServerVerification::from_ca_cert(ca_cert),
            auth,
        };

        let transport = transport(&config)?;
        let mut connection =
            LxdConnection::new(config, transport).with_error_policy(self.error_policy);
        let version = (self.version_discovery)(&mut connection)?;

        debug!(%version, "LXD driver ready");

        Ok(LxdDriver {
            connection,
            version,
        })
    }
}

/// Container driver for LXD's REST API.
///
/// See: <https://documentation.ubuntu.com/lxd/en/latest/rest-api/>
pub struct LxdDriver {
    connection: LxdConnection,
    version: String,
}

impl LxdDriver {
    pub fn new(options: LxdDriverOptions) -> LxdResult<Self> {
        LxdDriverBuilder::new(options).build()
    }

    pub fn builder(options: LxdDriverOptions) -> LxdDriverBuilder {
        LxdDriverBuilder::new(options)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn connection(&self) -> &LxdConnection {
        &self.connection
    }

    /// Lists the API endpoints; allowed for everyone.
    pub fn api_endpoints(&mut self) -> LxdResult<LxdResponse> {
        self.connection.get("/")
    }

    /// Returns server configuration and environment; allowed for everyone.
    pub fn version_info(&mut self) -> LxdResult<LxdResponse> {
        self.connection.get(format!("/{}", self.version))
    }

    /// Adds a new trusted client certificate.
    pub fn register_certificate(
        &mut self,
        certificate: &str,
        name: &str,
        password: &str,
    ) -> LxdResult<LxdResponse> {
        let path = format!(
            "/{}/certificates?type=client&certificate={}&name={}&password={}",
            self.version,
            urlencoding::encode(certificate),
            urlencoding::encode(name),
            urlencoding::encode(password),
        );

        self.connection.request(LxdMethod::Post, path, None)
    }

    /// Creates a container with no root filesystem source.
    ///
    /// `image`, `cluster`, `parameters` and `start` are accepted for parity
    /// with other container drivers, but aren't sent to LXD.
    pub fn deploy_container(
        &mut self,
        name: &str,
        image: &ContainerImage,
        cluster: Option<&ContainerCluster>,
        parameters: Option<&str>,
        start: bool,
    ) -> LxdResult<LxdResponse> {
        debug!(
            container = name,
            image = %image.name,
            cluster = ?cluster.map(|cluster| &cluster.name),
            ?parameters,
            start,
            "Deploying container"
        );

        let body = json!({
            "name": name,
            "source": { "type": "none" },
        });

        self.connection.request(
            LxdMethod::Post,
            format!("/{}/containers", self.version),
            Some(body),
        )
    }

    pub fn get_container(&mut self, id: &str) -> LxdResult<Container> {
        let response = self
            .connection
            .get(format!("/{}/containers/{}", self.version, id))?;

        let meta: LxdContainerMetadata = parse_metadata(&response, "container")?;

        Ok(meta.into())
    }

    /// Lists all containers, fetching each of them in the order LXD returns
    /// them.
    pub fn list_containers(&mut self) -> LxdResult<Vec<Container>> {
        let ids = self.list_ids(format!("/{}/containers", self.version))?;

        ids.iter().map(|id| self.get_container(id)).collect()
    }

    pub fn get_image(&mut self, fingerprint: &str) -> LxdResult<ContainerImage> {
        let response = self
            .connection
            .get(format!("/{}/images/{}", self.version, fingerprint))?;

        let meta: LxdImageMetadata = parse_metadata(&response, "image")?;

        let name = meta
            .aliases
            .into_iter()
            .next()
            .map(|alias| alias.name)
            .unwrap_or(meta.fingerprint);

        Ok(ContainerImage::from_alias(name))
    }

    pub fn list_images(&mut self) -> LxdResult<Vec<ContainerImage>> {
        let fingerprints = self.list_ids(format!("/{}/images/", self.version))?;

        fingerprints
            .iter()
            .map(|fingerprint| self.get_image(fingerprint))
            .collect()
    }

    pub fn start_container(&mut self, container: &Container) -> LxdResult<Container> {
        self.do_container_action(container, LxdStateAction::Start)
    }

    pub fn stop_container(&mut self, container: &Container) -> LxdResult<Container> {
        self.do_container_action(container, LxdStateAction::Stop)
    }

    pub fn restart_container(&mut self, container: &Container) -> LxdResult<Container> {
        self.do_container_action(container, LxdStateAction::Restart)
    }

    /// Performs any of `stop`, `start`, `restart`, `freeze` or `unfreeze`.
    ///
    /// Fails with [`LxdError::InvalidAction`], before contacting LXD, for
    /// anything else.
    pub fn container_action(
        &mut self,
        container: &Container,
        action: &str,
    ) -> LxdResult<Container> {
        let action = action.parse()?;

        self.do_container_action(container, action)
    }

    /// Deletes the container; it must be stopped first.
    pub fn destroy_container(&mut self, container: &Container) -> LxdResult<LxdResponse> {
        self.connection.request(
            LxdMethod::Delete,
            format!("/{}/containers/{}", self.version, container.name),
            None,
        )
    }

    fn do_container_action(
        &mut self,
        container: &Container,
        action: LxdStateAction,
    ) -> LxdResult<Container> {
        let body = json!({
            "action": action.as_str(),
            "timeout": LxdStateAction::TIMEOUT,
            "stateful": true,
            "force": action.force(),
        });

        self.connection.request(
            LxdMethod::Put,
            format!("/{}/containers/{}/state", self.version, container.name),
            Some(body),
        )?;

        self.get_container(&container.name)
    }

    /// Fetches a listing of self-referencing paths and returns their trailing
    /// segments.
    fn list_ids(&mut self, path: String) -> LxdResult<Vec<String>> {
        let response = self.connection.get(path)?;

        let paths = metadata(&response)?
            .as_array()
            .ok_or_else(|| LxdError::Parse("Expected a list of resources".into()))?;

        paths
            .iter()
            .map(|path| {
                path.as_str()
                    .map(|path| trailing_segment(path).to_string())
                    .ok_or_else(|| {
                        LxdError::Parse(format!("Expected a resource path, got: {}", path))
                    })
            })
            .collect()
    }
}

/// Unwraps the `{status, metadata}` envelope.
fn metadata(response: &LxdResponse) -> LxdResult<&Value> {
    let body = response.json()?;

    let succeeded = body
        .get("status")
        .and_then(Value::as_str)
        .map_or(false, |status| LXD_API_SUCCESS_STATUS.contains(&status));

    if !succeeded {
        return Err(LxdApiError::classify_value(body).into());
    }

    body.get("metadata")
        .ok_or_else(|| LxdError::Parse("Response has no metadata".into()))
}

fn parse_metadata<T>(response: &LxdResponse, what: &str) -> LxdResult<T>
where
    T: DeserializeOwned,
{
    let meta = metadata(response)?;

    serde_json::from_value(meta.clone())
        .with_context(|| format!("Couldn't parse {}", what))
        .map_err(LxdError::Other)
}
