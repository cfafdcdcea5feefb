use crate::lxd::*;
use anyhow::Context;
use reqwest::blocking::Client;
use reqwest::{Certificate, Identity, Method};
use std::fs;

/// Talks to a real LXD daemon over HTTP(S).
pub struct LxdHttpTransport {
    client: Client,
    base_url: String,
}

impl LxdHttpTransport {
    pub fn new(config: &LxdConnectionConfig) -> LxdResult<Self> {
        let mut builder = Client::builder().timeout(config.auth.timeout());

        if let LxdAuth::Certificate {
            key_file,
            cert_file,
        } = &config.auth
        {
            builder = builder.identity(identity(key_file, cert_file)?);
        }

        if config.secure {
            builder = match &config.verification {
                LxdServerVerification::CaCert(ca_cert) => {
                    let pem = fs::read(expand_home(&ca_cert.to_string_lossy()))
                        .with_context(|| {
                            format!("Couldn't read CA certificate: {}", ca_cert.display())
                        })?;

                    let ca_cert =
                        Certificate::from_pem(&pem).context("Couldn't parse CA certificate")?;

                    builder.add_root_certificate(ca_cert)
                }

                LxdServerVerification::Disabled => builder.danger_accept_invalid_certs(true),
            };
        }

        let client = builder.build().context("Couldn't build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url(),
        })
    }
}

fn identity(key_file: &str, cert_file: &str) -> LxdResult<Identity> {
    let mut pem = fs::read(expand_home(cert_file))
        .with_context(|| format!("Couldn't read certificate file: {}", cert_file))?;

    let key = fs::read(expand_home(key_file))
        .with_context(|| format!("Couldn't read key file: {}", key_file))?;

    pem.push(b'\n');
    pem.extend(key);

    Identity::from_pem(&pem).map_err(|err| {
        LxdError::InvalidCredentials(format!("Couldn't load client identity: {}", err))
    })
}

impl LxdTransport for LxdHttpTransport {
    fn send(&mut self, request: LxdRequest) -> LxdResult<LxdRawResponse> {
        let url = format!("{}{}", self.base_url, request.path);

        let method = match request.method {
            LxdMethod::Get => Method::GET,
            LxdMethod::Post => Method::POST,
            LxdMethod::Put => Method::PUT,
            LxdMethod::Delete => Method::DELETE,
        };

        let mut builder = self.client.request(method, &url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(json) = &request.json {
            builder = builder.json(json);
        }

        let response = builder
            .send()
            .with_context(|| format!("Couldn't send request: {} {}", request.method, url))?;

        let status = response.status().as_u16();

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                let value = value.to_str().ok()?;
                Some((name.as_str().to_lowercase(), value.to_string()))
            })
            .collect();

        let body = response
            .bytes()
            .context("Couldn't read LXD's response")?
            .to_vec();

        Ok(LxdRawResponse {
            status,
            headers,
            body,
            url,
        })
    }
}
