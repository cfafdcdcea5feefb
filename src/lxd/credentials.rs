use crate::lxd::{LxdError, LxdResult};
use itertools::Itertools;
use std::path::PathBuf;

/// Checks TLS key and certificate material before a connection is attempted.
pub trait CredentialValidator {
    fn validate(&self, key_file: Option<&str>, cert_file: Option<&str>) -> LxdResult<()>;
}

impl<F> CredentialValidator for F
where
    F: Fn(Option<&str>, Option<&str>) -> LxdResult<()>,
{
    fn validate(&self, key_file: Option<&str>, cert_file: Option<&str>) -> LxdResult<()> {
        self(key_file, cert_file)
    }
}

#[derive(Clone, Debug, Default)]
pub struct DefaultCredentialValidator {
    pub allowed_key_extensions: Option<Vec<String>>,
    pub allowed_cert_extensions: Option<Vec<String>>,
}

impl DefaultCredentialValidator {
    pub fn with_key_extensions(
        mut self,
        extensions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.allowed_key_extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_cert_extensions(
        mut self,
        extensions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.allowed_cert_extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }
}

impl CredentialValidator for DefaultCredentialValidator {
    fn validate(&self, key_file: Option<&str>, cert_file: Option<&str>) -> LxdResult<()> {
        let (key_file, cert_file) = match (key_file, cert_file) {
            (Some(key_file), Some(cert_file)) if !key_file.is_empty() && !cert_file.is_empty() => {
                (key_file, cert_file)
            }

            _ => {
                return Err(LxdError::InvalidCredentials(
                    "TLS connection requires specification of a key file and a certificate file"
                        .into(),
                ));
            }
        };

        if let Some(allowed) = &self.allowed_key_extensions {
            check_extension("key", key_file, allowed)?;
        }

        if let Some(allowed) = &self.allowed_cert_extensions {
            check_extension("certificate", cert_file, allowed)?;
        }

        if !expand_home(key_file).is_file() {
            return Err(LxdError::InvalidCredentials(
                "You need a key file to authenticate with LXD TLS; this can be found on the server"
                    .into(),
            ));
        }

        if !expand_home(cert_file).is_file() {
            return Err(LxdError::InvalidCredentials(
                "You need a certificate file to authenticate with LXD TLS; this can be found on the server"
                    .into(),
            ));
        }

        Ok(())
    }
}

fn suffix(file: &str) -> &str {
    file.rsplit('.').next().unwrap_or(file)
}

fn check_extension(kind: &str, file: &str, allowed: &[String]) -> LxdResult<()> {
    let suffix = suffix(file);

    if allowed.iter().any(|ext| ext == suffix) {
        Ok(())
    } else {
        Err(LxdError::InvalidCredentials(format!(
            "Valid {} files are: [{}], you provided: {}",
            kind,
            allowed.iter().join(", "),
            suffix,
        )))
    }
}

/// Expands a leading `~` into the current user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
