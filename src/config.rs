use crate::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub secure: bool,
    pub user: Option<String>,
    pub password: Option<String>,
    pub key_file: Option<String>,
    pub cert_file: Option<String>,
    pub ca_cert: Option<PathBuf>,
    pub key_extensions: Option<Vec<String>>,
    pub cert_extensions: Option<Vec<String>>,
    #[serde(default)]
    pub negotiate_version: bool,
    #[serde(default)]
    pub error_status: ErrorStatus,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorStatus {
    #[default]
    Raise,
    PassThrough,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            secure: false,
            user: None,
            password: None,
            key_file: None,
            cert_file: None,
            ca_cert: None,
            key_extensions: None,
            cert_extensions: None,
            negotiate_version: false,
            error_status: Default::default(),
        }
    }
}

impl Config {
    #[cfg(test)]
    pub fn from_code(code: &str) -> Self {
        serde_yaml::from_str(code).unwrap()
    }

    pub fn load(file: impl AsRef<Path>) -> Result<Self> {
        let file = file.as_ref();

        let result: Result<_> = (|| {
            let code = fs::read_to_string(file).context("Couldn't read file")?;
            serde_yaml::from_str(&code).context("Couldn't parse file")
        })();

        result.with_context(|| format!("Couldn't load configuration from: {}", file.display()))
    }

    pub fn driver_options(&self) -> LxdDriverOptions {
        LxdDriverOptions {
            key: self.user.clone().unwrap_or_default(),
            secret: self.password.clone().unwrap_or_default(),
            secure: self.secure,
            host: self.host.clone(),
            port: self.port,
            key_file: self.key_file.clone(),
            cert_file: self.cert_file.clone(),
            ca_cert: self.ca_cert.clone(),
        }
    }

    pub fn validator(&self) -> DefaultCredentialValidator {
        DefaultCredentialValidator {
            allowed_key_extensions: self.key_extensions.clone(),
            allowed_cert_extensions: self.cert_extensions.clone(),
        }
    }

    pub fn driver_builder(&self) -> LxdDriverBuilder {
        let version_discovery: LxdVersionDiscovery = if self.negotiate_version {
            negotiated_api_version
        } else {
            fixed_api_version
        };

        let error_policy = match self.error_status {
            ErrorStatus::Raise => LxdErrorStatusPolicy::Raise,
            ErrorStatus::PassThrough => LxdErrorStatusPolicy::PassThrough,
        };

        LxdDriver::builder(self.driver_options())
            .with_validator(self.validator())
            .with_version_discovery(version_discovery)
            .with_error_policy(error_policy)
    }
}

fn default_host() -> String {
    "localhost".into()
}

fn default_port() -> u16 {
    8443
}

#[cfg(test)]
mod tests {
    use super::*;

    mod load {
        use super::*;

        #[test]
        fn examples() {
            let examples: Vec<_> = glob::glob("docs/example-configs/*.yaml")
                .unwrap()
                .map(|example| example.unwrap())
                .collect();

            if examples.is_empty() {
                panic!("Found no example configs");
            }

            for example in examples {
                Config::load(&example).unwrap();
            }
        }

        #[test]
        fn given_missing_file() {
            let actual = Config::load("nonexistent.yaml").unwrap_err();

            pa::assert_str_eq!(
                "Couldn't load configuration from: nonexistent.yaml",
                actual.to_string()
            );
        }
    }

    mod from_code {
        use super::*;

        #[test]
        fn given_empty_config() {
            let config = Config::from_code("{}");

            pa::assert_eq!("localhost", config.host);
            pa::assert_eq!(8443, config.port);
            pa::assert_eq!(ErrorStatus::Raise, config.error_status);
        }

        #[test]
        fn given_full_config() {
            let config = Config::from_code(indoc!(
                r#"
                host: https://10.0.0.1
                port: 9443
                key-file: ~/.config/lxc/client.key
                cert-file: ~/.config/lxc/client.crt
                ca-cert: /etc/lxd/server.crt
                key-extensions: [key, pem]
                cert-extensions: [crt]
                negotiate-version: true
                error-status: pass-through
                "#
            ));

            let options = config.driver_options();

            pa::assert_eq!("https://10.0.0.1", options.host);
            pa::assert_eq!(9443, options.port);
            pa::assert_eq!(Some("~/.config/lxc/client.key"), options.key_file.as_deref());
            pa::assert_eq!(Some("~/.config/lxc/client.crt"), options.cert_file.as_deref());
            pa::assert_eq!(Some(PathBuf::from("/etc/lxd/server.crt")), options.ca_cert);
            pa::assert_eq!(ErrorStatus::PassThrough, config.error_status);

            let validator = config.validator();

            pa::assert_eq!(
                Some(vec!["key".to_string(), "pem".to_string()]),
                validator.allowed_key_extensions
            );
            pa::assert_eq!(Some(vec!["crt".to_string()]), validator.allowed_cert_extensions);
        }

        #[test]
        fn given_password() {
            let config = Config::from_code(indoc!(
                r#"
                host: lxd.local
                user: admin
                password: hunter2
                "#
            ));

            let options = config.driver_options();

            pa::assert_eq!("admin", options.key);
            pa::assert_eq!("hunter2", options.secret);
        }

        #[test]
        fn given_unknown_field() {
            let actual = serde_yaml::from_str::<Config>("hots: localhost");

            assert!(actual.is_err());
        }
    }

    #[test]
    fn driver_builder() {
        let config = Config::from_code("host: https://lxd.local");

        let driver = config
            .driver_builder()
            .build_with(|_| Ok(Box::new(LxdFakeTransport::default())))
            .unwrap();

        pa::assert_eq!("lxd.local", driver.connection().config().host);
        pa::assert_eq!(true, driver.connection().config().secure);
        pa::assert_eq!("1.0", driver.version());
    }
}
