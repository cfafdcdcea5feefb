use crate::lxd::LxdApiError;
use std::result;
use thiserror::Error;

pub type LxdResult<T> = result::Result<T, LxdError>;

#[derive(Debug, Error)]
pub enum LxdError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Couldn't parse LXD's response: {0}")]
    Parse(String),

    #[error("LXD returned an error: {}", .0.message().trim())]
    Api(LxdApiError),

    #[error("Invalid action specified: {0}")]
    InvalidAction(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("LXD returned an unexpected status code ({status}) and said: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<LxdApiError> for LxdError {
    fn from(err: LxdApiError) -> Self {
        Self::Api(err)
    }
}

#[cfg(test)]
impl PartialEq<LxdError> for LxdError {
    fn eq(&self, other: &LxdError) -> bool {
        self.to_string() == other.to_string()
    }
}
