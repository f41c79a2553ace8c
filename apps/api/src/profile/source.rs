use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::models::profile::{GlobalData, SnapshotError};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CMS returned status {0}")]
    Status(u16),

    #[error("Malformed profile payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Incomplete(#[from] SnapshotError),
}

/// Anything that can produce one complete profile snapshot per call.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch(&self) -> Result<GlobalData, ProfileError>;
}

/// Fetches the snapshot from a headless CMS with a bearer token.
#[derive(Clone)]
pub struct HttpProfileSource {
    client: Client,
    endpoint: String,
    access_token: String,
}

impl HttpProfileSource {
    pub fn new(endpoint: String, access_token: String, timeout: Duration) -> Result<Self, ProfileError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            access_token,
        })
    }
}

#[async_trait]
impl ProfileSource for HttpProfileSource {
    async fn fetch(&self) -> Result<GlobalData, ProfileError> {
        let response = self
            .client
            .get(&self.endpoint)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProfileError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let data: GlobalData = serde_json::from_slice(&body)?;
        data.validate()?;
        Ok(data)
    }
}
