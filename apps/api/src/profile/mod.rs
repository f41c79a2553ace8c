//! Profile Data Provider — resolves the résumé snapshot once at startup.
//!
//! Remote CMS first (when enabled), bounded exponential backoff on failure, and
//! the embedded fallback record whenever the remote path is disabled or exhausted.
//! `load` never fails.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use crate::config::CmsConfig;
use crate::models::fallback::fallback_profile;
use crate::models::profile::GlobalData;

pub mod retry;
pub mod source;

use retry::{retry_with_backoff, RetryPolicy};
use source::{HttpProfileSource, ProfileError, ProfileSource};

/// Where the served snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileOrigin {
    /// Fetched from the remote CMS.
    Remote,
    /// Remote fetch turned off by configuration.
    Disabled,
    /// Remote fetch failed after every retry.
    Degraded,
}

#[derive(Debug, Clone)]
pub struct LoadedProfile {
    pub data: Arc<GlobalData>,
    pub origin: ProfileOrigin,
}

#[derive(Clone)]
pub struct ProfileProvider {
    source: Option<Arc<dyn ProfileSource>>,
    policy: RetryPolicy,
    fallback: Arc<GlobalData>,
}

impl ProfileProvider {
    pub fn from_config(cms: &CmsConfig) -> Result<Self, ProfileError> {
        let policy = RetryPolicy::new(cms.max_retries, cms.retry_delay).with_jitter(cms.retry_jitter);
        if !cms.enabled {
            return Ok(Self::disabled(policy));
        }
        let source = HttpProfileSource::new(cms.endpoint.clone(), cms.access_token.clone(), cms.timeout)?;
        Ok(Self::with_source(Arc::new(source), policy))
    }

    pub fn disabled(policy: RetryPolicy) -> Self {
        Self {
            source: None,
            policy,
            fallback: fallback_profile(),
        }
    }

    pub fn with_source(source: Arc<dyn ProfileSource>, policy: RetryPolicy) -> Self {
        Self {
            source: Some(source),
            policy,
            fallback: fallback_profile(),
        }
    }

    /// Resolves the snapshot and reports its origin.
    pub async fn load(&self) -> LoadedProfile {
        let Some(source) = &self.source else {
            return LoadedProfile {
                data: self.fallback.clone(),
                origin: ProfileOrigin::Disabled,
            };
        };

        let source = source.as_ref();
        match retry_with_backoff(self.policy, move |_| source.fetch()).await {
            Ok(data) => {
                info!("Profile snapshot loaded from CMS");
                LoadedProfile {
                    data: Arc::new(data),
                    origin: ProfileOrigin::Remote,
                }
            }
            Err(e) => {
                error!("CMS final failure ({e}), reverting to embedded profile data");
                LoadedProfile {
                    data: self.fallback.clone(),
                    origin: ProfileOrigin::Degraded,
                }
            }
        }
    }

    /// The snapshot alone, for callers that don't care where it came from.
    #[allow(dead_code)]
    pub async fn get_profile(&self) -> Arc<GlobalData> {
        self.load().await.data
    }
}
