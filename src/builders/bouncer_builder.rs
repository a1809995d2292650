//! Builder to construct a bouncer from configuration.

use crate::config::BouncerConfig;
use crate::core::{AuditSink, Bouncer, BouncerError, JobStore};

/// Assembles a [`Bouncer`] from validated configuration.
pub struct BouncerBuilder {
    config: BouncerConfig,
    audit: Option<Box<dyn AuditSink>>,
}

impl BouncerBuilder {
    /// Start from a configuration.
    pub fn new(config: BouncerConfig) -> Self {
        Self {
            config,
            audit: None,
        }
    }

    /// Configuration the bouncer will be built with.
    pub const fn config(&self) -> &BouncerConfig {
        &self.config
    }

    /// Record admission decisions into `audit`.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Validate the configuration and build a bouncer over `store`.
    pub fn build<S: JobStore>(self, store: S) -> Result<Bouncer<S>, BouncerError> {
        self.config.validate().map_err(BouncerError::Config)?;
        let bouncer = Bouncer::new(self.config, store);
        Ok(match self.audit {
            Some(audit) => bouncer.with_audit(audit),
            None => bouncer,
        })
    }

    /// Validate the configuration, connect to `store_uri` and build.
    #[cfg(feature = "redis-store")]
    pub async fn connect(self) -> Result<Bouncer<crate::infra::RedisStore>, BouncerError> {
        self.config.validate().map_err(BouncerError::Config)?;
        let store = crate::infra::RedisStore::connect(&self.config.store_uri).await?;
        self.build(store)
    }
}
