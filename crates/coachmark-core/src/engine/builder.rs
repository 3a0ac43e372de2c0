//! Builder for creating and configuring TourEngine instances.

use super::{EngineConfig, TourEngine};
use crate::{error::Result, locator::TargetLocator, store::FlagStore};

/// Builder for creating and configuring [`TourEngine`] instances.
#[derive(Debug, Clone)]
pub struct TourEngineBuilder<L, S> {
    locator: L,
    store: S,
    config: EngineConfig,
}

impl<L: TargetLocator, S: FlagStore> TourEngineBuilder<L, S> {
    /// Creates a builder around a host surface and a flag store, with the
    /// default configuration.
    pub fn new(locator: L, store: S) -> Self {
        Self {
            locator,
            store,
            config: EngineConfig::default(),
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the engine.
    ///
    /// # Errors
    ///
    /// Returns `TourError::Configuration` if the configuration is invalid.
    pub fn build(self) -> Result<TourEngine<L, S>> {
        self.config.validate()?;
        Ok(TourEngine::new(self.locator, self.store, self.config))
    }
}
