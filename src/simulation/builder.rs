/*!
 * Simulation Builder
 * Builder pattern for SimulationEngine construction
 */

use super::SimulationEngine;
use crate::core::config::{PolicyConfig, SimulationConfig};
use crate::core::types::SimResult;
use crate::monitoring::Journal;
use tracing::info;

/// Builder for SimulationEngine
#[derive(Debug, Default)]
pub struct SimulationBuilder {
    config: Option<SimulationConfig>,
    policy: Option<PolicyConfig>,
    journal: Option<Journal>,
}

impl SimulationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a full configuration
    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the configured policy
    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Share an existing journal instead of creating a private one
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Validate the configuration and build the engine
    pub fn build(self) -> SimResult<SimulationEngine> {
        let mut config = self.config.unwrap_or_default();
        if let Some(policy) = self.policy {
            config.policy = policy;
        }
        config.validate()?;

        let shared_journal = self.journal.is_some();
        let engine = SimulationEngine::from_parts(&config, self.journal.unwrap_or_default());
        info!(
            run_id = %engine.run_id(),
            shared_journal,
            devices = config.devices.len(),
            semaphores = config.semaphores.len(),
            "Simulation engine built"
        );
        Ok(engine)
    }
}
