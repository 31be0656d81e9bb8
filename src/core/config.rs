/*!
 * Simulation Configuration
 *
 * Serde-backed configuration with defaults, JSON and environment sources
 */

use super::errors::SimulationError;
use super::limits::{
    CPU_SEMAPHORE, DEFAULT_BURST, DEFAULT_DEVICES, DEFAULT_FRAME_COUNT, DEFAULT_FRAME_SIZE_KB,
    DEFAULT_RR_QUANTUM, DEFAULT_SEMAPHORE_VALUE, HIGH_TIER_QUANTUM, IO_SEMAPHORE,
    LOW_TIER_QUANTUM, MEDIUM_TIER_QUANTUM,
};
use super::types::{Kilobytes, SimResult};
use crate::scheduler::PolicyKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// Scheduling policy selection, chosen once at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyConfig {
    /// Single FIFO queue with a fixed quantum
    RoundRobin { quantum: u32 },
    /// Three fixed tiers, each with its own quantum
    MultilevelQueue { high: u32, medium: u32, low: u32 },
}

impl PolicyConfig {
    pub const fn round_robin(quantum: u32) -> Self {
        Self::RoundRobin { quantum }
    }

    pub const fn multilevel_queue() -> Self {
        Self::MultilevelQueue {
            high: HIGH_TIER_QUANTUM,
            medium: MEDIUM_TIER_QUANTUM,
            low: LOW_TIER_QUANTUM,
        }
    }

    /// Default configuration for a policy kind
    pub const fn for_kind(kind: PolicyKind) -> Self {
        match kind {
            PolicyKind::RoundRobin => Self::round_robin(DEFAULT_RR_QUANTUM),
            PolicyKind::MultilevelQueue => Self::multilevel_queue(),
        }
    }

    pub const fn kind(&self) -> PolicyKind {
        match self {
            Self::RoundRobin { .. } => PolicyKind::RoundRobin,
            Self::MultilevelQueue { .. } => PolicyKind::MultilevelQueue,
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::round_robin(DEFAULT_RR_QUANTUM)
    }
}

/// Physical memory layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub frame_count: usize,
    pub frame_size_kb: Kilobytes,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            frame_count: DEFAULT_FRAME_COUNT,
            frame_size_kb: DEFAULT_FRAME_SIZE_KB,
        }
    }
}

/// Complete simulator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub policy: PolicyConfig,
    pub memory: MemoryConfig,
    pub devices: Vec<String>,
    pub semaphores: Vec<(String, i64)>,
    pub default_burst: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            policy: PolicyConfig::default(),
            memory: MemoryConfig::default(),
            devices: DEFAULT_DEVICES.iter().map(|d| d.to_string()).collect(),
            semaphores: vec![
                (CPU_SEMAPHORE.to_string(), DEFAULT_SEMAPHORE_VALUE),
                (IO_SEMAPHORE.to_string(), DEFAULT_SEMAPHORE_VALUE),
            ],
            default_burst: DEFAULT_BURST,
        }
    }
}

impl SimulationConfig {
    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_memory(mut self, frame_count: usize, frame_size_kb: Kilobytes) -> Self {
        self.memory = MemoryConfig {
            frame_count,
            frame_size_kb,
        };
        self
    }

    pub fn with_devices<I, S>(mut self, devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.devices = devices.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default_burst(mut self, burst: u32) -> Self {
        self.default_burst = burst;
        self
    }

    /// Parse a JSON document; missing fields fall back to defaults
    pub fn from_json_str(json: &str) -> SimResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SimulationError::InvalidConfig(format!("malformed JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SimulationError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json_str(&contents)?;
        info!(path = %path.display(), "Loaded simulation configuration");
        Ok(config)
    }

    /// Build configuration from environment variables
    ///
    /// Environment variables:
    /// - SIMULATOR_CONFIG: JSON file used as the base (default: built-in defaults)
    /// - SIMULATOR_POLICY: rr | round_robin | mlq | multilevel
    /// - SIMULATOR_QUANTUM: round-robin quantum
    /// - SIMULATOR_FRAMES: number of physical frames
    /// - SIMULATOR_FRAME_SIZE_KB: frame size in KB
    pub fn from_env() -> SimResult<Self> {
        let mut config = match std::env::var("SIMULATOR_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };

        if let Ok(policy) = std::env::var("SIMULATOR_POLICY") {
            let kind = PolicyKind::from_str(&policy).map_err(SimulationError::InvalidConfig)?;
            if kind != config.policy.kind() {
                config.policy = PolicyConfig::for_kind(kind);
            }
        }

        if let Some(quantum) = env_number::<u32>("SIMULATOR_QUANTUM")? {
            match config.policy {
                PolicyConfig::RoundRobin { .. } => {
                    config.policy = PolicyConfig::round_robin(quantum);
                }
                PolicyConfig::MultilevelQueue { .. } => {
                    warn!(quantum, "SIMULATOR_QUANTUM ignored: multilevel tiers use fixed quanta");
                }
            }
        }

        if let Some(frames) = env_number::<usize>("SIMULATOR_FRAMES")? {
            config.memory.frame_count = frames;
        }
        if let Some(size) = env_number::<usize>("SIMULATOR_FRAME_SIZE_KB")? {
            config.memory.frame_size_kb = size;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> SimResult<()> {
        match self.policy {
            PolicyConfig::RoundRobin { quantum } if quantum == 0 => {
                return Err(SimulationError::InvalidConfig(
                    "round-robin quantum must be at least 1".into(),
                ));
            }
            PolicyConfig::MultilevelQueue { high, medium, low }
                if high == 0 || medium == 0 || low == 0 =>
            {
                return Err(SimulationError::InvalidConfig(
                    "every multilevel tier quantum must be at least 1".into(),
                ));
            }
            _ => {}
        }

        if self.memory.frame_count == 0 {
            return Err(SimulationError::InvalidConfig(
                "frame count must be at least 1".into(),
            ));
        }
        if self.memory.frame_size_kb == 0 {
            return Err(SimulationError::InvalidConfig(
                "frame size must be at least 1 KB".into(),
            ));
        }
        if self.default_burst == 0 {
            return Err(SimulationError::InvalidConfig(
                "default burst must be at least 1 tick".into(),
            ));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = self.devices.iter().find(|d| !seen.insert(d.as_str())) {
            return Err(SimulationError::InvalidConfig(format!(
                "duplicate device '{}'",
                dup
            )));
        }

        let mut seen = HashSet::new();
        if let Some((dup, _)) = self.semaphores.iter().find(|(n, _)| !seen.insert(n.as_str())) {
            return Err(SimulationError::InvalidConfig(format!(
                "duplicate semaphore '{}'",
                dup
            )));
        }

        Ok(())
    }
}

fn env_number<T: std::str::FromStr>(key: &str) -> SimResult<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| SimulationError::InvalidConfig(format!("{} is not a number: {}", key, raw))),
        Err(_) => Ok(None),
    }
}
