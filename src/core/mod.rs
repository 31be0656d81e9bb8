/*!
 * Core Module
 * Fundamental simulator types, configuration, and error handling
 */

pub mod config;
pub mod errors;
pub mod id;
pub mod limits;
pub mod sync;
pub mod types;

// Re-export for convenience
pub use config::{MemoryConfig, PolicyConfig, SimulationConfig};
pub use errors::*;
pub use id::PidAllocator;
pub use types::*;
