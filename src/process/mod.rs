/*!
 * Process Module
 * Process descriptors, the process table, and the resource gate
 */

pub mod registry;
pub mod resources;
pub mod types;

// Re-export for convenience
pub use registry::ProcessTable;
pub use resources::{DeviceToken, ReleaseStats, ResourceGate};
pub use types::{
    IoBurst, ProcessDescriptor, ProcessSpec, ProcessState, ResourceHandle, SchedulingMetadata,
};
