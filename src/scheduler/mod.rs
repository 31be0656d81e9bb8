/*!
 * Scheduler Module
 * Ready-queue policies and policy selection
 */

mod bookkeeping;
pub mod multilevel;
pub mod round_robin;
pub mod traits;
pub mod types;

// Re-export public API
pub use multilevel::MultilevelQueue;
pub use round_robin::RoundRobin;
pub use traits::SchedulingPolicy;
pub use types::{CompletionRecord, PolicyKind, SchedulingReport, Tier};

use crate::core::config::PolicyConfig;
use tracing::info;

/// Construct the configured policy
///
/// The concrete type is chosen here once; the engine only ever sees the trait.
pub fn build_policy(config: &PolicyConfig, default_burst: u32) -> Box<dyn SchedulingPolicy> {
    let policy: Box<dyn SchedulingPolicy> = match *config {
        PolicyConfig::RoundRobin { quantum } => {
            Box::new(RoundRobin::with_default_burst(quantum, default_burst))
        }
        PolicyConfig::MultilevelQueue { high, medium, low } => Box::new(
            MultilevelQueue::with_default_burst(high, medium, low, default_burst),
        ),
    };
    info!(policy = %policy.describe(), "Scheduling policy selected");
    policy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_policy_matches_config() {
        let rr = build_policy(&PolicyConfig::round_robin(3), 5);
        assert_eq!(rr.kind(), PolicyKind::RoundRobin);
        assert_eq!(rr.describe(), "Round Robin (quantum=3)");

        let mlq = build_policy(&PolicyConfig::multilevel_queue(), 5);
        assert_eq!(mlq.kind(), PolicyKind::MultilevelQueue);
    }
}
