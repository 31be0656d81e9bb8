/*!
 * Policy Bookkeeping
 * Metadata initialization and completion recording shared by all policies
 */

use super::types::{CompletionRecord, Tier};
use crate::core::types::Tick;
use crate::process::{ProcessDescriptor, ProcessState, SchedulingMetadata};
use tracing::info;

/// Attach scheduling metadata on first admission; later admissions keep it
pub(super) fn initialize(
    process: &mut ProcessDescriptor,
    now: Tick,
    default_burst: u32,
    quantum: u32,
    tier: Option<Tier>,
) {
    if process.scheduling.is_some() {
        return;
    }
    let burst = process.requested_burst.unwrap_or(default_burst).max(1);
    let mut meta = SchedulingMetadata::new(now, burst, quantum);
    meta.tier = tier;
    process.scheduling = Some(meta);
}

/// Terminate the process and append its completion record
pub(super) fn finish(
    process: &mut ProcessDescriptor,
    now: Tick,
    completed: &mut Vec<CompletionRecord>,
) {
    process.state = ProcessState::Terminated;
    let (arrival, burst) = process
        .scheduling
        .as_ref()
        .map_or((process.created_tick, 0), |m| (m.arrival, m.burst));
    let record = CompletionRecord {
        pid: process.pid,
        arrival,
        burst,
        finish: now,
    };
    info!(
        pid = record.pid,
        finish = now,
        turnaround = record.turnaround(),
        waiting = record.waiting(),
        "Process finished"
    );
    completed.push(record);
}
