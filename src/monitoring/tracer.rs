/*!
 * Structured Tracing
 * Subscriber setup and per-tick spans using the tracing crate
 */

use crate::core::types::{Pid, Tick};
use std::time::Instant;
use tracing::{debug, span, warn, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - SIMULATOR_TRACE_JSON: Enable JSON output (default: false)
///
/// Returns false if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("SIMULATOR_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_span_events(FmtSpan::NONE)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if installed {
        debug!(json = use_json, "Structured tracing initialized");
    }
    installed
}

/// Span covering one simulation tick
///
/// Records how many processes each phase touched and warns when a tick takes
/// unusually long in wall-clock time.
pub struct TickSpan {
    span: Span,
    start: Instant,
    tick: Tick,
}

impl TickSpan {
    pub fn new(run_id: &Uuid, tick: Tick) -> Self {
        let span = span!(
            Level::DEBUG,
            "tick",
            run_id = %run_id,
            tick,
            admitted = tracing::field::Empty,
            blocked = tracing::field::Empty,
            unblocked = tracing::field::Empty,
            dispatched = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );
        Self {
            span,
            start: Instant::now(),
            tick,
        }
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }

    pub fn record_admitted(&self, count: usize) {
        self.span.record("admitted", count);
    }

    pub fn record_blocked(&self, blocked: bool) {
        self.span.record("blocked", blocked);
    }

    pub fn record_unblocked(&self, count: usize) {
        self.span.record("unblocked", count);
    }

    pub fn record_dispatched(&self, pid: Option<Pid>) {
        if let Some(pid) = pid {
            self.span.record("dispatched", pid);
        }
    }
}

impl Drop for TickSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.span.record("duration_us", duration.as_micros() as u64);
        let _entered = self.span.enter();
        if duration.as_millis() > 10 {
            warn!(
                tick = self.tick,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow tick detected"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing();
        assert!(!init_tracing());
    }

    #[test]
    fn test_tick_span_records_without_subscriber() {
        let span = TickSpan::new(&Uuid::new_v4(), 3);
        span.record_admitted(2);
        span.record_blocked(false);
        span.record_unblocked(0);
        span.record_dispatched(Some(1));
        drop(span);
    }
}
