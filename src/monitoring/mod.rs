/*!
 * Monitoring
 * Structured tracing and the shared event journal
 */

mod journal;
mod tracer;

pub use journal::{Journal, JournalEntry};
pub use tracer::{init_tracing, TickSpan};
