/*!
 * Synchronization Primitives
 *
 * Counting semaphores for cooperative, tick-driven process synchronization.
 * Blocking here is bookkeeping only: a blocked process is a state label that
 * the engine applies, never a parked thread.
 */

mod semaphore;

pub use semaphore::{Semaphore, SemaphoreSnapshot, WaitOutcome};
