/*!
 * OS Simulator - Headless Driver
 *
 * Builds an engine from the environment, seeds a small mixed workload, and
 * advances the clock on a fixed interval until every process has finished.
 */

use os_sim_kernel::core::limits::{DEFAULT_MAX_TICKS, DEFAULT_TICK_INTERVAL_MS};
use os_sim_kernel::{
    init_tracing, ProcessSpec, ProcessState, SharedSimulation, SimulationConfig,
    SimulationEngine,
};
use std::time::Duration;
use tracing::{info, warn};

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn seed_workload(sim: &SharedSimulation) -> anyhow::Result<()> {
    let workload = [
        ProcessSpec::new(8, 1).with_burst(6).with_io("disk", 2),
        ProcessSpec::new(5, 2).with_burst(8),
        ProcessSpec::new(2, 1).with_burst(4).with_io("printer", 3),
        ProcessSpec::new(9, 1).with_burst(3),
        ProcessSpec::new(4, 3).with_burst(7).with_io("network", 1),
        ProcessSpec::new(1, 1).with_burst(5),
    ];
    for spec in workload {
        let pid = sim.spawn(spec)?;
        info!(pid, "Seeded process");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("OS simulator starting...");
    info!("================================================");

    let config = SimulationConfig::from_env()?;
    let tick_ms = env_or("SIMULATOR_TICK_MS", DEFAULT_TICK_INTERVAL_MS);
    let max_ticks = env_or("SIMULATOR_MAX_TICKS", DEFAULT_MAX_TICKS);

    let engine = SimulationEngine::builder().with_config(config).build()?;
    info!(
        run_id = %engine.run_id(),
        policy = %engine.policy_name(),
        tick_ms,
        max_ticks,
        "Engine ready"
    );
    let sim = SharedSimulation::new(engine);
    seed_workload(&sim)?;

    let mut interval = tokio::time::interval(Duration::from_millis(tick_ms.max(1)));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                sim.tick();
                let snapshot = sim.snapshot();
                info!(
                    tick = snapshot.tick,
                    running = ?snapshot.running,
                    ready = snapshot.ready.len(),
                    blocked = snapshot.blocked.len(),
                    free_frames = snapshot.memory.free_frames,
                    "Tick complete"
                );
                if sim.all_terminated() {
                    info!(tick = snapshot.tick, "All processes terminated");
                    break;
                }
                if snapshot.tick >= max_ticks {
                    warn!(max_ticks, "Tick limit reached with live processes");
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received, stopping");
                break;
            }
        }
    }

    sim.with(|engine| {
        println!("{}", engine.report());
        let live = engine.processes().filter(|p| p.state != ProcessState::Terminated).count();
        println!("Live processes: {}", live);
        for entry in engine.journal().tail(10) {
            println!("{}", entry);
        }
    });

    info!("OS simulator stopped");
    Ok(())
}
