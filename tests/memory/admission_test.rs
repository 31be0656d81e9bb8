/*!
 * Admission Under Memory Pressure
 * Processes wait in NEW until frames free up
 */

use os_sim_kernel::{ProcessSpec, ProcessState, SimulationConfig, SimulationEngine};
use pretty_assertions::assert_eq;

#[test]
fn test_waits_in_new_until_memory_frees() {
    let mut engine = SimulationEngine::default();
    let hog = engine.spawn(ProcessSpec::new(5, 3).with_burst(2)).unwrap();
    let waiter = engine.spawn(ProcessSpec::new(5, 2).with_burst(1)).unwrap();

    engine.tick();
    assert_eq!(engine.process(hog).unwrap().state, ProcessState::Running);
    assert_eq!(engine.process(waiter).unwrap().state, ProcessState::New);
    assert_eq!(engine.memory_stats().free_frames, 4);

    engine.tick();
    engine.tick(); // hog finishes, its frames return to the pool
    assert_eq!(engine.process(hog).unwrap().state, ProcessState::Terminated);
    assert_eq!(engine.process(waiter).unwrap().state, ProcessState::New);

    engine.tick(); // admitted on the next admission phase
    assert_eq!(engine.process(waiter).unwrap().state, ProcessState::Running);
    assert_eq!(engine.memory_stats().free_frames, 8);
}

#[test]
fn test_oversized_demand_stays_new() {
    let mut engine = SimulationEngine::default();
    let huge = engine.add_process(5, usize::MAX / 512, vec![]).unwrap();
    let small = engine.add_process(5, 1, vec![]).unwrap();

    engine.tick();
    engine.tick();
    assert_eq!(engine.process(huge).unwrap().state, ProcessState::New);
    assert!(engine.process(huge).unwrap().resources.is_empty());
    assert_ne!(engine.process(small).unwrap().state, ProcessState::New);
    assert_eq!(engine.memory_stats().free_frames, 12);
}

#[test]
fn test_zero_megabyte_process_needs_no_frames() {
    let mut engine = SimulationEngine::default();
    let pid = engine.add_process(5, 0, vec![]).unwrap();
    engine.tick();
    assert_eq!(engine.process(pid).unwrap().state, ProcessState::Running);
    assert_eq!(engine.memory_stats().free_frames, 16);
}

#[test]
fn test_custom_geometry() {
    let config = SimulationConfig::default().with_memory(4, 512);
    let mut engine = SimulationEngine::new(config).unwrap();
    let pid = engine.add_process(5, 1, vec![]).unwrap();
    engine.tick();

    let owned = engine
        .memory_map()
        .iter()
        .filter(|m| m.owner.map(|(p, _)| p) == Some(pid))
        .count();
    assert_eq!(owned, 2);
    assert_eq!(engine.memory_stats().total_kb, 2048);
}

#[test]
fn test_cpu_token_minted_at_admission() {
    let mut engine = SimulationEngine::default();
    let pid = engine.add_process(5, 1, vec![]).unwrap();
    assert!(engine.process(pid).unwrap().resources.is_empty());
    engine.tick();
    assert_eq!(
        engine.process(pid).unwrap().resources,
        vec![os_sim_kernel::process::ResourceHandle::Cpu(format!("CPU-{}", pid))]
    );
}
