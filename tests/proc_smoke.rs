#![cfg(target_os = "linux")]

use std::time::Duration;

use procpulse::system::cpu::{SamplingPolicy, sample_cpu};
use procpulse::system::metadata::resolve;
use procpulse::system::{Collector, ProcContext, ProcPaths, host};

fn live_context() -> ProcContext {
    ProcContext::from_host(ProcPaths::default()).expect("clock tick rate available")
}

#[test]
fn current_process_resolves() {
    let ctx = live_context();
    let pid = std::process::id();
    let uptime = host::system_uptime(&ctx).unwrap();

    let resolved = resolve(&ctx, pid, Some(uptime));
    assert!(!resolved.vanished());
    assert!(resolved.command.unwrap().contains("proc_smoke"));
    assert!(resolved.resident_kb.unwrap() > 0);
    assert!(resolved.counters.is_ok());
}

#[test]
fn live_cpu_sample_is_a_ratio() {
    let ctx = live_context();
    let usage = sample_cpu(&ctx, SamplingPolicy::new(Duration::from_millis(200))).unwrap();
    assert!((0.0..=1.0).contains(&usage.aggregate));
    assert!(!usage.per_core.is_empty());
}

#[test]
fn live_refresh_lists_this_process() {
    let collector = Collector::new(
        live_context(),
        SamplingPolicy::new(Duration::from_millis(50)),
    );
    let snapshot = collector.refresh().unwrap();
    let pid = std::process::id();

    assert!(snapshot.processes.iter().any(|row| row.pid == pid));
    assert!(snapshot.kernel.is_some());
    assert!(snapshot.uptime_secs.is_some());
}

#[test]
fn missing_proc_root_escalates() {
    let paths = ProcPaths {
        proc_root: "/nonexistent/proc".into(),
        ..ProcPaths::default()
    };
    let collector = Collector::new(
        ProcContext::from_host(paths).unwrap(),
        SamplingPolicy::immediate(),
    );
    assert!(collector.refresh().is_err());
}
