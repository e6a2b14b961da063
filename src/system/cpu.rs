use std::thread;
use std::time::Duration;

use serde::Serialize;

use super::counters::{CpuLine, ProcessCounterSnapshot, SystemCounterSnapshot, read_cpu_counters};
use super::error::SampleError;
use super::source::ProcContext;

pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// How long to wait between the two readings of a system-wide sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingPolicy {
    pub interval: Duration,
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        SamplingPolicy {
            interval: DEFAULT_SAMPLE_INTERVAL,
        }
    }
}

impl SamplingPolicy {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// No pause between readings.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }

    fn pause(&self) {
        if !self.interval.is_zero() {
            thread::sleep(self.interval);
        }
    }
}

/// Busy share of the ticks that elapsed between two readings, in `[0, 1]`.
pub fn utilization(
    before: &SystemCounterSnapshot,
    after: &SystemCounterSnapshot,
) -> Result<f64, SampleError> {
    let total_delta = after.total_time.saturating_sub(before.total_time);
    if total_delta == 0 {
        return Err(SampleError::DivisionByZero);
    }
    let busy_delta = after
        .busy_time()
        .saturating_sub(before.busy_time())
        .min(total_delta);
    Ok(busy_delta as f64 / total_delta as f64)
}

/// System-wide utilization from one sampling window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuUsage {
    pub aggregate: f64,
    /// One entry per core present in both readings, ordered by core index.
    /// `None` when that core accounted no ticks during the window.
    pub per_core: Vec<(u32, Option<f64>)>,
}

/// Pair up two cpu-line readings and derive a ratio per line.
pub fn usage_between(
    before: &[(CpuLine, SystemCounterSnapshot)],
    after: &[(CpuLine, SystemCounterSnapshot)],
) -> Result<CpuUsage, SampleError> {
    let find = |lines: &[(CpuLine, SystemCounterSnapshot)], wanted: CpuLine| {
        lines.iter().find(|(cpu, _)| *cpu == wanted).map(|(_, s)| *s)
    };

    let (Some(agg_before), Some(agg_after)) = (
        find(before, CpuLine::Aggregate),
        find(after, CpuLine::Aggregate),
    ) else {
        return Err(SampleError::parse("stat", "no aggregate cpu line"));
    };
    let aggregate = utilization(&agg_before, &agg_after)?;

    let mut per_core: Vec<(u32, Option<f64>)> = after
        .iter()
        .filter_map(|(cpu, snap_after)| match cpu {
            CpuLine::Core(index) => find(before, *cpu)
                .map(|snap_before| (*index, utilization(&snap_before, snap_after).ok())),
            CpuLine::Aggregate => None,
        })
        .collect();
    per_core.sort_by_key(|(index, _)| *index);

    Ok(CpuUsage {
        aggregate,
        per_core,
    })
}

/// Read `/proc/stat`, wait for the policy interval, read again.
///
/// Blocks the calling thread for `policy.interval`.
pub fn sample_cpu(ctx: &ProcContext, policy: SamplingPolicy) -> Result<CpuUsage, SampleError> {
    let before = read_cpu_counters(ctx)?;
    policy.pause();
    let after = read_cpu_counters(ctx)?;
    usage_between(&before, &after)
}

/// Seconds a process has existed, given system uptime.
pub fn process_age_seconds(
    counters: &ProcessCounterSnapshot,
    uptime_secs: f64,
    ticks_per_second: u64,
) -> Result<f64, SampleError> {
    if ticks_per_second == 0 {
        return Err(SampleError::DivisionByZero);
    }
    Ok(uptime_secs - counters.start_time_ticks as f64 / ticks_per_second as f64)
}

/// Average CPU share of a process over its whole lifetime.
///
/// Unbounded above: a multi-threaded process on several cores can exceed 1.0.
pub fn process_utilization(
    pid: u32,
    counters: &ProcessCounterSnapshot,
    uptime_secs: f64,
    ticks_per_second: u64,
) -> Result<f64, SampleError> {
    let age = process_age_seconds(counters, uptime_secs, ticks_per_second)?;
    if age <= 0.0 {
        return Err(SampleError::InvalidProcessAge { pid });
    }
    let total_ticks = counters
        .total_ticks()
        .ok_or_else(|| SampleError::parse(format!("{pid}/stat"), "cpu tick counts overflow"))?;
    let cpu_secs = total_ticks as f64 / ticks_per_second as f64;
    Ok(cpu_secs / age)
}
