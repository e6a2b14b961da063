use tracing::{debug, trace};

use super::cpu::{SamplingPolicy, process_utilization, sample_cpu};
use super::error::SampleError;
use super::host;
use super::metadata::resolve;
use super::process::ProcessRow;
use super::snapshot::SystemSnapshot;
use super::source::ProcContext;

/// Produces one [`SystemSnapshot`] per refresh cycle.
///
/// Holds no sampling state between cycles, so clones are independent and can
/// be moved onto a blocking thread.
#[derive(Debug, Clone)]
pub struct Collector {
    ctx: ProcContext,
    policy: SamplingPolicy,
}

impl Collector {
    pub fn new(ctx: ProcContext, policy: SamplingPolicy) -> Self {
        Collector { ctx, policy }
    }

    /// Sample everything once. Blocks for the sampling interval.
    ///
    /// Per-field and per-row failures become `None`; only an unreadable proc
    /// root is returned as an error.
    pub fn refresh(&self) -> Result<SystemSnapshot, SampleError> {
        let _refresh_span = tracing::debug_span!("collector.refresh").entered();

        let cpu = sample_cpu(&self.ctx, self.policy)
            .inspect_err(|e| debug!(error = %e, "system cpu unavailable"))
            .ok();

        let pids = host::pids(&self.ctx)?;

        let uptime = host::system_uptime(&self.ctx)
            .inspect_err(|e| debug!(error = %e, "system uptime unavailable"))
            .ok();

        let processes: Vec<ProcessRow> = pids
            .iter()
            .filter_map(|&pid| self.refresh_process(pid, uptime))
            .collect();
        debug!(pids = pids.len(), rows = processes.len(), "refresh complete");

        Ok(SystemSnapshot {
            os_name: field("os_name", host::os_pretty_name(&self.ctx)),
            kernel: field("kernel", host::kernel_release(&self.ctx)),
            cpu,
            memory_utilization: field("memory", host::memory_utilization(&self.ctx)),
            uptime_secs: uptime.map(|secs| secs as u64),
            total_processes: field("total_processes", host::total_processes(&self.ctx)),
            running_processes: field("running_processes", host::running_processes(&self.ctx)),
            processes,
        })
    }

    /// Build the display row of one pid.
    ///
    /// Returns `None` only when the process exited before any of its files
    /// could be read; partial data still yields a row.
    pub fn refresh_process(&self, pid: u32, system_uptime: Option<f64>) -> Option<ProcessRow> {
        let resolved = resolve(&self.ctx, pid, system_uptime);
        if resolved.vanished() {
            trace!(pid, "process exited before it could be read");
            return None;
        }

        let cpu_ratio = match (&resolved.counters, system_uptime) {
            (Ok(counters), Some(uptime)) => {
                process_utilization(pid, counters, uptime, self.ctx.ticks_per_second)
                    .inspect_err(|e| trace!(pid, error = %e, "process cpu unavailable"))
                    .ok()
            }
            _ => None,
        };

        Some(ProcessRow {
            pid,
            user: row_field(pid, "user", resolved.user),
            command: row_field(pid, "command", resolved.command),
            resident_kb: row_field(pid, "resident_kb", resolved.resident_kb),
            cpu_ratio,
            uptime_secs: row_field(pid, "uptime", resolved.uptime_secs),
        })
    }
}

fn field<T>(name: &'static str, value: Result<T, SampleError>) -> Option<T> {
    value
        .inspect_err(|e| debug!(field = name, error = %e, "host field unavailable"))
        .ok()
}

fn row_field<T>(pid: u32, name: &'static str, value: Result<T, SampleError>) -> Option<T> {
    value
        .inspect_err(|e| trace!(pid, field = name, error = %e, "process field unavailable"))
        .ok()
}
