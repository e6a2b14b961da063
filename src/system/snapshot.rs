use serde::Serialize;

use super::cpu::CpuUsage;
use super::process::ProcessRow;

/// Everything sampled in one refresh cycle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemSnapshot {
    pub os_name: Option<String>,
    pub kernel: Option<String>,
    pub cpu: Option<CpuUsage>,
    pub memory_utilization: Option<f64>,
    pub uptime_secs: Option<u64>,
    pub total_processes: Option<u64>,
    pub running_processes: Option<u64>,
    pub processes: Vec<ProcessRow>,
}
