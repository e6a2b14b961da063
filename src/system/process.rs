use std::cmp::Ordering;

use serde::Serialize;

/// One display row. Every field that could not be sampled this cycle is
/// `None` rather than zero.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcessRow {
    pub pid: u32,
    pub user: Option<String>,
    pub command: Option<String>,
    pub resident_kb: Option<u64>,
    pub cpu_ratio: Option<f64>,
    pub uptime_secs: Option<u64>,
}

impl ProcessRow {
    pub fn empty(pid: u32) -> Self {
        ProcessRow {
            pid,
            user: None,
            command: None,
            resident_kb: None,
            cpu_ratio: None,
            uptime_secs: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Cpu,
    Memory,
    Pid,
    Uptime,
}

impl SortKey {
    pub fn next(self) -> Self {
        match self {
            SortKey::Cpu => SortKey::Memory,
            SortKey::Memory => SortKey::Pid,
            SortKey::Pid => SortKey::Uptime,
            SortKey::Uptime => SortKey::Cpu,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Cpu => "CPU",
            SortKey::Memory => "Memory",
            SortKey::Pid => "PID",
            SortKey::Uptime => "Uptime",
        }
    }

    pub fn from_str_config(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "memory" | "mem" => SortKey::Memory,
            "pid" => SortKey::Pid,
            "uptime" | "time" => SortKey::Uptime,
            _ => SortKey::Cpu,
        }
    }
}

/// Sort rows for display. Rows missing the sort field go last; ties and the
/// `Pid` key order by ascending pid.
pub fn sort_rows(rows: &mut [ProcessRow], key: SortKey) {
    rows.sort_by(|a, b| {
        let primary = match key {
            SortKey::Cpu => descending(a.cpu_ratio, b.cpu_ratio, |x, y| x.total_cmp(y)),
            SortKey::Memory => descending(a.resident_kb, b.resident_kb, Ord::cmp),
            SortKey::Uptime => descending(a.uptime_secs, b.uptime_secs, Ord::cmp),
            SortKey::Pid => Ordering::Equal,
        };
        primary.then(a.pid.cmp(&b.pid))
    });
}

fn descending<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&b, &a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
