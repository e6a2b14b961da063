use serde::Serialize;

use super::error::SampleError;
use super::source::ProcContext;

/// Ignorable fields before `utime` in a `/proc/<pid>/stat` record.
const STAT_PREFIX_FIELDS: usize = 13;
/// Ignorable fields between `cstime` and `starttime`.
const STAT_GAP_FIELDS: usize = 4;
const STAT_UTIME: usize = STAT_PREFIX_FIELDS;
const STAT_STARTTIME: usize = STAT_UTIME + 4 + STAT_GAP_FIELDS;

/// Aggregate tick counts of one `cpu` line of `/proc/stat`.
///
/// `steal`, `guest` and `guest_nice` are not part of `total_time`. They are
/// read but left out of the denominator of the utilization ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SystemCounterSnapshot {
    pub idle_time: u64,
    pub total_time: u64,
}

impl SystemCounterSnapshot {
    /// Ticks spent outside idle and iowait.
    pub fn busy_time(&self) -> u64 {
        self.total_time.saturating_sub(self.idle_time)
    }
}

/// Scheduler accounting of one process, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProcessCounterSnapshot {
    pub utime: u64,
    pub stime: u64,
    pub cutime: u64,
    pub cstime: u64,
    pub start_time_ticks: u64,
}

impl ProcessCounterSnapshot {
    /// Own plus reaped-children CPU time, `None` if the sum does not fit.
    pub fn total_ticks(&self) -> Option<u64> {
        self.utime
            .checked_add(self.stime)?
            .checked_add(self.cutime)?
            .checked_add(self.cstime)
    }
}

/// Which `cpu` line a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CpuLine {
    Aggregate,
    Core(u32),
}

impl CpuLine {
    fn from_label(label: &str) -> Option<Self> {
        let suffix = label.strip_prefix("cpu")?;
        if suffix.is_empty() {
            Some(CpuLine::Aggregate)
        } else {
            suffix.parse().ok().map(CpuLine::Core)
        }
    }
}

/// Parse one line of `/proc/stat`.
///
/// Lines whose first token does not start with `cpu` are not cpu lines and
/// yield `Ok(None)`.
pub fn try_parse_cpu_line(line: &str) -> Result<Option<(CpuLine, SystemCounterSnapshot)>, SampleError> {
    let mut tokens = line.split_whitespace();
    let Some(label) = tokens.next() else {
        return Ok(None);
    };
    if !label.starts_with("cpu") {
        return Ok(None);
    }
    let cpu = CpuLine::from_label(label)
        .ok_or_else(|| SampleError::parse("stat", format!("unrecognized cpu label {label:?}")))?;

    // user nice system idle iowait irq softirq steal guest guest_nice
    let mut fields = [0u64; 10];
    let mut count = 0;
    for (slot, token) in fields.iter_mut().zip(tokens) {
        *slot = token
            .parse()
            .map_err(|_| SampleError::parse("stat", format!("{label}: bad tick count {token:?}")))?;
        count += 1;
    }
    // Kernels before 2.6.11 stop after softirq.
    if count < 7 {
        return Err(SampleError::parse(
            "stat",
            format!("{label}: expected at least 7 tick fields, found {count}"),
        ));
    }

    let [user, nice, system, idle, iowait, irq, softirq, ..] = fields;
    let overflow = || SampleError::parse("stat", format!("{label}: tick counts overflow"));
    let idle_time = idle.checked_add(iowait).ok_or_else(overflow)?;
    let total_time = [user, nice, system, irq, softirq]
        .into_iter()
        .try_fold(idle_time, u64::checked_add)
        .ok_or_else(overflow)?;
    Ok(Some((cpu, SystemCounterSnapshot { idle_time, total_time })))
}

/// Parse the leading block of cpu lines of `/proc/stat`.
///
/// Reading stops at the first line that is not a cpu line; a malformed cpu
/// line fails the whole read.
pub fn parse_cpu_stat(contents: &str) -> Result<Vec<(CpuLine, SystemCounterSnapshot)>, SampleError> {
    let mut out = Vec::new();
    for line in contents.lines() {
        match try_parse_cpu_line(line)? {
            Some(entry) => out.push(entry),
            None => break,
        }
    }
    if !out.iter().any(|(cpu, _)| *cpu == CpuLine::Aggregate) {
        return Err(SampleError::parse("stat", "no aggregate cpu line"));
    }
    Ok(out)
}

/// Parse a `/proc/<pid>/stat` record.
pub fn parse_process_stat(pid: u32, record: &str) -> Result<ProcessCounterSnapshot, SampleError> {
    let source_name = format!("{pid}/stat");
    let tokens = stat_tokens(record);
    if tokens.len() <= STAT_STARTTIME {
        return Err(SampleError::parse(
            source_name,
            format!("expected {} fields, found {}", STAT_STARTTIME + 1, tokens.len()),
        ));
    }

    let field = |index: usize, name: &str| -> Result<u64, SampleError> {
        tokens[index]
            .parse()
            .map_err(|_| SampleError::parse(&source_name, format!("bad {name} {:?}", tokens[index])))
    };

    let snapshot = ProcessCounterSnapshot {
        utime: field(STAT_UTIME, "utime")?,
        stime: field(STAT_UTIME + 1, "stime")?,
        cutime: field(STAT_UTIME + 2, "cutime")?,
        cstime: field(STAT_UTIME + 3, "cstime")?,
        start_time_ticks: field(STAT_STARTTIME, "starttime")?,
    };
    if snapshot.total_ticks().is_none() {
        return Err(SampleError::parse(source_name, "cpu tick counts overflow"));
    }
    Ok(snapshot)
}

/// Split a stat record into positional tokens.
///
/// `comm` is wrapped in parentheses and may itself contain spaces or `)`, so
/// everything up to the last `)` counts as the two leading fields.
fn stat_tokens(record: &str) -> Vec<&str> {
    let record = record.trim_end();
    match (record.find('('), record.rfind(')')) {
        (Some(open), Some(close)) if open < close => {
            let mut tokens = vec![record[..open].trim(), &record[open..=close]];
            tokens.extend(record[close + 1..].split_whitespace());
            tokens
        }
        _ => record.split_whitespace().collect(),
    }
}

/// Read every cpu line of `/proc/stat`.
pub fn read_cpu_counters(ctx: &ProcContext) -> Result<Vec<(CpuLine, SystemCounterSnapshot)>, SampleError> {
    let contents = ctx.read(&ctx.paths.stat())?;
    parse_cpu_stat(&contents)
}

pub fn read_process_counters(ctx: &ProcContext, pid: u32) -> Result<ProcessCounterSnapshot, SampleError> {
    let record = ctx.read(&ctx.paths.pid_file(pid, "stat"))?;
    parse_process_stat(pid, &record)
}
