use super::error::SampleError;
use super::source::ProcContext;

/// `PRETTY_NAME` from os-release, without quotes.
pub fn os_pretty_name(ctx: &ProcContext) -> Result<String, SampleError> {
    let contents = ctx.read(&ctx.paths.os_release)?;
    contents
        .lines()
        .find_map(|line| line.strip_prefix("PRETTY_NAME="))
        .map(|value| value.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
        .ok_or_else(|| SampleError::parse("os-release", "missing PRETTY_NAME"))
}

/// Kernel release, the third token of `/proc/version`.
pub fn kernel_release(ctx: &ProcContext) -> Result<String, SampleError> {
    let contents = ctx.read(&ctx.paths.version())?;
    contents
        .split_whitespace()
        .nth(2)
        .map(str::to_string)
        .ok_or_else(|| SampleError::parse("version", "fewer than three tokens"))
}

/// Share of physical memory in use, `(MemTotal - MemFree) / MemTotal`.
pub fn memory_utilization(ctx: &ProcContext) -> Result<f64, SampleError> {
    let contents = ctx.read(&ctx.paths.meminfo())?;
    let total = meminfo_kb(&contents, "MemTotal")?;
    let free = meminfo_kb(&contents, "MemFree")?;
    if total == 0 {
        return Err(SampleError::DivisionByZero);
    }
    Ok(total.saturating_sub(free) as f64 / total as f64)
}

fn meminfo_kb(contents: &str, key: &str) -> Result<u64, SampleError> {
    contents
        .lines()
        .find_map(|line| {
            let (name, rest) = line.split_once(':')?;
            (name == key).then_some(rest)
        })
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|kb| kb.parse().ok())
        .ok_or_else(|| SampleError::parse("meminfo", format!("missing or bad {key}")))
}

/// Seconds since boot, first field of `/proc/uptime`.
pub fn system_uptime(ctx: &ProcContext) -> Result<f64, SampleError> {
    let contents = ctx.read(&ctx.paths.uptime())?;
    contents
        .split_whitespace()
        .next()
        .and_then(|secs| secs.parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .ok_or_else(|| SampleError::parse("uptime", format!("bad uptime {:?}", contents.trim())))
}

/// Processes created since boot (`processes` in `/proc/stat`).
pub fn total_processes(ctx: &ProcContext) -> Result<u64, SampleError> {
    stat_counter(ctx, "processes")
}

/// Processes currently runnable (`procs_running` in `/proc/stat`).
pub fn running_processes(ctx: &ProcContext) -> Result<u64, SampleError> {
    stat_counter(ctx, "procs_running")
}

fn stat_counter(ctx: &ProcContext, key: &str) -> Result<u64, SampleError> {
    let contents = ctx.read(&ctx.paths.stat())?;
    contents
        .lines()
        .find_map(|line| {
            let mut tokens = line.split_whitespace();
            (tokens.next() == Some(key)).then(|| tokens.next())?
        })
        .and_then(|value| value.parse().ok())
        .ok_or_else(|| SampleError::parse("stat", format!("missing or bad {key}")))
}

/// Pids currently listed under the proc root, ascending.
///
/// Failing to list the root means the kernel interface is unavailable.
pub fn pids(ctx: &ProcContext) -> Result<Vec<u32>, SampleError> {
    let mut pids: Vec<u32> = ctx
        .list_dir(&ctx.paths.proc_root)?
        .iter()
        .filter(|name| name.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|name| name.parse().ok())
        .collect();
    pids.sort_unstable();
    Ok(pids)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::system::source::{MemorySource, ProcPaths};

    fn ctx(source: MemorySource) -> ProcContext {
        ProcContext::new(Arc::new(source), ProcPaths::default(), 100)
    }

    fn host() -> MemorySource {
        MemorySource::new()
            .with_file(
                "/etc/os-release",
                "NAME=\"Debian GNU/Linux\"\nPRETTY_NAME=\"Debian GNU/Linux 12 (bookworm)\"\nID=debian\n",
            )
            .with_file(
                "/proc/version",
                "Linux version 6.1.0-18-amd64 (debian-kernel@lists.debian.org) #1 SMP\n",
            )
            .with_file(
                "/proc/meminfo",
                "MemTotal:       16000000 kB\nMemFree:         4000000 kB\nMemAvailable:    9000000 kB\n",
            )
            .with_file("/proc/uptime", "3661.52 7000.10\n")
            .with_file(
                "/proc/stat",
                "cpu 1 1 1 1 1 1 1 0 0 0\nprocesses 8123\nprocs_running 4\nprocs_blocked 0\n",
            )
            .with_file("/proc/1/stat", "")
            .with_file("/proc/42/stat", "")
            .with_file("/proc/7/stat", "")
            .with_file("/proc/self/stat", "")
    }

    #[test]
    fn host_facts() {
        let ctx = ctx(host());
        assert_eq!(os_pretty_name(&ctx).unwrap(), "Debian GNU/Linux 12 (bookworm)");
        assert_eq!(kernel_release(&ctx).unwrap(), "6.1.0-18-amd64");
        assert!((memory_utilization(&ctx).unwrap() - 0.75).abs() < 1e-9);
        assert!((system_uptime(&ctx).unwrap() - 3661.52).abs() < 1e-9);
        assert_eq!(total_processes(&ctx).unwrap(), 8123);
        assert_eq!(running_processes(&ctx).unwrap(), 4);
    }

    #[test]
    fn pids_are_numeric_and_sorted() {
        assert_eq!(pids(&ctx(host())).unwrap(), vec![1, 7, 42]);
    }

    #[test]
    fn missing_proc_root_escalates() {
        assert!(matches!(
            pids(&ctx(MemorySource::new())),
            Err(SampleError::NotFound(_))
        ));
    }

    #[test]
    fn zero_mem_total_is_division_by_zero() {
        let source = MemorySource::new().with_file("/proc/meminfo", "MemTotal: 0 kB\nMemFree: 0 kB\n");
        assert_eq!(memory_utilization(&ctx(source)), Err(SampleError::DivisionByZero));
    }

    #[test]
    fn missing_stat_key_is_parse_error() {
        let source = MemorySource::new().with_file("/proc/stat", "cpu 1 1 1 1 1 1 1\n");
        assert!(matches!(
            running_processes(&ctx(source)),
            Err(SampleError::Parse { .. })
        ));
    }

    #[test]
    fn garbage_uptime_is_parse_error() {
        let source = MemorySource::new().with_file("/proc/uptime", "soon\n");
        assert!(system_uptime(&ctx(source)).is_err());
    }
}
