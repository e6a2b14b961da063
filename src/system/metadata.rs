use serde::Serialize;

use super::counters::{ProcessCounterSnapshot, read_process_counters};
use super::cpu::process_age_seconds;
use super::error::SampleError;
use super::source::ProcContext;

/// Identity of one process with placeholders for whatever could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProcessIdentity {
    pub pid: u32,
    pub command: String,
    pub owning_user: String,
    pub resident_kb: u64,
}

/// Every identity field of one process, each resolved independently.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProcess {
    pub pid: u32,
    pub command: Result<String, SampleError>,
    pub uid: Result<u32, SampleError>,
    pub user: Result<String, SampleError>,
    pub resident_kb: Result<u64, SampleError>,
    pub uptime_secs: Result<u64, SampleError>,
    /// The stat record the uptime was derived from, kept for the CPU engine.
    pub counters: Result<ProcessCounterSnapshot, SampleError>,
}

impl ResolvedProcess {
    pub fn identity(&self) -> ProcessIdentity {
        ProcessIdentity {
            pid: self.pid,
            command: self.command.clone().unwrap_or_default(),
            owning_user: self.user.clone().unwrap_or_default(),
            resident_kb: self.resident_kb.clone().unwrap_or_default(),
        }
    }

    /// The process was gone by the time its files were read.
    pub fn vanished(&self) -> bool {
        [
            self.command.as_ref().err(),
            self.uid.as_ref().err(),
            self.resident_kb.as_ref().err(),
            self.counters.as_ref().err(),
        ]
        .into_iter()
        .all(|err| err.is_some_and(SampleError::is_vanished))
    }
}

/// Resolve every identity field of `pid`. Never fails as a whole.
///
/// `system_uptime` is `None` when `/proc/uptime` could not be read this cycle.
pub fn resolve(ctx: &ProcContext, pid: u32, system_uptime: Option<f64>) -> ResolvedProcess {
    let uid = uid(ctx, pid);
    let user = match &uid {
        Ok(uid) => user_name(ctx, *uid),
        Err(e) => Err(e.clone()),
    };
    let counters = read_process_counters(ctx, pid);
    let uptime_secs = match (&counters, system_uptime) {
        (Ok(counters), Some(system_uptime)) => {
            uptime_from_counters(pid, counters, system_uptime, ctx.ticks_per_second)
        }
        (Err(e), _) => Err(e.clone()),
        (Ok(_), None) => Err(SampleError::NotFound(ctx.paths.uptime())),
    };
    ResolvedProcess {
        pid,
        command: command(ctx, pid),
        uid,
        user,
        resident_kb: resident_kb(ctx, pid),
        uptime_secs,
        counters,
    }
}

/// Command line with NUL separators turned into spaces.
///
/// Kernel threads have an empty command line; that is a value, not an error.
pub fn command(ctx: &ProcContext, pid: u32) -> Result<String, SampleError> {
    let raw = ctx.read(&ctx.paths.pid_file(pid, "cmdline"))?;
    Ok(raw.replace('\0', " ").trim().to_string())
}

/// Resident set size in kB (`VmRSS`).
pub fn resident_kb(ctx: &ProcContext, pid: u32) -> Result<u64, SampleError> {
    let value = status_field(ctx, pid, "VmRSS:")?;
    value
        .split_whitespace()
        .next()
        .and_then(|kb| kb.parse().ok())
        .ok_or_else(|| SampleError::parse(format!("{pid}/status"), format!("bad VmRSS {value:?}")))
}

/// Real uid of the process owner.
pub fn uid(ctx: &ProcContext, pid: u32) -> Result<u32, SampleError> {
    let value = status_field(ctx, pid, "Uid:")?;
    value
        .split_whitespace()
        .next()
        .and_then(|uid| uid.parse().ok())
        .ok_or_else(|| SampleError::parse(format!("{pid}/status"), format!("bad Uid {value:?}")))
}

/// Map a uid to a login name via the passwd database.
pub fn user_name(ctx: &ProcContext, uid: u32) -> Result<String, SampleError> {
    let passwd = ctx.read(&ctx.paths.passwd)?;
    lookup_user(&passwd, uid).ok_or(SampleError::Unmapped(uid))
}

/// First passwd entry whose uid field matches.
pub fn lookup_user(passwd: &str, uid: u32) -> Option<String> {
    let wanted = uid.to_string();
    passwd.lines().find_map(|line| {
        let mut fields = line.split(':');
        let name = fields.next()?;
        let _password = fields.next()?;
        let entry_uid = fields.next()?;
        (entry_uid.trim() == wanted && !name.is_empty()).then(|| name.to_string())
    })
}

/// Whole seconds since the process started.
fn uptime_from_counters(
    pid: u32,
    counters: &ProcessCounterSnapshot,
    system_uptime: f64,
    ticks_per_second: u64,
) -> Result<u64, SampleError> {
    let age = process_age_seconds(counters, system_uptime, ticks_per_second)?;
    if age < 0.0 {
        return Err(SampleError::InvalidProcessAge { pid });
    }
    Ok(age as u64)
}

fn status_field(ctx: &ProcContext, pid: u32, key: &str) -> Result<String, SampleError> {
    let status = ctx.read(&ctx.paths.pid_file(pid, "status"))?;
    status
        .lines()
        .find_map(|line| line.strip_prefix(key))
        .map(|value| value.trim().to_string())
        .ok_or_else(|| SampleError::parse(format!("{pid}/status"), format!("missing {key}")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::system::source::{MemorySource, ProcPaths};

    const PASSWD: &str = "\
root:x:0:0:root:/root:/bin/bash
daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin
alice:x:1000:1000:Alice,,,:/home/alice:/bin/bash
shadow:x:1000:1000::/home/shadow:/bin/sh
";

    const STATUS: &str = "\
Name:\tbash
State:\tS (sleeping)
Uid:\t1000\t1000\t1000\t1000
Gid:\t1000\t1000\t1000\t1000
VmSize:\t   12000 kB
VmRSS:\t    5120 kB
Threads:\t1
";

    fn ctx(source: MemorySource) -> ProcContext {
        ProcContext::new(Arc::new(source), ProcPaths::default(), 100)
    }

    fn full_source() -> MemorySource {
        MemorySource::new()
            .with_file("/etc/passwd", PASSWD)
            .with_file("/proc/300/status", STATUS)
            .with_file("/proc/300/cmdline", "/bin/bash\0-l\0")
            .with_file(
                "/proc/300/stat",
                "300 (bash) S 1 300 300 0 -1 0 0 0 0 0 10 5 0 0 20 0 1 0 2500 0 0",
            )
    }

    #[test]
    fn first_matching_passwd_entry_wins() {
        assert_eq!(lookup_user(PASSWD, 1000).as_deref(), Some("alice"));
        assert_eq!(lookup_user(PASSWD, 0).as_deref(), Some("root"));
        assert_eq!(lookup_user(PASSWD, 4242), None);
    }

    #[test]
    fn uid_is_not_matched_as_substring() {
        assert_eq!(lookup_user("a:x:10:10::/:/bin/sh\n", 1), None);
    }

    #[test]
    fn resolves_all_fields() {
        let resolved = resolve(&ctx(full_source()), 300, Some(100.0));
        assert_eq!(resolved.command.as_deref(), Ok("/bin/bash -l"));
        assert_eq!(resolved.uid, Ok(1000));
        assert_eq!(resolved.user.as_deref(), Ok("alice"));
        assert_eq!(resolved.resident_kb, Ok(5120));
        // start tick 2500 at 100 Hz = 25 s after boot
        assert_eq!(resolved.uptime_secs, Ok(75));
        assert!(!resolved.vanished());
    }

    #[test]
    fn unmapped_uid_leaves_user_empty_only() {
        let source = full_source().with_file("/etc/passwd", "root:x:0:0::/root:/bin/sh\n");
        let resolved = resolve(&ctx(source), 300, Some(100.0));
        assert_eq!(resolved.user, Err(SampleError::Unmapped(1000)));

        let identity = resolved.identity();
        assert_eq!(identity.owning_user, "");
        assert_eq!(identity.command, "/bin/bash -l");
        assert_eq!(identity.resident_kb, 5120);
    }

    #[test]
    fn kernel_thread_has_empty_command_and_no_rss() {
        let source = MemorySource::new()
            .with_file("/proc/2/cmdline", "")
            .with_file("/proc/2/status", "Name:\tkthreadd\nUid:\t0\t0\t0\t0\n");
        let ctx = ctx(source);
        assert_eq!(command(&ctx, 2), Ok(String::new()));
        assert!(matches!(resident_kb(&ctx, 2), Err(SampleError::Parse { .. })));
    }

    #[test]
    fn vanished_process_degrades_every_field() {
        let resolved = resolve(&ctx(MemorySource::new()), 999, Some(100.0));
        assert!(resolved.vanished());
        assert_eq!(
            resolved.identity(),
            ProcessIdentity {
                pid: 999,
                ..ProcessIdentity::default()
            }
        );
    }

    #[test]
    fn future_start_time_is_invalid_age() {
        let resolved = resolve(&ctx(full_source()), 300, Some(10.0));
        assert_eq!(
            resolved.uptime_secs,
            Err(SampleError::InvalidProcessAge { pid: 300 })
        );
        assert_eq!(resolved.resident_kb, Ok(5120));
    }

    #[test]
    fn unknown_system_uptime_only_drops_uptime() {
        let resolved = resolve(&ctx(full_source()), 300, None);
        assert!(resolved.uptime_secs.is_err());
        assert_eq!(resolved.counters.map(|c| c.utime), Ok(10));
        assert_eq!(resolved.user.as_deref(), Ok("alice"));
    }

    #[test]
    fn uptime_truncates_to_whole_seconds() {
        let resolved = resolve(&ctx(full_source()), 300, Some(30.9));
        assert_eq!(resolved.uptime_secs, Ok(5));
    }
}
