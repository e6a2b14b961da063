/// Scheduler ticks per second as reported by the running kernel.
#[cfg(unix)]
pub fn ticks_per_second() -> Option<u64> {
    // SAFETY: sysconf has no memory-safety preconditions.
    let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    u64::try_from(ticks).ok().filter(|&t| t > 0)
}

#[cfg(not(unix))]
pub fn ticks_per_second() -> Option<u64> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn tick_rate_is_positive_on_unix() {
        let tps = ticks_per_second().expect("sysconf(_SC_CLK_TCK) failed");
        assert!(tps > 0);
    }
}
