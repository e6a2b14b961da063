use proptest::prelude::*;

use procpulse::format::format_elapsed;
use procpulse::system::counters::{CpuLine, SystemCounterSnapshot, try_parse_cpu_line};
use procpulse::system::cpu::utilization;
use procpulse::system::metadata::lookup_user;
use procpulse::system::process::{ProcessRow, SortKey, sort_rows};

fn split_elapsed(text: &str) -> (u64, u64, u64) {
    let parts: Vec<u64> = text.split(':').map(|p| p.parse().unwrap()).collect();
    assert_eq!(parts.len(), 3, "{text}");
    (parts[0], parts[1], parts[2])
}

proptest! {
    #[test]
    fn elapsed_reconstructs_input(seconds in 0u64..10_000_000) {
        let (h, m, s) = split_elapsed(&format_elapsed(seconds));
        prop_assert!(m < 60);
        prop_assert!(s < 60);
        prop_assert_eq!(h * 3600 + m * 60 + s, seconds);
    }

    #[test]
    fn utilization_stays_in_unit_interval(
        idle in 0u64..1_000_000_000,
        busy in 0u64..1_000_000_000,
        d_idle in 0u64..1_000_000,
        d_busy in 0u64..1_000_000,
    ) {
        prop_assume!(d_idle + d_busy > 0);
        let before = SystemCounterSnapshot { idle_time: idle, total_time: idle + busy };
        let after = SystemCounterSnapshot {
            idle_time: idle + d_idle,
            total_time: idle + busy + d_idle + d_busy,
        };

        let ratio = utilization(&before, &after).unwrap();
        prop_assert!((0.0..=1.0).contains(&ratio));
        let expected = d_busy as f64 / (d_idle + d_busy) as f64;
        prop_assert!((ratio - expected).abs() < 1e-12);
    }

    #[test]
    fn utilization_of_identical_readings_is_undefined(idle in 0u64..1_000_000, busy in 0u64..1_000_000) {
        let snap = SystemCounterSnapshot { idle_time: idle, total_time: idle + busy };
        prop_assert!(utilization(&snap, &snap).is_err());
    }

    #[test]
    fn cpu_line_parse_is_deterministic(
        core in proptest::option::of(0u32..256),
        fields in proptest::collection::vec(0u64..u32::MAX as u64, 7..=10),
    ) {
        let label = match core {
            Some(index) => format!("cpu{index}"),
            None => "cpu".to_string(),
        };
        let tokens: Vec<String> = fields.iter().map(u64::to_string).collect();
        let line = format!("{label} {}", tokens.join(" "));

        let first = try_parse_cpu_line(&line).unwrap().unwrap();
        let second = try_parse_cpu_line(&line).unwrap().unwrap();
        prop_assert_eq!(first, second);

        let expected_line = core.map_or(CpuLine::Aggregate, CpuLine::Core);
        prop_assert_eq!(first.0, expected_line);
        prop_assert_eq!(first.1.idle_time, fields[3] + fields[4]);
        prop_assert_eq!(first.1.total_time, fields[..7].iter().sum::<u64>());
        prop_assert!(first.1.idle_time <= first.1.total_time);
    }

    #[test]
    fn lookup_returns_first_matching_entry(uid in 0u32..70_000, names in proptest::collection::vec("[a-z]{1,8}", 1..5)) {
        let passwd: String = names
            .iter()
            .map(|name| format!("{name}:x:{uid}:{uid}::/home/{name}:/bin/sh\n"))
            .collect();
        prop_assert_eq!(lookup_user(&passwd, uid), Some(names[0].clone()));
        prop_assert_eq!(lookup_user(&passwd, uid + 1), None);
    }

    #[test]
    fn sorted_rows_put_known_cpu_first(ratios in proptest::collection::vec(proptest::option::of(0.0f64..4.0), 0..40)) {
        let mut rows: Vec<ProcessRow> = ratios
            .iter()
            .enumerate()
            .map(|(i, ratio)| ProcessRow { cpu_ratio: *ratio, ..ProcessRow::empty(i as u32 + 1) })
            .collect();
        sort_rows(&mut rows, SortKey::Cpu);

        for pair in rows.windows(2) {
            match (pair[0].cpu_ratio, pair[1].cpu_ratio) {
                (Some(a), Some(b)) => prop_assert!(a >= b),
                (None, Some(_)) => prop_assert!(false, "unknown ratio sorted before a known one"),
                (None, None) => prop_assert!(pair[0].pid < pair[1].pid),
                (Some(_), None) => {}
            }
        }
    }
}
