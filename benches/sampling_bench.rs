use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use procpulse::system::counters::{parse_cpu_stat, parse_process_stat};
use procpulse::system::cpu::{SamplingPolicy, usage_between};
use procpulse::system::process::{ProcessRow, SortKey, sort_rows};
use procpulse::system::{Collector, MemorySource, ProcContext, ProcPaths};

fn make_stat(cores: usize, offset: u64) -> String {
    let mut out = format!("cpu {} 0 {} {} 0 0 0 0 0 0\n", 100 + offset, 50, 800 + offset);
    for core in 0..cores {
        out.push_str(&format!(
            "cpu{core} {} 0 {} {} 0 0 0 0 0 0\n",
            10 + offset,
            5,
            80 + offset
        ));
    }
    out.push_str("intr 0\nprocesses 1000\nprocs_running 2\n");
    out
}

fn stat_record(pid: u32) -> String {
    format!(
        "{pid} (worker {pid}) S 1 {pid} {pid} 0 -1 4194560 100 0 0 0 {} 20 0 0 20 0 1 0 {} 1000000 200",
        pid * 3,
        pid * 10
    )
}

fn make_proc_tree(n: u32) -> MemorySource {
    let mut source = MemorySource::new()
        .with_file("/proc/stat", make_stat(8, 0))
        .with_file("/proc/uptime", "100000.00 0.00\n")
        .with_file("/proc/meminfo", "MemTotal: 16000000 kB\nMemFree: 4000000 kB\n")
        .with_file("/etc/passwd", "root:x:0:0:root:/root:/bin/sh\n");
    for pid in 1..=n {
        source.insert(format!("/proc/{pid}/stat"), stat_record(pid));
        source.insert(
            format!("/proc/{pid}/status"),
            format!("Uid:\t0\t0\t0\t0\nVmRSS:\t{} kB\n", pid * 4),
        );
        source.insert(format!("/proc/{pid}/cmdline"), format!("/usr/bin/worker\0{pid}\0"));
    }
    source
}

fn bench_cpu_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("cpu_window_4_64_256");

    for cores in [4usize, 64, 256] {
        let before = make_stat(cores, 0);
        let after = make_stat(cores, 25);
        group.bench_with_input(
            BenchmarkId::from_parameter(cores),
            &(before, after),
            |b, (before, after)| {
                b.iter(|| {
                    let before = parse_cpu_stat(black_box(before)).unwrap();
                    let after = parse_cpu_stat(black_box(after)).unwrap();
                    black_box(usage_between(&before, &after).unwrap());
                })
            },
        );
    }

    group.finish();
}

fn bench_process_stat(c: &mut Criterion) {
    let record = stat_record(4242);
    c.bench_function("parse_process_stat", |b| {
        b.iter(|| black_box(parse_process_stat(4242, black_box(&record)).unwrap()))
    });
}

fn bench_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("collector_refresh_500_1000_2000");

    for size in [500u32, 1000, 2000] {
        let collector = Collector::new(
            ProcContext::new(Arc::new(make_proc_tree(size)), ProcPaths::default(), 100),
            SamplingPolicy::immediate(),
        );
        group.bench_with_input(BenchmarkId::from_parameter(size), &collector, |b, collector| {
            b.iter(|| black_box(collector.refresh().unwrap()))
        });
    }

    group.finish();
}

fn bench_sort_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_rows_500_1000_2000");

    for size in [500u32, 1000, 2000] {
        let rows: Vec<ProcessRow> = (1..=size)
            .map(|pid| ProcessRow {
                cpu_ratio: (pid % 7 != 0).then(|| f64::from(pid % 97) / 97.0),
                resident_kb: Some(u64::from(pid) * 4),
                ..ProcessRow::empty(pid)
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &rows, |b, rows| {
            b.iter(|| {
                let mut sorted = black_box(rows.clone());
                sort_rows(&mut sorted, SortKey::Cpu);
                black_box(sorted);
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_cpu_window,
    bench_process_stat,
    bench_refresh,
    bench_sort_rows
);
criterion_main!(benches);
