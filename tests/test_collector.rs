
use std::time::Duration;

use runstats::{Collector, CycleReport, RunstatsConfig};

use shared::{leaf, wait_for, FixedStats, RecordingSink};

const MEM_LEAVES: [&str; 19] = [
    "mem.alloc",
    "mem.total",
    "mem.sys",
    "mem.lookups",
    "mem.malloc",
    "mem.frees",
    "mem.heap.alloc",
    "mem.heap.sys",
    "mem.heap.idle",
    "mem.heap.inuse",
    "mem.heap.released",
    "mem.heap.objects",
    "mem.stack.inuse",
    "mem.stack.sys",
    "mem.stack.mspan_inuse",
    "mem.stack.mspan_sys",
    "mem.stack.mcache_inuse",
    "mem.stack.mcache_sys",
    "mem.othersys",
];

const GC_LEAVES: [&str; 6] = [
    "mem.gc.sys",
    "mem.gc.next",
    "mem.gc.last",
    "mem.gc.pause_total",
    "mem.gc.pause",
    "mem.gc.count",
];

/// Allowed scheduling delay on top of the configured interval.
const CADENCE_TOLERANCE: Duration = Duration::from_millis(50);

fn collector(config: RunstatsConfig, sink: &RecordingSink) -> Collector {
    Collector::with_stats(config, sink.clone(), FixedStats).unwrap()
}

#[test]
fn test_disabled_groups_emit_nothing() {
    let sink = RecordingSink::new();
    let config = RunstatsConfig::new()
        .with_interval(Duration::from_millis(50))
        .with_cpu_stats(false)
        .with_memory_stats(false)
        .with_gc_stats(true);
    let collector = collector(config, &sink);

    assert_eq!(collector.run_cycle(), CycleReport::default());

    let guard = collector.spawn().unwrap();
    std::thread::sleep(Duration::from_millis(300));
    assert!(guard.is_running());
    guard.shutdown();

    assert_eq!(sink.len(), 0);
}

#[test]
fn test_memory_without_gc() {
    let sink = RecordingSink::new();
    let config = RunstatsConfig::new()
        .with_cpu_stats(false)
        .with_gc_stats(false);
    let collector = collector(config, &sink);

    collector.run_cycle();
    let lines = sink.lines();
    let leaves: Vec<_> = lines.iter().map(|l| leaf(l, collector.prefix())).collect();

    assert_eq!(leaves, MEM_LEAVES);
    assert!(!leaves.iter().any(|l| l.starts_with("mem.gc.")));
}

#[test]
fn test_full_cycle_vocabulary() {
    let sink = RecordingSink::new();
    let collector = collector(RunstatsConfig::default(), &sink);

    collector.run_cycle();
    collector.run_cycle();
    let lines = sink.lines();
    assert_eq!(lines.len(), 54);

    let (first, second) = lines.split_at(27);
    let expected: Vec<&str> = ["cpu.goroutines", "cpu.cgo_calls"]
        .into_iter()
        .chain(MEM_LEAVES)
        .chain(GC_LEAVES)
        .collect();
    for cycle in [first, second] {
        let leaves: Vec<_> = cycle.iter().map(|l| leaf(l, collector.prefix())).collect();
        assert_eq!(leaves, expected);
    }

    let prefix = collector.prefix();
    assert!(lines.iter().all(|l| l.starts_with(&format!("{}.", prefix))));
    assert!(lines.contains(&format!("{}.cpu.goroutines:8|g|@1", prefix)));
    assert!(lines.contains(&format!("{}.cpu.cgo_calls:42|g|@1", prefix)));
    assert!(lines.contains(&format!("{}.mem.gc.pause:350|g|@1", prefix)));
    assert!(lines.contains(&format!("{}.mem.gc.count:1|g|@1", prefix)));
}

#[test]
fn test_prefix_matches_hostname() {
    let sink = RecordingSink::new();
    let collector = collector(RunstatsConfig::default(), &sink);

    let expected = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .filter(|h| !h.is_empty())
        .map(|h| format!("{}.go", h))
        .unwrap_or_else(|| "unknown_host.go".to_owned());
    assert_eq!(collector.prefix(), expected);
    assert_eq!(collector.prefix(), runstats::prefix::resolve());
}

#[test]
fn test_cpu_only_three_cycles() {
    let sink = RecordingSink::new();
    let config = RunstatsConfig::new()
        .with_interval(Duration::from_secs(1))
        .with_cpu_stats(true)
        .with_memory_stats(false);
    let collector = collector(config, &sink);
    let prefix = collector.prefix().to_owned();

    assert!(collector
        .collect()
        .iter()
        .all(|sample| sample.sample_rate == 1.0));

    let guard = collector.spawn().unwrap();
    assert!(wait_for(Duration::from_secs(10), || sink.len() >= 6));
    guard.shutdown();

    let lines = sink.lines();
    for cycle in lines.chunks(2).take(3) {
        let leaves: Vec<_> = cycle.iter().map(|l| leaf(l, &prefix)).collect();
        assert_eq!(leaves, ["cpu.goroutines", "cpu.cgo_calls"]);
        assert!(cycle.iter().all(|l| l.ends_with("|g|@1")));
    }
}

#[test]
fn test_cycle_cadence() {
    let sink = RecordingSink::new();
    let config = RunstatsConfig::new()
        .with_interval(Duration::from_secs(1))
        .with_memory_stats(false);
    let guard = collector(config, &sink).spawn().unwrap();

    assert!(wait_for(Duration::from_secs(15), || sink.len() >= 10));
    guard.shutdown();

    let emissions = sink.emissions();
    let batches: Vec<_> = emissions.chunks(2).take(5).collect();
    for pair in batches.windows(2) {
        let gap = pair[1][0].at.duration_since(pair[0][1].at);
        assert!(gap >= Duration::from_secs(1), "gap too short: {:?}", gap);
        assert!(
            gap < Duration::from_secs(1) + CADENCE_TOLERANCE,
            "gap too long: {:?}",
            gap
        );
    }
}

#[test]
fn test_send_failure_does_not_stop_cycle() {
    let sink = RecordingSink::failing_at(2);
    let collector = collector(RunstatsConfig::default(), &sink);

    let report = collector.run_cycle();
    assert_eq!(report, CycleReport { sent: 26, failed: 1 });

    let emissions = sink.emissions();
    assert_eq!(emissions.len(), 27);
    assert!(!emissions[1].ok);
    assert!(emissions[1].line.contains(".cpu.cgo_calls:"));
    assert!(emissions.iter().enumerate().all(|(i, e)| e.ok || i == 1));
}

#[test]
fn test_send_failure_reaches_next_cycle() {
    let sink = RecordingSink::failing_at(2);
    let config = RunstatsConfig::new()
        .with_interval(Duration::from_millis(100))
        .with_memory_stats(false);
    let guard = collector(config, &sink).spawn().unwrap();

    assert!(wait_for(Duration::from_secs(10), || sink.len() >= 4));
    assert!(guard.is_running());
    guard.shutdown();

    let emissions = sink.emissions();
    assert!(!emissions[1].ok);
    assert!(emissions[2].ok && emissions[3].ok);
    assert!(emissions[2].line.contains(".cpu.goroutines:"));
}

#[test]
fn test_shutdown_interrupts_sleep() {
    let sink = RecordingSink::new();
    let config = RunstatsConfig::new()
        .with_interval(Duration::from_secs(3600))
        .with_memory_stats(false);
    let guard = collector(config, &sink).spawn().unwrap();

    assert!(wait_for(Duration::from_secs(5), || sink.len() >= 2));
    let start = std::time::Instant::now();
    guard.shutdown();

    assert!(start.elapsed() < Duration::from_secs(2));
    assert_eq!(sink.len(), 2);
}

#[test]
fn test_independent_collectors() {
    let cpu_sink = RecordingSink::new();
    let mem_sink = RecordingSink::new();
    let cpu = Collector::from_parts(
        RunstatsConfig::new().with_memory_stats(false),
        "cpu-host.go",
        cpu_sink.clone(),
        FixedStats,
    )
    .unwrap();
    let mem = Collector::from_parts(
        RunstatsConfig::new().with_cpu_stats(false).with_gc_stats(false),
        "mem-host.go",
        mem_sink.clone(),
        FixedStats,
    )
    .unwrap();

    cpu.run_cycle();
    mem.run_cycle();

    assert_eq!(
        cpu_sink.lines(),
        [
            "cpu-host.go.cpu.goroutines:8|g|@1",
            "cpu-host.go.cpu.cgo_calls:42|g|@1"
        ]
    );
    assert_eq!(mem_sink.len(), 19);
    assert!(mem_sink.lines().iter().all(|l| l.starts_with("mem-host.go.mem.")));
}
