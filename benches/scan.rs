use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use logtable::expr::{apply_operations, NamespacePolicy};
use logtable::segment::{scan_str, ColumnSpec, HeaderPolicy, InstanceSelector};

/// Build a thermo-style log with `runs` blocks of `rows_per_run` rows
fn synthetic_log(runs: usize, rows_per_run: usize) -> String {
    let mut log = String::with_capacity(runs * rows_per_run * 64);
    log.push_str("LAMMPS (2 Aug 2023 - Update 1)\n");
    for run in 0..runs {
        log.push_str("Setting up Verlet run ...\n");
        log.push_str("   Step          Temp          E_pair         TotEng         Press     \n");
        for i in 0..rows_per_run {
            let step = run * rows_per_run + i;
            log.push_str(&format!(
                "{:>10}   {:.8}    {:.8}    {:.8}    {:.8}\n",
                step * 100,
                1.44 - i as f64 * 1e-4,
                -6.77 + i as f64 * 1e-5,
                -4.62 - i as f64 * 1e-6,
                0.25 + i as f64 * 1e-3,
            ));
        }
        log.push_str(&format!("Loop time of 0.09 on 8 procs for {} steps\n", rows_per_run));
    }
    log
}

/// Benchmark scanning a log for all matching tables
fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    let columns = ColumnSpec::new(["Step", "Temp", "TotEng"]).unwrap();

    for rows_per_run in [1_000, 10_000, 100_000] {
        let log = synthetic_log(4, rows_per_run);
        group.throughput(Throughput::Bytes(log.len() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}rows", rows_per_run * 4)),
            &log,
            |b, log| {
                b.iter(|| {
                    let set = scan_str(black_box(log), &columns, HeaderPolicy::Discard).unwrap();
                    black_box(set.len())
                })
            },
        );
    }

    group.finish();
}

/// Benchmark evaluating derived columns over a selected table
fn bench_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("operations");
    let columns = ColumnSpec::new(["Step", "Temp", "E_pair", "TotEng"]).unwrap();
    let operations = [
        "KinEng = TotEng - E_pair",
        "norm = (TotEng - mean(TotEng)) / std(TotEng)",
        "logT = log(Temp) * 2 ** 0.5",
    ];

    for rows in [10_000, 100_000] {
        let log = synthetic_log(1, rows);
        let set = scan_str(&log, &columns, HeaderPolicy::Discard).unwrap();
        let table = set.select_table(&InstanceSelector::First).unwrap();
        group.throughput(Throughput::Elements(rows as u64));

        group.bench_with_input(BenchmarkId::from_parameter(rows), &table, |b, table| {
            b.iter(|| {
                let mut table = table.clone();
                let report = apply_operations(&mut table, &operations, NamespacePolicy::Snapshot);
                black_box(report.applied_count())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scan, bench_operations);
criterion_main!(benches);
