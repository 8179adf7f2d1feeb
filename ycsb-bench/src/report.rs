//! Printing of run results to stdout.

use std::fmt;
use std::time::Duration;

use bytesize::ByteSize;
use sketches_ddsketch::DDSketch;
use yansi::Paint;

use crate::run::RunReport;

/// Prints all phases of a run.
pub fn print_report(store: &str, report: &RunReport) {
    let shape = &report.shape;

    println!(
        "{} {} ({} records, {} fields of {} each, {} total)",
        "## Store".bold(),
        store.bold().blue(),
        shape.record_count.bold(),
        shape.field_count,
        ByteSize::b(shape.field_length as u64),
        ByteSize::b(shape.total_bytes()).bold()
    );
    println!("  dataset generated in {:.2?}", report.generate);

    let load = &report.load;
    println!();
    println!(
        "{} ({} records in {} batches)",
        "LOAD:".bold().green(),
        load.records.bold(),
        load.batches
    );
    println!(
        "  {:.2} records/s in {:.2?}",
        load.records_per_second().bold(),
        load.elapsed
    );

    let lookup = &report.lookup;
    println!();
    println!(
        "{} ({} ops, zipfian skew {})",
        "LOOKUP:".bold().green(),
        lookup.lookups.bold(),
        report.theta
    );
    println!(
        "  {:.2} operations/s in {:.2?}, all verified",
        lookup.ops_per_second().bold(),
        lookup.elapsed
    );
    if let Some(sketch) = &lookup.latencies {
        if sketch.count() > 0 {
            print_percentiles(sketch, Duration::from_secs_f64);
        }
    }

    let scan = &report.scan;
    println!();
    println!(
        "{} ({} records, {} fields)",
        "SCAN:".bold().green(),
        scan.records.bold(),
        scan.fields
    );
    let throughput = (scan.bytes as f64 / scan.elapsed.as_secs_f64()) as u64;
    println!(
        "  {:.2} MB/s ({}/s), {} in {:.2?}",
        scan.megabytes_per_second().bold(),
        ByteSize::b(throughput),
        ByteSize::b(scan.bytes),
        scan.elapsed
    );
}

fn print_percentiles<T: fmt::Debug>(sketch: &DDSketch, map: impl Fn(f64) -> T) {
    let quantile = |q| sketch.quantile(q).ok().flatten().unwrap_or_default();

    let avg = map(sketch.sum().unwrap_or_default() / sketch.count() as f64);
    let p50 = map(quantile(0.5));
    let p90 = map(quantile(0.9));
    let p99 = map(quantile(0.99));
    println!(
        "  avg: {:.2?}; p50: {p50:.2?}; p90: {p90:.2?}; p99: {p99:.2?}",
        avg.bold()
    );
}
