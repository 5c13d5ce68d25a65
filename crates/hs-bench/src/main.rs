//! Benchmark and correctness-check driver for the half-sample kernels.
//!
//! Runs every registered kernel over identical pseudo-random inputs, first
//! asserting byte equivalence against the scalar reference, then timing each
//! variant over a sliding input window. Timings are printed and optionally
//! written to a JSON report.
//!
//! Run from the workspace root:
//!   cargo run --release -p hs-bench
//!   cargo run --release -p hs-bench -- --width 1920 --height 1080 --out report.json

mod warmup;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use hs_kernels::{AlignedBuf, KernelDesc, half_sample_scalar, kernels};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;

use crate::warmup::{busy_loop_32_default, busy_loop_64_default};

#[derive(Parser, Debug)]
#[command(name = "hs_bench")]
#[command(about = "Benchmark and cross-check the half-sample kernel family")]
struct Cli {
    /// Input image width in pixels
    #[arg(long, default_value_t = 1280)]
    width: usize,

    /// Input image height in pixels
    #[arg(long, default_value_t = 720)]
    height: usize,

    /// Kernel calls per timed measurement
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Timed measurements per kernel
    #[arg(long, default_value_t = 10)]
    repeats: usize,

    /// Byte offset between consecutive iterations' input windows; small
    /// values keep most of the input in cache (rounded down to a multiple
    /// of 16 to preserve kernel alignment)
    #[arg(long, default_value_t = 16)]
    stride: usize,

    /// Seed for the pseudo-random input fill
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Milliseconds of CPU warm-up spinning before each warm-up sample
    #[arg(long, default_value_t = 10)]
    warmup_ms: u64,

    /// Write the full report as JSON to this path
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Serialize, Debug)]
struct Report {
    width: usize,
    height: usize,
    iterations: usize,
    repeats: usize,
    stride: usize,
    seed: u64,
    busy_loop_32_counts: Vec<u32>,
    busy_loop_64_counts: Vec<u64>,
    kernels: Vec<KernelReport>,
}

#[derive(Serialize, Debug)]
struct KernelReport {
    name: String,
    granularity: usize,
    alignment: usize,
    timings_ms: Vec<f64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let table = run_basic_checks(&kernels(), &cli)?;
    let report = run_benchmark(&table, &cli)?;

    if let Some(path) = &cli.out {
        let json = serde_json::to_string_pretty(&report).context("serialize report")?;
        fs::write(path, json).with_context(|| format!("write report to {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

/// Fills every registered kernel's output from the same random image and
/// compares against the scalar reference, byte for byte. Kernels whose
/// preconditions the requested dimensions cannot satisfy are skipped, not
/// failed; the supported subset is returned for benchmarking.
fn run_basic_checks(table: &[KernelDesc], cli: &Cli) -> Result<Vec<KernelDesc>> {
    println!("Basic correctness checks ({}x{}):", cli.width, cli.height);

    let in_len = cli.width * cli.height;
    let out_len = (cli.width / 2) * (cli.height / 2);

    let mut src = AlignedBuf::zeroed(in_len);
    StdRng::seed_from_u64(cli.seed).fill_bytes(src.as_mut_slice());

    let mut reference = AlignedBuf::zeroed(out_len);
    half_sample_scalar(src.as_slice(), cli.width, cli.height, reference.as_mut_slice())
        .context("scalar reference")?;

    let mut supported = Vec::with_capacity(table.len());
    let mut failed = false;
    for kernel in table {
        if !kernel.supports(src.as_slice(), cli.width, cli.height, reference.as_slice()) {
            println!(
                "  {}: SKIP (width not a multiple of {})",
                kernel.name, kernel.granularity
            );
            continue;
        }

        let mut out = AlignedBuf::zeroed(out_len);
        kernel
            .run(src.as_slice(), cli.width, cli.height, out.as_mut_slice())
            .with_context(|| format!("kernel {}", kernel.name))?;
        let ok = out.as_slice() == reference.as_slice();
        failed |= !ok;
        if ok {
            supported.push(*kernel);
        }
        println!("  {}: {}", kernel.name, if ok { "PASS" } else { "FAIL" });
    }

    if failed {
        bail!("kernel outputs disagree with the scalar reference");
    }
    Ok(supported)
}

fn run_benchmark(table: &[KernelDesc], cli: &Cli) -> Result<Report> {
    // Accumulate from the middle of the output image; threading the index
    // through every measurement keeps the compiler from discarding the
    // half-sample work.
    let out_stride = cli.width / 2;
    let accumulate_index = (cli.height / 4) * out_stride + (cli.width / 4);

    // Warm the CPU up before timing anything, and record the loop counts as
    // a 32-vs-64-bit throughput sanity signal.
    let mut busy_32_counts = Vec::with_capacity(10);
    let mut busy_64_counts = Vec::with_capacity(10);
    for _ in 0..10 {
        busy_32_counts.push(busy_loop_32_default(cli.warmup_ms));
        busy_64_counts.push(busy_loop_64_default(cli.warmup_ms));
    }

    let mut timings: Vec<Vec<f64>> = vec![Vec::with_capacity(cli.repeats); table.len()];
    for repeat in 0..cli.repeats {
        let mut first_accumulator = None;
        for offset in 0..table.len() {
            // Rotate the call order each repeat so no kernel always runs
            // with a cold or a freshly warmed cache.
            let idx = (repeat + offset) % table.len();
            let kernel = &table[idx];

            let (ms, accumulator) = benchmark(kernel, cli, repeat as u64, accumulate_index)?;
            timings[idx].push(ms);

            match first_accumulator {
                None => first_accumulator = Some(accumulator),
                Some(expected) => {
                    if accumulator != expected {
                        bail!(
                            "kernel {} accumulator {} disagrees with {} (repeat {})",
                            kernel.name,
                            accumulator,
                            expected,
                            repeat
                        );
                    }
                }
            }
        }
    }

    println!("======");
    println!("Busy loop counts (32 bit | 64 bit):");
    for (c32, c64) in busy_32_counts.iter().zip(&busy_64_counts) {
        println!("  {c32} | {c64}");
    }
    println!("======");
    println!("Benchmark timings (ms):");
    for (kernel, kernel_timings) in table.iter().zip(&timings) {
        println!("{}:", kernel.name);
        for ms in kernel_timings {
            println!("  {ms:.3}");
        }
    }
    println!("======");

    Ok(Report {
        width: cli.width,
        height: cli.height,
        iterations: cli.iterations,
        repeats: cli.repeats,
        stride: cli.stride,
        seed: cli.seed,
        busy_loop_32_counts: busy_32_counts,
        busy_loop_64_counts: busy_64_counts,
        kernels: table
            .iter()
            .zip(timings)
            .map(|(kernel, timings_ms)| KernelReport {
                name: kernel.name.to_string(),
                granularity: kernel.granularity,
                alignment: kernel.alignment,
                timings_ms,
            })
            .collect(),
    })
}

/// Times `iterations` kernel calls over a window sliding through one large
/// random allocation, so consecutive calls do not all hit the same cached
/// lines. Returns the elapsed milliseconds and the accumulated probe byte.
fn benchmark(
    kernel: &KernelDesc,
    cli: &Cli,
    seed: u64,
    accumulate_index: usize,
) -> Result<(f64, u64)> {
    let in_len = cli.width * cli.height;
    let out_len = (cli.width / 2) * (cli.height / 2);

    // Keep the window offset a multiple of 16 so every window satisfies the
    // strictest kernel alignment.
    let stride = (cli.stride / 16) * 16;
    let total_len = in_len + stride * (cli.iterations.max(1) - 1);

    let mut in_data = AlignedBuf::zeroed(total_len);
    StdRng::seed_from_u64(cli.seed ^ seed).fill_bytes(in_data.as_mut_slice());
    let mut out_data = AlignedBuf::zeroed(out_len);

    let mut accumulator = 0u64;
    let start = Instant::now();

    for i in 0..cli.iterations {
        let window = &in_data.as_slice()[i * stride..];
        kernel
            .run(window, cli.width, cli.height, out_data.as_mut_slice())
            .with_context(|| format!("kernel {}", kernel.name))?;
        accumulator += out_data.as_slice()[accumulate_index] as u64;
    }

    let ms = start.elapsed().as_secs_f64() * 1000.0;
    Ok((ms, accumulator))
}
