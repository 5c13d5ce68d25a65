//! CPU warm-up busy loops.
//!
//! Timed kernel runs are short; on laptops and mobile parts the first
//! measurements land while the OS is still ramping clock frequency. Spinning
//! for a few milliseconds first stabilizes the clock, and reporting the loop
//! counts lets 32-bit and 64-bit ALU throughput be compared as a sanity
//! signal. All loop parameters are explicit arguments (and routed through
//! `black_box`) so the compiler can neither precompute the inner loop nor
//! hoist it out of the outer one.

use std::hint::black_box;
use std::time::{Duration, Instant};

pub fn busy_loop_32(ms: u64, inner_start_mask: u32, inner_end: u32, inner_step: u32) -> u32 {
    let deadline = Instant::now() + Duration::from_millis(ms);
    let inner_start_mask = black_box(inner_start_mask);
    let inner_end = black_box(inner_end);
    let inner_step = black_box(inner_step);

    let mut outer_loops = 0u32;
    while Instant::now() <= deadline {
        let mut i = outer_loops & inner_start_mask;
        while i < inner_end {
            i = i.wrapping_add(inner_step);
            const MASK: u32 = 0x8080_0000;
            if (i & MASK) == MASK {
                return 0;
            }
        }

        outer_loops = outer_loops.wrapping_add(1);
    }

    outer_loops
}

pub fn busy_loop_32_default(ms: u64) -> u32 {
    busy_loop_32(ms, 0, 1 << 12, 1)
}

pub fn busy_loop_64(ms: u64, inner_start_mask: u64, inner_end: u64, inner_step: u64) -> u64 {
    let deadline = Instant::now() + Duration::from_millis(ms);
    let inner_start_mask = black_box(inner_start_mask);
    let inner_end = black_box(inner_end);
    let inner_step = black_box(inner_step);

    let mut outer_loops = 0u64;
    while Instant::now() <= deadline {
        let mut i = outer_loops & inner_start_mask;
        while i < inner_end {
            i = i.wrapping_add(inner_step);
            const MASK: u64 = 0x8080_0000;
            if (i & MASK) == MASK {
                return 0;
            }
        }

        outer_loops = outer_loops.wrapping_add(1);
    }

    outer_loops
}

pub fn busy_loop_64_default(ms: u64) -> u64 {
    busy_loop_64(ms, 0, 1 << 12, 1)
}
