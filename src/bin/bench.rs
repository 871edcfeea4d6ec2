//! Benchmark for the auto-scheduler.
//!
//! Run with: cargo run --release --bin bench

use guard_scheduling::config::ScheduleConfig;
use guard_scheduling::demo_data::{self, DemoData, DEMO_YEAR};
use guard_scheduling::solver::AutoScheduler;
use std::time::{Duration, Instant};

const RUNS: u32 = 5;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let roster = demo_data::generate(DemoData::Large);
    let n_shifts = roster.shifts.len();
    let n_guards = roster.guards.len();

    println!("Benchmark: Auto-scheduling (LARGE demo roster)");
    println!("  Shifts: {}", n_shifts);
    println!("  Guards: {}", n_guards);
    println!();

    for (label, swap_iterations) in [("greedy only", 0), ("greedy + swaps", 100)] {
        let config = ScheduleConfig {
            max_swap_iterations: swap_iterations,
            ..ScheduleConfig::for_year(DEMO_YEAR)
        };
        let scheduler =
            AutoScheduler::with_config(roster.guards.clone(), roster.shifts.clone(), config)?;

        let mut total = Duration::ZERO;
        let mut last = None;
        for _ in 0..RUNS {
            let start = Instant::now();
            let result = scheduler.generate_schedule()?;
            total += start.elapsed();
            last = Some(result);
        }

        println!("{}:", label);
        println!("  Mean time: {:.2?}", total / RUNS);
        if let Some(result) = last {
            println!(
                "  Assigned: {}/{}",
                result.metrics.assigned_shifts, result.metrics.total_shifts
            );
            println!("  Total score: {:.1}", result.total_score());

            #[cfg(feature = "console")]
            guard_scheduling::console::print_run_ended(&result, total / RUNS);
        }
        println!();
    }

    Ok(())
}
