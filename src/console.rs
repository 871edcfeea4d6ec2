//! Colorful console output for scheduling runs.

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::result::ScheduleResult;

/// ASCII art banner for server startup.
pub fn print_banner() {
    let banner = r#"
   ____                     _
  / ___|_   _  __ _ _ __ __| |
 | |  _| | | |/ _` | '__/ _` |
 | |_| | |_| | (_| | | | (_| |
  \____|\__,_|\__,_|_|  \__,_|
"#;
    println!("{}", banner.cyan().bold());
    println!(
        "  {} {}\n",
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black(),
        "Guard Scheduling".bright_cyan()
    );
}

/// Prints the size of a run before it starts.
pub fn print_run_started(job_id: &str, guards: usize, shifts: usize) {
    println!(
        "{} {} {} Scheduling started: job ({}), guards ({}), shifts ({}), candidate pairs ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Scheduler]".bright_cyan(),
        job_id.white(),
        guards.to_formatted_string(&Locale::en).bright_yellow(),
        shifts.to_formatted_string(&Locale::en).bright_yellow(),
        (guards * shifts).to_formatted_string(&Locale::en).bright_magenta()
    );
}

/// Prints a summary box for a finished run.
pub fn print_run_ended(result: &ScheduleResult, duration: Duration) {
    let metrics = &result.metrics;
    let fully_staffed = metrics.unassigned_shifts == 0;

    println!(
        "{} {} {} Scheduling ended: time spent ({}), assigned ({}), unassigned ({}), total score ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Scheduler]".bright_cyan(),
        format_duration(duration).yellow(),
        metrics.assigned_shifts.to_formatted_string(&Locale::en).bright_green(),
        format_unassigned(metrics.unassigned_shifts),
        format!("{:.1}", result.total_score()).white().bold()
    );

    println!();
    println!("{}", "╔══════════════════════════════════════════════════════════╗".bright_cyan());

    let status_text = if fully_staffed {
        "✓ ALL SHIFTS STAFFED"
    } else {
        "✗ SOME SHIFTS UNSTAFFED"
    };
    let status_colored = if fully_staffed {
        status_text.bright_green().bold().to_string()
    } else {
        status_text.bright_red().bold().to_string()
    };
    let status_padding = 56 - status_text.chars().count();
    let left_pad = status_padding / 2;
    let right_pad = status_padding - left_pad;
    println!(
        "{}{}{}{}{}",
        "║".bright_cyan(),
        " ".repeat(left_pad),
        status_colored,
        " ".repeat(right_pad),
        "║".bright_cyan()
    );

    println!("{}", "╠══════════════════════════════════════════════════════════╣".bright_cyan());

    let rows = [
        (
            "Assigned:",
            format!(
                "{}/{}",
                metrics.assigned_shifts.to_formatted_string(&Locale::en),
                metrics.total_shifts.to_formatted_string(&Locale::en)
            ),
        ),
        ("Total Score:", format!("{:.1}", result.total_score())),
        (
            "Avg Shifts/Guard:",
            format!("{:.2}", metrics.average_guard_utilization),
        ),
        ("Scheduling Time:", format!("{:.3}s", duration.as_secs_f64())),
    ];
    for (label, value) in rows {
        println!(
            "{}  {:<18}{:>36}  {}",
            "║".bright_cyan(),
            label,
            value,
            "║".bright_cyan()
        );
    }

    println!("{}", "╚══════════════════════════════════════════════════════════╝".bright_cyan());
    println!();
}

fn format_unassigned(count: usize) -> String {
    let text = count.to_formatted_string(&Locale::en);
    if count == 0 {
        text.bright_green().to_string()
    } else {
        text.bright_red().to_string()
    }
}

/// Formats a duration nicely.
pub fn format_duration(d: Duration) -> String {
    let total_ms = d.as_millis();
    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", d.as_secs_f64())
    } else {
        let mins = total_ms / 60_000;
        let secs = (total_ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

/// Returns a timestamp string.
fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S%.3f").to_string()
}
