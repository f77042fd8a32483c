use owo_colors::OwoColorize;
use simrecipe_core::{BatchReport, Sensor, SensorReport};

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "simrecipe".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Film simulation recipes to FP1 profiles\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

fn print_sensor_report(report: &SensorReport) {
    let name = report.sensor.map(Sensor::as_str).unwrap_or("unknown");

    if let Some(error) = &report.error {
        print_error(&format!("{}: {}", name, error));
        return;
    }

    eprintln!(
        "  {} {} saved, {} failed, {} cached of {} found",
        format!("{}:", name).bold(),
        report.saved.len().to_string().bright_green(),
        report.failed.len().to_string().bright_red(),
        report.skipped.to_string().dimmed(),
        report.discovered
    );

    for failed in &report.failed {
        eprintln!("    {} {} {}", "✗".red(), failed.name, failed.error.dimmed());
    }
}

/// Print the per-sensor batch summary
pub fn print_batch_report(report: &BatchReport) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Batch Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    for sensor in &report.sensors {
        print_sensor_report(sensor);
    }

    eprintln!();
    if report.failed() == 0 {
        print_success(&format!("{} profiles saved", report.saved()));
    } else {
        print_warning(&format!("{} profiles saved, {} recipes failed", report.saved(), report.failed()));
    }
}
