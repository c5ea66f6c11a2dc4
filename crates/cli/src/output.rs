// Run summary rendering

use colored::Colorize;
use devsweep_core::application::{FetchCompletion, LifecycleOutcome, SweepSummary};
use devsweep_core::domain::StaleDeviceRecord;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct StaleRow {
    #[tabled(rename = "DeviceID")]
    device_id: String,
    #[tabled(rename = "DeviceName")]
    device_name: String,
    #[tabled(rename = "DeviceTimeStamp")]
    timestamp: String,
}

impl From<&StaleDeviceRecord> for StaleRow {
    fn from(record: &StaleDeviceRecord) -> Self {
        Self {
            device_id: record.device_id.clone(),
            device_name: record.device_name.clone(),
            timestamp: record.raw_timestamp.clone(),
        }
    }
}

pub fn print_summary(summary: &SweepSummary, stale_days: u32) {
    println!();
    println!("{}", "Fleet Summary".cyan().bold());
    println!("  {} {}", "Devices fetched:".bold(), summary.total_devices);
    match &summary.completion {
        FetchCompletion::Complete => {
            println!("  {} {}", "Inventory:".bold(), "COMPLETE".green())
        }
        other => println!(
            "  {} {} ({})",
            "Inventory:".bold(),
            "PARTIAL".yellow(),
            other
        ),
    }
    println!(
        "  {} {}",
        "Cutoff:".bold(),
        summary.stale.cutoff.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let excluded = summary.stale.excluded;
    if excluded.total() > 0 {
        println!(
            "  {} {} (no timestamp: {}, unparsable: {}, no id: {})",
            "Excluded:".bold(),
            excluded.total(),
            excluded.missing_timestamp,
            excluded.unparsable_timestamp,
            excluded.missing_id
        );
    }

    println!();
    println!(
        "{}",
        format!(
            "Total stale devices (>{} days): {}",
            stale_days,
            summary.stale.len()
        )
        .bold()
    );

    if !summary.stale.is_empty() {
        let rows: Vec<StaleRow> = summary.stale.devices.iter().map(StaleRow::from).collect();
        println!("{}", Table::new(rows));
    }

    println!();
    print_outcome("Recycle bin:", &summary.recycle);
    print_outcome("Force delete:", &summary.purge);
    println!("  {} {}", "Batch state:".bold(), summary.batch_state);
}

pub fn print_outcome(label: &str, outcome: &LifecycleOutcome) {
    let rendered = match outcome {
        LifecycleOutcome::Completed { .. } => format!("✓ {}", outcome).green(),
        LifecycleOutcome::Skipped { .. } => format!("○ {}", outcome).normal(),
        LifecycleOutcome::Failed { .. } => format!("✗ {}", outcome).red(),
    };
    println!("  {} {}", label.bold(), rendered);
}
