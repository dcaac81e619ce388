//! CSV export for simulation tick results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::TickResult;

/// Column header for CSV telemetry export.
const HEADER: &str = "tick,time_s,time_of_day,drive_rate,source_w,delivered_w,stored_w,\
                      cooled,shortfall,temp_drop_c,temp_gain_c,env_temp_c,\
                      unit_temp_c,battery_wh";

/// Exports simulation results to a CSV file at the given path.
///
/// Writes a header row followed by one data row per tick. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(results: &[TickResult], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(results, buf)
}

/// Writes simulation results as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(results: &[TickResult], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in results {
        wtr.write_record(&[
            r.tick.to_string(),
            format!("{:.1}", r.time_s),
            format!("{:.4}", r.time_of_day),
            format!("{:.4}", r.drive_rate),
            format!("{:.3}", r.source_watts),
            format!("{:.3}", r.delivered_watts),
            format!("{:.3}", r.stored_watts),
            r.cooled.to_string(),
            r.power_shortfall.to_string(),
            format!("{:.6}", r.temp_drop_c),
            format!("{:.6}", r.temp_gain_c),
            format!("{:.4}", r.env_temp_c),
            format!("{:.4}", r.mean_unit_temp_c),
            format!("{:.3}", r.battery_level_wh),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
