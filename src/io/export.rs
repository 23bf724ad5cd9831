//! CSV export for PnL settlement details.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::market::types::PnlDetail;

/// Column header for CSV PnL export.
const HEADER: &str =
    "order_id,hour,side,quantity,bid_price,day_ahead_price,real_time_price,filled,pnl";

/// Exports settlement details to a CSV file at the given path.
///
/// Writes a header row followed by one data row per order, in submission
/// order. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(details: &[PnlDetail], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(details, buf)
}

/// Writes settlement details as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(details: &[PnlDetail], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for d in details {
        wtr.write_record(&[
            d.order_id.to_string(),
            d.hour.to_string(),
            d.side.to_string(),
            format!("{:.3}", d.quantity),
            format!("{:.2}", d.bid_price),
            format!("{:.2}", d.day_ahead_price),
            format!("{:.2}", d.real_time_price),
            d.filled.to_string(),
            format!("{:.2}", d.pnl),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
