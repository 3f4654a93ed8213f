// mod.rs - Rate table output

use crate::core::RateTable;
use crate::error::{Result, TigerError};
use std::fs::{create_dir_all, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &str) -> Result<()> {
    if let Some(parent) = Path::new(file_path).parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent).map_err(|e| TigerError::io(parent, e))?;
        }
    }
    Ok(())
}

/// Format a rate as the shortest plain decimal that round-trips
/// (`1.0`, `0.5`, `0.00005`), never in exponent notation.
pub fn format_rate(rate: f64) -> String {
    let text = rate.to_string();
    if text.contains('.') || !rate.is_finite() {
        text
    } else {
        format!("{}.0", text)
    }
}

/// Write one line per character, in character order, optionally prefixed by its name.
pub fn write_rates<W: Write>(writer: &mut W, table: &RateTable, include_names: bool) -> io::Result<()> {
    for (site, rate) in table.rates.iter().enumerate() {
        if include_names {
            writeln!(writer, "{}\t{}", table.label(site), format_rate(*rate))?;
        } else {
            writeln!(writer, "{}", format_rate(*rate))?;
        }
    }
    writer.flush()
}

/// Write the table to `file_path`, or to stdout when no path is given
pub fn write_rates_to(file_path: Option<&str>, table: &RateTable, include_names: bool) -> Result<()> {
    match file_path {
        Some(path) => {
            ensure_parent_dir(path)?;
            let file = File::create(path).map_err(|e| TigerError::io(path, e))?;
            let mut writer = BufWriter::new(file);
            write_rates(&mut writer, table, include_names).map_err(|e| TigerError::io(path, e))?;
            info!("✅ Rates written to: {}", path);
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            write_rates(&mut writer, table, include_names).map_err(|e| TigerError::io("<stdout>", e))?;
        }
    }
    Ok(())
}
