// harvest.rs - Harvest-style CSV matrix reader

use super::{ensure_exists, MatrixReader};
use crate::data::matrix::{RawMatrix, StateValue};
use crate::error::{Result, TigerError};
use std::io::Read;
use std::path::Path;

/// CSV matrix: header row with one column per character, one row per taxon,
/// taxon name in the first column.
#[derive(Debug, Clone)]
pub struct HarvestReader;

impl HarvestReader {
    /// Parse a harvest matrix from any reader.
    pub fn parse<R: Read>(input: R, source_name: &str) -> Result<RawMatrix> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        let headers = reader.headers().map_err(|e| TigerError::UnsupportedFormatLayout {
            format: "harvest",
            reason: format!("unreadable header in {}: {}", source_name, e),
        })?;
        if headers.len() < 2 {
            return Err(TigerError::UnsupportedFormatLayout {
                format: "harvest",
                reason: "header must have a taxon column and at least one character column".to_string(),
            });
        }
        let site_names: Vec<String> = headers.iter().skip(1).map(|h| h.trim().to_string()).collect();

        let mut taxa = Vec::new();
        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            // Line 1 is the header
            let line = index + 2;
            let record = record.map_err(|e| TigerError::malformed(source_name, line, e.to_string()))?;

            if record.len() != site_names.len() + 1 {
                return Err(TigerError::malformed(
                    source_name,
                    line,
                    format!("{} fields, expected {}", record.len(), site_names.len() + 1),
                ));
            }

            let taxon = record[0].trim().to_string();
            if taxa.contains(&taxon) {
                return Err(TigerError::malformed(
                    source_name,
                    line,
                    format!("duplicate taxon name '{}'", taxon),
                ));
            }
            taxa.push(taxon);
            rows.push(
                record
                    .iter()
                    .skip(1)
                    .map(|value| match value.trim() {
                        "" => StateValue::Missing,
                        label => StateValue::Definite(label.to_string()),
                    })
                    .collect::<Vec<_>>(),
            );
        }

        RawMatrix::from_rows(taxa, rows, Some(site_names))
    }
}

impl MatrixReader for HarvestReader {
    fn name(&self) -> &'static str {
        "harvest"
    }

    fn description(&self) -> &'static str {
        "CSV matrix with taxa as rows and characters as columns"
    }

    fn read(&self, path: &Path) -> Result<RawMatrix> {
        ensure_exists(path)?;
        let file = std::fs::File::open(path).map_err(|e| TigerError::io(path, e))?;
        Self::parse(file, &path.display().to_string())
    }
}
