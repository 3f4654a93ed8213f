// fasta.rs - FASTA alignment reader

use super::{ensure_exists, MatrixReader};
use crate::data::matrix::{RawMatrix, StateValue};
use crate::error::{Result, TigerError};
use bio::io::fasta;
use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

/// Aligned FASTA: one record per taxon, one character per site.
///
/// Every symbol (gaps and `?` included) is a state label; use ignored labels to
/// treat gap or unknown symbols as missing.
#[derive(Debug, Clone)]
pub struct FastaReader;

impl FastaReader {
    /// Parse FASTA text that has already been loaded into memory.
    ///
    /// Taxon names are the full header text after `>`; errors point at the
    /// header line of the offending record.
    pub fn parse_str(content: &str, source_name: &str) -> Result<RawMatrix> {
        // Header text and 1-based line number, in record order
        let headers: Vec<(usize, &str)> = content
            .lines()
            .enumerate()
            .filter_map(|(index, line)| line.trim().strip_prefix('>').map(|h| (index + 1, h.trim())))
            .collect();

        // Comment and blank lines are dropped before handing the text to the parser
        let cleaned: String = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with(';'))
            .fold(String::with_capacity(content.len()), |mut acc, line| {
                acc.push_str(line);
                acc.push('\n');
                acc
            });

        let reader = fasta::Reader::new(Cursor::new(cleaned.into_bytes()));
        let mut taxa: Vec<String> = Vec::new();
        let mut rows: Vec<Vec<StateValue>> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (index, record) in reader.records().enumerate() {
            let line = headers.get(index).map_or(index + 1, |(line, _)| *line);
            let record = record.map_err(|e| TigerError::malformed(source_name, line, e.to_string()))?;

            let taxon = match headers.get(index) {
                Some((_, header)) => header.to_string(),
                None => record.id().to_string(),
            };
            if !seen.insert(taxon.clone()) {
                return Err(TigerError::malformed(
                    source_name,
                    line,
                    format!("duplicate taxon name '{}'", taxon),
                ));
            }

            let row: Vec<StateValue> = String::from_utf8_lossy(record.seq())
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| StateValue::Definite(c.to_string()))
                .collect();

            if let Some(first) = rows.first() {
                if row.len() != first.len() {
                    return Err(TigerError::malformed(
                        source_name,
                        line,
                        format!(
                            "sequence '{}' has length {}, expected {}. Please ensure the input is an aligned FASTA file",
                            taxon,
                            row.len(),
                            first.len()
                        ),
                    ));
                }
            }

            taxa.push(taxon);
            rows.push(row);
        }

        RawMatrix::from_rows(taxa, rows, None)
    }
}

impl MatrixReader for FastaReader {
    fn name(&self) -> &'static str {
        "fasta"
    }

    fn description(&self) -> &'static str {
        "Aligned FASTA file, one symbol per character"
    }

    fn read(&self, path: &Path) -> Result<RawMatrix> {
        ensure_exists(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| TigerError::io(path, e))?;
        Self::parse_str(&content, &path.display().to_string())
    }
}
