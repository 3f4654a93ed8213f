// cldf.rs - CLDF wordlist reader (languages, parameters, forms, cognates)

use super::{ensure_exists, MatrixReader};
use crate::data::matrix::{RawMatrix, StateValue};
use crate::error::{Result, TigerError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::debug;

const LANGUAGES: &str = "languages.csv";
const PARAMETERS: &str = "parameters.csv";
const FORMS: &str = "forms.csv";
const COGNATES: &str = "cognates.csv";

#[derive(Debug, Deserialize)]
struct LanguageRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct ParameterRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct FormRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Language_ID")]
    language_id: String,
    #[serde(rename = "Parameter_ID")]
    parameter_id: String,
}

#[derive(Debug, Deserialize)]
struct CognateRow {
    #[serde(rename = "Form_ID")]
    form_id: String,
    #[serde(rename = "Cognateset_ID")]
    cognateset_id: String,
}

/// CLDF wordlist: languages are taxa, meanings are characters and cognate sets
/// are states. A language with several cognate sets for one meaning yields an
/// ambiguous cell that the synonym resolver settles later.
#[derive(Debug, Clone)]
pub struct CldfReader;

impl CldfReader {
    fn dataset_dir(path: &Path) -> PathBuf {
        if path.is_dir() {
            path.to_path_buf()
        } else {
            path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."))
        }
    }

    /// Read one table, checking its required columns up front.
    fn read_table<T: DeserializeOwned>(dir: &Path, file: &str, columns: &[&str]) -> Result<Vec<(usize, T)>> {
        let path = dir.join(file);
        let mut reader = csv::Reader::from_path(&path).map_err(|e| TigerError::UnsupportedFormatLayout {
            format: "cldf",
            reason: format!("cannot open {}: {}", path.display(), e),
        })?;

        let headers = reader
            .headers()
            .map_err(|e| TigerError::malformed(file, 1, e.to_string()))?
            .clone();
        let missing: Vec<&str> = columns
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();
        if !missing.is_empty() {
            return Err(TigerError::UnsupportedFormatLayout {
                format: "cldf",
                reason: format!("{} lacks required column(s): {}", file, missing.join(", ")),
            });
        }

        let mut rows = Vec::new();
        for (index, row) in reader.deserialize::<T>().enumerate() {
            let line = index + 2;
            let row = row.map_err(|e| TigerError::malformed(file, line, e.to_string()))?;
            rows.push((line, row));
        }
        Ok(rows)
    }

    /// Load a dataset directory into a raw matrix.
    pub fn read_dataset(dir: &Path) -> Result<RawMatrix> {
        let absent: Vec<&str> = [LANGUAGES, PARAMETERS, FORMS, COGNATES]
            .into_iter()
            .filter(|file| !dir.join(file).is_file())
            .collect();
        if !absent.is_empty() {
            return Err(TigerError::UnsupportedFormatLayout {
                format: "cldf",
                reason: format!(
                    "dataset {} does not use standard filenames (missing {})",
                    dir.display(),
                    absent.join(", ")
                ),
            });
        }

        // Languages -> taxa, disambiguating repeated names with their ID
        let languages: Vec<LanguageRow> = Self::read_table(dir, LANGUAGES, &["ID", "Name"])?
            .into_iter()
            .map(|(_, row)| row)
            .collect();
        let mut name_counts: HashMap<&str, usize> = HashMap::new();
        for language in &languages {
            *name_counts.entry(language.name.as_str()).or_insert(0) += 1;
        }
        let language_names: HashMap<String, String> = languages
            .iter()
            .map(|language| {
                let taxon = if name_counts[language.name.as_str()] > 1 {
                    format!("{}_{}", language.name, language.id)
                } else {
                    language.name.clone()
                };
                (language.id.clone(), taxon)
            })
            .collect();

        let mut taxa: Vec<String> = language_names.values().cloned().collect();
        taxa.sort();
        taxa.dedup();
        if taxa.len() != languages.len() {
            return Err(TigerError::malformed(
                LANGUAGES,
                0,
                "language names are not unique even after appending IDs",
            ));
        }
        let taxon_index: HashMap<&str, usize> = taxa.iter().enumerate().map(|(i, t)| (t.as_str(), i)).collect();

        let parameter_names: HashMap<String, String> = Self::read_table::<ParameterRow>(dir, PARAMETERS, &["ID", "Name"])?
            .into_iter()
            .map(|(_, row)| (row.id, row.name))
            .collect();

        // Forms link a language to a meaning
        let mut form_targets: HashMap<String, (usize, String)> = HashMap::new();
        for (line, form) in Self::read_table::<FormRow>(dir, FORMS, &["ID", "Language_ID", "Parameter_ID"])? {
            let taxon = language_names
                .get(&form.language_id)
                .ok_or_else(|| TigerError::malformed(FORMS, line, format!("unknown Language_ID '{}'", form.language_id)))?;
            let meaning = parameter_names
                .get(&form.parameter_id)
                .ok_or_else(|| TigerError::malformed(FORMS, line, format!("unknown Parameter_ID '{}'", form.parameter_id)))?;
            form_targets.insert(form.id, (taxon_index[taxon.as_str()], meaning.clone()));
        }

        let meanings: Vec<String> = form_targets
            .values()
            .map(|(_, meaning)| meaning.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let meaning_index: HashMap<&str, usize> =
            meanings.iter().enumerate().map(|(i, m)| (m.as_str(), i)).collect();

        let mut cells: Vec<Vec<BTreeSet<String>>> = vec![vec![BTreeSet::new(); taxa.len()]; meanings.len()];
        let mut links = 0usize;
        for (line, cognate) in Self::read_table::<CognateRow>(dir, COGNATES, &["Form_ID", "Cognateset_ID"])? {
            let (taxon, meaning) = form_targets
                .get(&cognate.form_id)
                .ok_or_else(|| TigerError::malformed(COGNATES, line, format!("unknown Form_ID '{}'", cognate.form_id)))?;
            let cognateset = cognate.cognateset_id.trim();
            if cognateset.is_empty() {
                continue;
            }
            cells[meaning_index[meaning.as_str()]][*taxon].insert(cognateset.to_string());
            links += 1;
        }

        debug!(
            languages = taxa.len(),
            meanings = meanings.len(),
            cognate_links = links,
            "CLDF dataset joined"
        );

        let sites: Vec<Vec<StateValue>> = cells
            .into_iter()
            .map(|column| column.into_iter().map(StateValue::Ambiguous).collect())
            .collect();

        RawMatrix::from_sites(taxa, sites, Some(meanings))
    }
}

impl MatrixReader for CldfReader {
    fn name(&self) -> &'static str {
        "cldf"
    }

    fn description(&self) -> &'static str {
        "CLDF wordlist directory (languages, parameters, forms, cognates)"
    }

    fn supports_polymorphism(&self) -> bool {
        true
    }

    fn read(&self, path: &Path) -> Result<RawMatrix> {
        ensure_exists(path)?;
        Self::read_dataset(&Self::dataset_dir(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_dataset(dir: &Path, cognates: &str) {
        fs::write(
            dir.join(LANGUAGES),
            "ID,Name,Glottocode\nl1,Alpha,\nl2,Beta,\nl3,Alpha,\n",
        )
        .unwrap();
        fs::write(dir.join(PARAMETERS), "ID,Name\np1,hand\np2,foot\n").unwrap();
        fs::write(
            dir.join(FORMS),
            "ID,Language_ID,Parameter_ID,Form\n\
             f1,l1,p1,a\nf2,l2,p1,b\nf3,l2,p1,c\nf4,l3,p1,d\n\
             f5,l1,p2,e\nf6,l2,p2,f\n",
        )
        .unwrap();
        fs::write(dir.join(COGNATES), cognates).unwrap();
    }

    #[test]
    fn test_read_dataset() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(
            dir.path(),
            "ID,Form_ID,Cognateset_ID\nc1,f1,hand-1\nc2,f2,hand-1\nc3,f3,hand-2\nc4,f4,hand-2\nc5,f5,foot-1\nc6,f6,foot-1\n",
        );

        let matrix = CldfReader.read(dir.path()).unwrap();

        // Duplicate names get their ID appended, taxa are sorted
        assert_eq!(matrix.taxa(), &["Alpha_l1", "Alpha_l3", "Beta"]);
        // Meanings are sorted by name
        assert_eq!(matrix.site_names().unwrap(), &["foot", "hand"]);

        let hand = matrix.site(1);
        assert_eq!(hand[0].candidates(), vec!["hand-1"]);
        assert_eq!(hand[1].candidates(), vec!["hand-2"]);
        assert_eq!(hand[2].candidates(), vec!["hand-1", "hand-2"]);
        assert!(hand[2].is_ambiguous());

        // Alpha_l3 has no form for "foot"
        assert!(matrix.site(0)[1].candidates().is_empty());
    }

    #[test]
    fn test_file_inside_dataset_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path(), "ID,Form_ID,Cognateset_ID\nc1,f1,x\n");

        let matrix = CldfReader.read(&dir.path().join(FORMS)).unwrap();
        assert_eq!(matrix.n_taxa(), 3);
    }

    #[test]
    fn test_missing_table() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LANGUAGES), "ID,Name\nl1,Alpha\n").unwrap();

        assert!(matches!(
            CldfReader.read(dir.path()),
            Err(TigerError::UnsupportedFormatLayout { .. })
        ));
    }

    #[test]
    fn test_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path(), "ID,Form_ID\nc1,f1\n");

        match CldfReader.read(dir.path()) {
            Err(TigerError::UnsupportedFormatLayout { reason, .. }) => {
                assert!(reason.contains("Cognateset_ID"))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_form_reference() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path(), "ID,Form_ID,Cognateset_ID\nc1,f99,x\n");

        match CldfReader.read(dir.path()) {
            Err(TigerError::MalformedRow { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
