//! CSV-to-JSON conversion for knowledge-base authoring.
//!
//! Catalogs are authored as two CSV exports: `kerusakan.csv` carries the
//! symptom catalog (`Kode`, `Kerusakan`) and `gejala.csv` the rule catalog
//! (`Kode`, `Gejala yang dihadapi` as a comma-separated condition list,
//! `THEN` as the diagnosis). The column names are the wire format and are
//! kept verbatim.
//!
//! Conversion is deliberately thin: cells are trimmed and typed, but
//! catalog-level invariants (unique codes, consistent references) are checked
//! where they always are, at load time. Solutions
//! are not part of the CSV exports, so every converted rule starts with an
//! empty `solution` awaiting authoring.

use pakar_core::{Code, CodeError, KnowledgeDocument, Rule, Symptom};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("failed to read CSV file: {0}")]
    Read(std::io::Error),
    #[error("failed to parse CSV row: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid code {value:?}: {source}")]
    InvalidCode { value: String, source: CodeError },
    #[error("failed to create output directory: {0}")]
    CreateDir(std::io::Error),
    #[error("failed to serialize knowledge base: {0}")]
    Serialize(serde_json::Error),
    #[error("failed to write knowledge base: {0}")]
    Write(std::io::Error),
}

pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

/// Counts reported after a successful conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertSummary {
    pub symptoms: usize,
    pub rules: usize,
}

#[derive(Debug, Deserialize)]
struct SymptomRow {
    #[serde(rename = "Kode")]
    code: String,
    #[serde(rename = "Kerusakan")]
    description: String,
}

#[derive(Debug, Deserialize)]
struct RuleRow {
    #[serde(rename = "Kode")]
    code: String,
    #[serde(rename = "Gejala yang dihadapi")]
    conditions: String,
    #[serde(rename = "THEN")]
    diagnosis: String,
}

fn code(value: &str) -> ConvertResult<Code> {
    Code::new(value).map_err(|source| ConvertError::InvalidCode {
        value: value.to_string(),
        source,
    })
}

/// Reads the symptom catalog from a `kerusakan.csv` export.
pub fn read_symptoms(path: &Path) -> ConvertResult<Vec<Symptom>> {
    let content = fs::read_to_string(path).map_err(ConvertError::Read)?;
    let mut reader = csv::Reader::from_reader(content.as_bytes());

    let mut symptoms = Vec::new();
    for row in reader.deserialize() {
        let row: SymptomRow = row?;
        symptoms.push(Symptom {
            code: code(&row.code)?,
            description: row.description.trim().to_string(),
        });
    }

    Ok(symptoms)
}

/// Reads the rule catalog from a `gejala.csv` export.
pub fn read_rules(path: &Path) -> ConvertResult<Vec<Rule>> {
    let content = fs::read_to_string(path).map_err(ConvertError::Read)?;
    let mut reader = csv::Reader::from_reader(content.as_bytes());

    let mut rules = Vec::new();
    for row in reader.deserialize() {
        let row: RuleRow = row?;
        let conditions = row
            .conditions
            .split(',')
            .map(code)
            .collect::<ConvertResult<Vec<Code>>>()?;
        rules.push(Rule {
            code: code(&row.code)?,
            conditions,
            diagnosis: row.diagnosis.trim().to_string(),
            solution: String::new(),
        });
    }

    Ok(rules)
}

/// Converts the two CSV exports into a knowledge-base JSON document.
///
/// Creates the output's parent directory when missing, and returns the
/// catalog sizes for reporting.
pub fn convert(kerusakan: &Path, gejala: &Path, output: &Path) -> ConvertResult<ConvertSummary> {
    let symptoms = read_symptoms(kerusakan)?;
    let rules = read_rules(gejala)?;

    let summary = ConvertSummary {
        symptoms: symptoms.len(),
        rules: rules.len(),
    };
    let document = KnowledgeDocument { symptoms, rules };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(ConvertError::CreateDir)?;
        }
    }

    let mut json = serde_json::to_string_pretty(&document).map_err(ConvertError::Serialize)?;
    json.push('\n');
    fs::write(output, json).map_err(ConvertError::Write)?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pakar_core::KnowledgeBase;
    use tempfile::TempDir;

    const KERUSAKAN_CSV: &str = "\
Kode,Kerusakan
G01,Printer tidak menyala
G02, Lampu indikator mati \n";

    const GEJALA_CSV: &str = "\
Kode,Gejala yang dihadapi,THEN
R01,\"G01, G02\",Power supply rusak
R02,G02,Kabel longgar
";

    fn write_fixtures(dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
        let kerusakan = dir.path().join("kerusakan.csv");
        let gejala = dir.path().join("gejala.csv");
        fs::write(&kerusakan, KERUSAKAN_CSV).expect("should write kerusakan fixture");
        fs::write(&gejala, GEJALA_CSV).expect("should write gejala fixture");
        (kerusakan, gejala)
    }

    #[test]
    fn test_read_symptoms_trims_cells() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (kerusakan, _) = write_fixtures(&temp_dir);

        let symptoms = read_symptoms(&kerusakan).expect("symptoms should parse");
        assert_eq!(symptoms.len(), 2);
        assert_eq!(symptoms[1].code.as_str(), "G02");
        assert_eq!(symptoms[1].description, "Lampu indikator mati");
    }

    #[test]
    fn test_read_rules_splits_condition_list() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (_, gejala) = write_fixtures(&temp_dir);

        let rules = read_rules(&gejala).expect("rules should parse");
        assert_eq!(rules.len(), 2);

        let conditions: Vec<&str> = rules[0].conditions.iter().map(|c| c.as_str()).collect();
        assert_eq!(conditions, vec!["G01", "G02"]);
        assert_eq!(rules[0].diagnosis, "Power supply rusak");
        assert_eq!(rules[0].solution, "");
    }

    #[test]
    fn test_convert_produces_loadable_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (kerusakan, gejala) = write_fixtures(&temp_dir);
        let output = temp_dir.path().join("out").join("knowledge_base.json");

        let summary = convert(&kerusakan, &gejala, &output).expect("conversion should succeed");
        assert_eq!(summary, ConvertSummary { symptoms: 2, rules: 2 });

        let kb = KnowledgeBase::load(&output).expect("converted document should load");
        assert_eq!(kb.symptoms().len(), 2);
        assert_eq!(kb.rules().len(), 2);
        assert!(kb.find_rule("R01").is_some());
    }

    #[test]
    fn test_missing_input_is_read_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("nope.csv");

        let err = read_symptoms(&missing).expect_err("missing input should fail");
        assert!(matches!(err, ConvertError::Read(_)));
    }

    #[test]
    fn test_missing_column_is_csv_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let gejala = temp_dir.path().join("gejala.csv");
        fs::write(&gejala, "Kode,Gejala yang dihadapi\nR01,G01\n")
            .expect("should write fixture");

        let err = read_rules(&gejala).expect_err("missing THEN column should fail");
        assert!(matches!(err, ConvertError::Csv(_)));
    }

    #[test]
    fn test_blank_code_cell_is_invalid_code() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let gejala = temp_dir.path().join("gejala.csv");
        fs::write(&gejala, "Kode,Gejala yang dihadapi,THEN\nR01,\"G01,\",Power supply rusak\n")
            .expect("should write fixture");

        let err = read_rules(&gejala).expect_err("trailing comma should fail");
        assert!(matches!(err, ConvertError::InvalidCode { .. }));
    }
}
