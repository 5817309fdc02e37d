//! Knowledge-base catalog and read-only store.
//!
//! This module provides the persisted knowledge model for the expert system:
//! the ordered symptom catalog, the ordered diagnostic rule set, and the
//! [`KnowledgeBase`] store that owns both.
//!
//! # Document Format
//!
//! The persisted document is JSON with two top-level lists:
//!
//! ```json
//! {
//!   "symptoms": [{"code": "G01", "description": "Printer tidak menyala"}],
//!   "rules": [{"code": "R01", "conditions": ["G01", "G02"],
//!              "diagnosis": "Power supply rusak", "solution": "Ganti adaptor"}]
//! }
//! ```
//!
//! Both fields are required: a document missing either one is rejected rather
//! than defaulted to an empty list, so an authoring mistake surfaces at load
//! time instead of as a silently question-free session.
//!
//! # Validation
//!
//! Invariants are checked once, at construction:
//!
//! - symptom and rule codes are unique within their catalog
//! - every rule has at least one condition
//! - codes are trimmed and non-empty (enforced by [`Code`] during
//!   deserialisation)
//!
//! A rule condition referencing a code absent from the symptom catalog is
//! *not* an error: such a rule can simply never fire, because observations
//! only ever come from the catalog. [`KnowledgeBase::dangling_conditions`]
//! reports these as a data-quality lint.
//!
//! The store is immutable after construction; there are no create, update or
//! delete operations. One instance may be shared read-only across concurrent
//! sessions.

use crate::error::{KnowledgeError, KnowledgeResult};
use pakar_types::Code;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// An observable printer condition, identified by a unique code.
///
/// Catalog order is significant: it defines the order in which questions are
/// presented to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symptom {
    /// Unique identifier within the catalog, e.g. `"G01"`.
    pub code: Code,

    /// Human-readable text of the observable condition.
    pub description: String,
}

/// A diagnostic conclusion that fires when every one of its condition codes
/// is observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique identifier within the catalog, e.g. `"R01"`.
    pub code: Code,

    /// Symptom codes that must all be observed for the rule to fire.
    ///
    /// Duplicates are permitted in authored data and are semantically
    /// irrelevant; matching treats the list as a set.
    pub conditions: Vec<Code>,

    /// Human-readable name of the conclusion.
    pub diagnosis: String,

    /// Remediation text; may be empty when not yet authored.
    pub solution: String,
}

/// The on-disk document shape: two ordered catalogs.
///
/// Shared with the conversion tool so the producer and the consumer of the
/// format cannot drift apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    pub symptoms: Vec<Symptom>,
    pub rules: Vec<Rule>,
}

/// A rule condition that references a symptom code absent from the catalog.
///
/// Reported by [`KnowledgeBase::dangling_conditions`]; never a load error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingCondition {
    /// The rule containing the reference.
    pub rule: Code,
    /// The condition code with no matching catalog symptom.
    pub condition: Code,
}

/// Immutable, validated store of symptoms and diagnostic rules.
///
/// Constructed once per process from a persisted document (or, in tests, from
/// fixture catalogs via [`KnowledgeBase::new`]) and injected into whatever
/// needs it — never held as an implicit singleton.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    symptoms: Vec<Symptom>,
    rules: Vec<Rule>,
}

impl KnowledgeBase {
    /// Creates a validated store from already-parsed catalogs.
    ///
    /// # Errors
    ///
    /// Returns `KnowledgeError` if:
    /// - a symptom code appears more than once in the catalog
    /// - a rule code appears more than once in the catalog
    /// - a rule has an empty condition list
    pub fn new(symptoms: Vec<Symptom>, rules: Vec<Rule>) -> KnowledgeResult<Self> {
        let mut seen = HashSet::new();
        for symptom in &symptoms {
            if !seen.insert(symptom.code.as_str()) {
                return Err(KnowledgeError::DuplicateSymptomCode {
                    code: symptom.code.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.code.as_str()) {
                return Err(KnowledgeError::DuplicateRuleCode {
                    code: rule.code.clone(),
                });
            }
            if rule.conditions.is_empty() {
                return Err(KnowledgeError::EmptyConditions {
                    rule: rule.code.clone(),
                });
            }
        }

        Ok(Self { symptoms, rules })
    }

    /// Parses and validates a knowledge-base document from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `KnowledgeError::Parse` if the document is not valid JSON, is
    /// missing the `symptoms` or `rules` field, or has mis-typed fields
    /// (including blank codes). Invariant violations surface as the
    /// [`KnowledgeBase::new`] errors.
    pub fn parse(json: &str) -> KnowledgeResult<Self> {
        let document: KnowledgeDocument =
            serde_json::from_str(json).map_err(KnowledgeError::Parse)?;
        Self::new(document.symptoms, document.rules)
    }

    /// Loads and validates a knowledge-base document from disk.
    ///
    /// # Errors
    ///
    /// Returns `KnowledgeError::NotFound` if `path` does not exist,
    /// `KnowledgeError::Read` if it exists but cannot be read, and the
    /// [`KnowledgeBase::parse`] errors for malformed content.
    pub fn load(path: &Path) -> KnowledgeResult<Self> {
        if !path.exists() {
            return Err(KnowledgeError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let raw = fs::read_to_string(path).map_err(KnowledgeError::Read)?;
        let knowledge = Self::parse(&raw)?;

        tracing::debug!(
            symptoms = knowledge.symptoms.len(),
            rules = knowledge.rules.len(),
            "loaded knowledge base from {}",
            path.display()
        );

        Ok(knowledge)
    }

    /// Returns the full symptom catalog, in presentation order.
    pub fn symptoms(&self) -> &[Symptom] {
        &self.symptoms
    }

    /// Returns the full rule catalog, in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Looks up a symptom by code.
    ///
    /// An unknown code is an expected miss, not an error.
    pub fn find_symptom(&self, code: &str) -> Option<&Symptom> {
        self.symptoms.iter().find(|symptom| symptom.code.as_str() == code)
    }

    /// Looks up a rule by code.
    ///
    /// An unknown code is an expected miss, not an error.
    pub fn find_rule(&self, code: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.code.as_str() == code)
    }

    /// Reports every rule condition that references a code absent from the
    /// symptom catalog.
    ///
    /// Such rules are unreachable (no observation set built from the catalog
    /// can ever satisfy them) but permitted in authored data. This is a lint
    /// for catalog authors, in catalog order, with repeats within a rule
    /// reported once.
    pub fn dangling_conditions(&self) -> Vec<DanglingCondition> {
        let known: HashSet<&str> = self.symptoms.iter().map(|s| s.code.as_str()).collect();

        let mut dangling = Vec::new();
        for rule in &self.rules {
            let mut reported = HashSet::new();
            for condition in &rule.conditions {
                if known.contains(condition.as_str()) {
                    continue;
                }
                if reported.insert(condition.as_str()) {
                    dangling.push(DanglingCondition {
                        rule: rule.code.clone(),
                        condition: condition.clone(),
                    });
                }
            }
        }

        dangling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn symptom(code: &str, description: &str) -> Symptom {
        Symptom {
            code: Code::new(code).expect("test symptom code should be valid"),
            description: description.to_string(),
        }
    }

    fn rule(code: &str, conditions: &[&str], diagnosis: &str, solution: &str) -> Rule {
        Rule {
            code: Code::new(code).expect("test rule code should be valid"),
            conditions: conditions
                .iter()
                .map(|c| Code::new(c).expect("test condition code should be valid"))
                .collect(),
            diagnosis: diagnosis.to_string(),
            solution: solution.to_string(),
        }
    }

    const VALID_DOCUMENT: &str = r#"{
        "symptoms": [
            {"code": "G01", "description": "Printer tidak menyala"},
            {"code": "G02", "description": "Lampu indikator mati"},
            {"code": "G03", "description": "Hasil cetak bergaris"}
        ],
        "rules": [
            {"code": "R01", "conditions": ["G01", "G02"],
             "diagnosis": "Power supply rusak", "solution": "Ganti adaptor"},
            {"code": "R02", "conditions": ["G03"],
             "diagnosis": "Cartridge kotor", "solution": ""}
        ]
    }"#;

    #[test]
    fn test_parse_valid_document_preserves_order() {
        let kb = KnowledgeBase::parse(VALID_DOCUMENT).expect("document should parse");

        let codes: Vec<&str> = kb.symptoms().iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["G01", "G02", "G03"]);

        let codes: Vec<&str> = kb.rules().iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["R01", "R02"]);

        assert_eq!(kb.symptoms()[0].description, "Printer tidak menyala");
        assert_eq!(kb.rules()[0].diagnosis, "Power supply rusak");
        assert_eq!(kb.rules()[0].solution, "Ganti adaptor");
        assert_eq!(kb.rules()[1].solution, "");
    }

    #[test]
    fn test_parse_trims_codes() {
        let json = r#"{
            "symptoms": [{"code": " G01 ", "description": "Printer tidak menyala"}],
            "rules": [{"code": "R01", "conditions": ["G01"],
                       "diagnosis": "Power supply rusak", "solution": ""}]
        }"#;

        let kb = KnowledgeBase::parse(json).expect("padded codes should parse");
        assert_eq!(kb.symptoms()[0].code.as_str(), "G01");
        assert!(kb.find_symptom("G01").is_some());
    }

    #[test]
    fn test_parse_rejects_blank_code() {
        let json = r#"{
            "symptoms": [{"code": "   ", "description": "Printer tidak menyala"}],
            "rules": []
        }"#;

        let err = KnowledgeBase::parse(json).expect_err("blank code should be rejected");
        assert!(matches!(err, KnowledgeError::Parse(_)));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let err = KnowledgeBase::parse("{not json").expect_err("malformed JSON should fail");
        assert!(matches!(err, KnowledgeError::Parse(_)));
    }

    #[test]
    fn test_parse_rejects_missing_rules_field() {
        // Required-field policy: an absent catalog is an authoring error, not
        // an empty list.
        let json = r#"{"symptoms": []}"#;

        let err = KnowledgeBase::parse(json).expect_err("missing rules field should fail");
        assert!(matches!(err, KnowledgeError::Parse(_)));
    }

    #[test]
    fn test_parse_rejects_missing_symptoms_field() {
        let json = r#"{"rules": []}"#;

        let err = KnowledgeBase::parse(json).expect_err("missing symptoms field should fail");
        assert!(matches!(err, KnowledgeError::Parse(_)));
    }

    #[test]
    fn test_parse_rejects_mistyped_conditions() {
        let json = r#"{
            "symptoms": [],
            "rules": [{"code": "R01", "conditions": "G01",
                       "diagnosis": "Power supply rusak", "solution": ""}]
        }"#;

        let err = KnowledgeBase::parse(json).expect_err("string conditions should fail");
        assert!(matches!(err, KnowledgeError::Parse(_)));
    }

    #[test]
    fn test_new_rejects_duplicate_symptom_code() {
        let symptoms = vec![symptom("G01", "Printer tidak menyala"), symptom("G01", "Duplikat")];

        let err = KnowledgeBase::new(symptoms, vec![])
            .expect_err("duplicate symptom code should fail");
        assert!(matches!(
            err,
            KnowledgeError::DuplicateSymptomCode { ref code } if code.as_str() == "G01"
        ));
    }

    #[test]
    fn test_new_rejects_duplicate_rule_code() {
        let rules = vec![
            rule("R01", &["G01"], "Power supply rusak", ""),
            rule("R01", &["G02"], "Kabel longgar", ""),
        ];

        let err =
            KnowledgeBase::new(vec![], rules).expect_err("duplicate rule code should fail");
        assert!(matches!(
            err,
            KnowledgeError::DuplicateRuleCode { ref code } if code.as_str() == "R01"
        ));
    }

    #[test]
    fn test_new_rejects_empty_conditions() {
        let rules = vec![rule("R01", &[], "Power supply rusak", "")];

        let err = KnowledgeBase::new(vec![], rules).expect_err("empty conditions should fail");
        assert!(matches!(
            err,
            KnowledgeError::EmptyConditions { ref rule } if rule.as_str() == "R01"
        ));
    }

    #[test]
    fn test_new_permits_duplicate_conditions_within_rule() {
        // Duplicates inside one rule are treated as a set by matching, not
        // rejected at load.
        let symptoms = vec![symptom("G01", "Printer tidak menyala")];
        let rules = vec![rule("R01", &["G01", "G01"], "Power supply rusak", "")];

        let kb = KnowledgeBase::new(symptoms, rules).expect("duplicate conditions are permitted");
        assert_eq!(kb.rules()[0].conditions.len(), 2);
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("knowledge_base.json");

        let err = KnowledgeBase::load(&path).expect_err("missing file should fail");
        assert!(matches!(err, KnowledgeError::NotFound { .. }));
    }

    #[test]
    fn test_load_reads_document_from_disk() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("knowledge_base.json");
        fs::write(&path, VALID_DOCUMENT).expect("should write fixture document");

        let kb = KnowledgeBase::load(&path).expect("load should succeed");
        assert_eq!(kb.symptoms().len(), 3);
        assert_eq!(kb.rules().len(), 2);
    }

    #[test]
    fn test_load_surfaces_parse_errors() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("knowledge_base.json");
        fs::write(&path, "{not json").expect("should write fixture document");

        let err = KnowledgeBase::load(&path).expect_err("malformed file should fail");
        assert!(matches!(err, KnowledgeError::Parse(_)));
    }

    #[test]
    fn test_find_symptom_by_code() {
        let kb = KnowledgeBase::parse(VALID_DOCUMENT).expect("document should parse");

        let found = kb.find_symptom("G02").expect("G02 should be found");
        assert_eq!(found.description, "Lampu indikator mati");
    }

    #[test]
    fn test_find_symptom_returns_none_for_unknown() {
        let kb = KnowledgeBase::parse(VALID_DOCUMENT).expect("document should parse");
        assert!(kb.find_symptom("UNKNOWN").is_none());
    }

    #[test]
    fn test_find_rule_by_code() {
        let kb = KnowledgeBase::parse(VALID_DOCUMENT).expect("document should parse");

        let found = kb.find_rule("R02").expect("R02 should be found");
        assert_eq!(found.diagnosis, "Cartridge kotor");
        assert!(kb.find_rule("R99").is_none());
    }

    #[test]
    fn test_dangling_conditions_reports_unknown_codes() {
        let symptoms = vec![symptom("G01", "Printer tidak menyala")];
        let rules = vec![
            rule("R01", &["G01"], "Power supply rusak", ""),
            rule("R02", &["G01", "G99", "G99"], "Kabel longgar", ""),
        ];
        let kb = KnowledgeBase::new(symptoms, rules).expect("catalog should be valid");

        let dangling = kb.dangling_conditions();
        assert_eq!(dangling.len(), 1, "repeat within a rule is reported once");
        assert_eq!(dangling[0].rule.as_str(), "R02");
        assert_eq!(dangling[0].condition.as_str(), "G99");
    }

    #[test]
    fn test_dangling_conditions_empty_for_consistent_catalog() {
        let kb = KnowledgeBase::parse(VALID_DOCUMENT).expect("document should parse");
        assert!(kb.dangling_conditions().is_empty());
    }
}
