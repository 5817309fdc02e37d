//! Forward-chaining inference over the rule catalog.
//!
//! The matching model is deliberately small: a rule fires exactly when every
//! one of its condition codes is present in the observed set (AND-only, one
//! pass, no priorities, weights or rule chaining). Observed codes the catalog
//! does not know about are ignored rather than rejected, and an empty result
//! is a normal outcome: "no rule matched" is an answer, not an error.
//!
//! [`InferenceEngine::match_partial`] is the diagnostic companion to
//! [`InferenceEngine::diagnose`]: instead of a yes/no per rule it reports how
//! close each overlapping rule came, which the interfaces use to suggest
//! near-misses when nothing fired.

use crate::knowledge::{KnowledgeBase, Rule};
use pakar_types::Code;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// A rule whose full condition set is satisfied by the observed codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    /// Code of the rule that fired.
    pub code: Code,

    /// Human-readable name of the conclusion.
    pub diagnosis: String,

    /// Remediation text; may be empty when not yet authored.
    pub solution: String,

    /// The rule's condition list, as authored (duplicates preserved).
    pub matched_conditions: Vec<Code>,
}

/// How close a rule came to firing: condition overlap with the observed set.
///
/// Only rules with at least one satisfied condition are reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialMatch {
    /// Code of the overlapping rule.
    pub code: Code,

    /// Human-readable name of the conclusion.
    pub diagnosis: String,

    /// Number of distinct conditions satisfied by the observed set.
    pub matched: usize,

    /// Number of distinct conditions the rule requires.
    pub total: usize,

    /// `true` when every condition is satisfied, i.e. the rule also appears
    /// in the [`InferenceEngine::diagnose`] result.
    pub complete: bool,
}

/// Stateless matcher over a shared, read-only knowledge base.
///
/// Cheap to clone; every session in a process can hold its own handle to the
/// same catalog.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    knowledge: Arc<KnowledgeBase>,
}

impl InferenceEngine {
    /// Creates an engine over the given knowledge base.
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self { knowledge }
    }

    /// Returns the knowledge base this engine matches against.
    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Returns every rule whose conditions are all present in `observed`, in
    /// catalog order.
    ///
    /// Deterministic and side-effect free: the same observed set always
    /// yields the same matches, regardless of the order or repetition of its
    /// elements. An empty result means no conclusion, which is a normal
    /// outcome.
    pub fn diagnose<S: AsRef<str>>(&self, observed: &[S]) -> Vec<Match> {
        let observed = observed_set(observed);

        let mut matches = Vec::new();
        for rule in self.knowledge.rules() {
            if !all_conditions_observed(rule, &observed) {
                continue;
            }
            matches.push(Match {
                code: rule.code.clone(),
                diagnosis: rule.diagnosis.clone(),
                solution: rule.solution.clone(),
                matched_conditions: rule.conditions.clone(),
            });
        }

        tracing::debug!(
            observed = observed.len(),
            matches = matches.len(),
            "evaluated rule catalog"
        );

        matches
    }

    /// Reports the condition overlap of every rule sharing at least one code
    /// with `observed`, in catalog order.
    ///
    /// Counts are over *distinct* codes, so authored duplicates within a
    /// rule's condition list do not inflate either figure. Every rule that
    /// [`InferenceEngine::diagnose`] would return appears here with
    /// `complete` set.
    pub fn match_partial<S: AsRef<str>>(&self, observed: &[S]) -> Vec<PartialMatch> {
        let observed = observed_set(observed);

        let mut partial = Vec::new();
        for rule in self.knowledge.rules() {
            let conditions: HashSet<&str> =
                rule.conditions.iter().map(|c| c.as_str()).collect();
            let matched = conditions.intersection(&observed).count();
            if matched == 0 {
                continue;
            }
            partial.push(PartialMatch {
                code: rule.code.clone(),
                diagnosis: rule.diagnosis.clone(),
                matched,
                total: conditions.len(),
                complete: all_conditions_observed(rule, &observed),
            });
        }

        partial
    }
}

fn observed_set<S: AsRef<str>>(observed: &[S]) -> HashSet<&str> {
    observed.iter().map(|code| code.as_ref()).collect()
}

/// The firing predicate: every condition code present in the observed set.
fn all_conditions_observed(rule: &Rule, observed: &HashSet<&str>) -> bool {
    rule.conditions
        .iter()
        .all(|condition| observed.contains(condition.as_str()))
}
