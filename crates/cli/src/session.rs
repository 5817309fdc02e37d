//! Interview session state: one question per catalog symptom, in order.
//!
//! The questionnaire walks the symptom catalog front to back, recording a
//! yes/no answer per code. Stepping back re-asks an earlier question and a
//! new answer overwrites the recorded one. The session is finished once the
//! last symptom has been answered; the confirmed codes then feed the
//! inference engine.

use pakar_core::{Code, Symptom};
use std::collections::HashMap;

/// In-progress walk over the symptom catalog.
#[derive(Debug, Clone)]
pub struct Questionnaire {
    symptoms: Vec<Symptom>,
    answers: HashMap<Code, bool>,
    index: usize,
}

impl Questionnaire {
    /// Creates a session over the given catalog, in presentation order.
    ///
    /// An empty catalog yields an immediately finished session.
    pub fn new(symptoms: Vec<Symptom>) -> Self {
        Self {
            symptoms,
            answers: HashMap::new(),
            index: 0,
        }
    }

    /// The symptom currently awaiting an answer, or `None` once finished.
    pub fn current(&self) -> Option<&Symptom> {
        self.symptoms.get(self.index)
    }

    /// Zero-based position of the current question.
    pub fn position(&self) -> usize {
        self.index
    }

    /// Total number of questions in the session.
    pub fn total(&self) -> usize {
        self.symptoms.len()
    }

    /// `true` once every symptom has been answered.
    pub fn is_finished(&self) -> bool {
        self.index >= self.symptoms.len()
    }

    /// Records an answer for the current question and advances.
    ///
    /// Re-answering a revisited question overwrites the previous answer.
    /// Does nothing once the session is finished.
    pub fn answer(&mut self, value: bool) {
        if let Some(symptom) = self.symptoms.get(self.index) {
            self.answers.insert(symptom.code.clone(), value);
            self.index += 1;
        }
    }

    /// Steps back to the previous question so it can be re-answered.
    ///
    /// Returns `false` when already at the first question.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// The recorded answer for a symptom code, if it has been answered.
    pub fn answer_for(&self, code: &str) -> Option<bool> {
        self.answers
            .iter()
            .find(|(answered, _)| answered.as_str() == code)
            .map(|(_, value)| *value)
    }

    /// Codes answered "yes", in catalog order.
    pub fn selected(&self) -> Vec<Code> {
        self.symptoms
            .iter()
            .filter(|symptom| self.answers.get(&symptom.code) == Some(&true))
            .map(|symptom| symptom.code.clone())
            .collect()
    }

    /// Clears all answers and returns to the first question.
    pub fn reset(&mut self) {
        self.answers.clear();
        self.index = 0;
    }
}
